use serde::Serialize;

use crate::core::cigar::CigarError;
use crate::core::record::AlignedRead;
use crate::normalize::{NormalizeError, NormalizeOptions};
use crate::utils::validation::needs_quality_fill;

/// What normalization changed on a single record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub cigar_consolidated: bool,
    pub original_qualities_restored: bool,
    pub qualities_filled: bool,
}

/// Running totals over all records normalized so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub records: u64,
    pub cigars_consolidated: u64,
    pub original_qualities_restored: u64,
    pub qualities_filled: u64,
}

impl NormalizeStats {
    fn record(&mut self, changes: RecordChanges) {
        self.records += 1;
        self.cigars_consolidated += u64::from(changes.cigar_consolidated);
        self.original_qualities_restored += u64::from(changes.original_qualities_restored);
        self.qualities_filled += u64::from(changes.qualities_filled);
    }
}

/// Normalize one record in place.
///
/// Original qualities are restored before filling, so a read whose `OQ` tag
/// covers every base is never filled.
///
/// # Errors
///
/// Returns a `CigarError` if the CIGAR holds an unknown operator or cannot be
/// re-encoded. The record is not modified in that case.
pub fn normalize_record<R>(
    record: &mut R,
    options: &NormalizeOptions,
) -> Result<RecordChanges, CigarError>
where
    R: AlignedRead + ?Sized,
{
    let mut changes = RecordChanges {
        cigar_consolidated: record.consolidate_cigar()?,
        ..RecordChanges::default()
    };

    if options.use_original_qualities {
        if let Some(original) = record.original_quality_scores() {
            record.set_quality_scores(original);
            changes.original_qualities_restored = true;
        }
    }

    let sequence_len = record.sequence_len();
    if options.fill_missing_qualities
        && needs_quality_fill(sequence_len, record.quality_scores_len())
    {
        record.set_quality_scores(vec![options.default_base_quality; sequence_len]);
        changes.qualities_filled = true;
    }

    Ok(changes)
}

/// Lazily normalizes records pulled from an upstream iterator.
///
/// Each call to `next` pulls exactly one record, normalizes it, and hands it
/// on; nothing is buffered. Upstream errors are passed through unchanged and a
/// record that fails normalization is yielded as an error in its place.
pub struct ReadNormalizer<I> {
    records: I,
    options: NormalizeOptions,
    stats: NormalizeStats,
}

impl<I> ReadNormalizer<I> {
    /// # Errors
    ///
    /// Returns `NormalizeError::InvalidOption` if `options` fail validation.
    pub fn new(records: I, options: NormalizeOptions) -> Result<Self, NormalizeError> {
        options.validate()?;
        Ok(Self {
            records,
            options,
            stats: NormalizeStats::default(),
        })
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    pub fn into_inner(self) -> I {
        self.records
    }
}

impl<I, R, E> Iterator for ReadNormalizer<I>
where
    I: Iterator<Item = Result<R, E>>,
    R: AlignedRead,
    E: Into<NormalizeError>,
{
    type Item = Result<R, NormalizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let result = normalize_record(&mut record, &self.options);
        Some(match result {
            Ok(changes) => {
                self.stats.record(changes);
                Ok(record)
            }
            Err(e) => Err(e.into()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

use crate::core::cigar::{self, CigarError, Op};

/// Mutable view of an aligned read used by the normalizer.
///
/// Implemented for [`AlignmentRecord`] and for `noodles` record buffers so the
/// same normalization runs on in-memory records and on SAM/BAM input.
pub trait AlignedRead {
    /// Rewrite the CIGAR in canonical form, returning whether it changed.
    ///
    /// # Errors
    ///
    /// Returns a `CigarError` if the stored CIGAR cannot be decoded or the
    /// consolidated CIGAR cannot be encoded. The record is left untouched.
    fn consolidate_cigar(&mut self) -> Result<bool, CigarError>;

    /// Number of bases in the read sequence
    fn sequence_len(&self) -> usize;

    /// Length of the quality array, or `None` when the read has none
    fn quality_scores_len(&self) -> Option<usize>;

    fn set_quality_scores(&mut self, scores: Vec<u8>);

    /// Original (pre-recalibration) qualities from the `OQ` tag, as raw Phred
    fn original_quality_scores(&self) -> Option<Vec<u8>>;
}

/// A genomic read as seen by the normalizer.
///
/// The CIGAR is kept in its BAM encoding so that records carrying an
/// operator code outside 0-8 can be represented and rejected at
/// normalization time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub name: String,

    pub sequence: Vec<u8>,

    /// BAM-encoded CIGAR operations (`len << 4 | op`)
    pub raw_cigar: Vec<u32>,

    /// Raw Phred qualities, `None` when absent (`*` in SAM)
    pub quality_scores: Option<Vec<u8>>,

    /// Raw Phred qualities from the `OQ` tag
    pub original_quality_scores: Option<Vec<u8>>,
}

impl AlignmentRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            ..Self::default()
        }
    }

    /// Set the CIGAR from SAM text
    ///
    /// # Errors
    ///
    /// Returns a `CigarError` if the text is not a valid CIGAR.
    pub fn with_cigar(mut self, text: &str) -> Result<Self, CigarError> {
        self.raw_cigar = cigar::encode(&cigar::parse(text)?)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_raw_cigar(mut self, raw: Vec<u32>) -> Self {
        self.raw_cigar = raw;
        self
    }

    #[must_use]
    pub fn with_quality_scores(mut self, scores: impl Into<Vec<u8>>) -> Self {
        self.quality_scores = Some(scores.into());
        self
    }

    #[must_use]
    pub fn with_original_quality_scores(mut self, scores: impl Into<Vec<u8>>) -> Self {
        self.original_quality_scores = Some(scores.into());
        self
    }

    /// Decoded CIGAR operations
    ///
    /// # Errors
    ///
    /// Returns `CigarError::UnknownKind` for an unrecognized operator code.
    pub fn cigar(&self) -> Result<Vec<Op>, CigarError> {
        cigar::decode(&self.raw_cigar)
    }

    /// CIGAR in SAM text form
    ///
    /// # Errors
    ///
    /// Returns `CigarError::UnknownKind` for an unrecognized operator code.
    pub fn cigar_string(&self) -> Result<String, CigarError> {
        Ok(cigar::to_text(&self.cigar()?))
    }

    /// Reference bases covered by this alignment
    ///
    /// # Errors
    ///
    /// Returns `CigarError::UnknownKind` for an unrecognized operator code.
    pub fn alignment_span(&self) -> Result<u64, CigarError> {
        Ok(cigar::reference_span(&self.cigar()?))
    }
}

impl AlignedRead for AlignmentRecord {
    fn consolidate_cigar(&mut self) -> Result<bool, CigarError> {
        let ops = cigar::consolidate(self.raw_cigar.iter().map(|&raw| Op::decode(raw)))?;
        let encoded = cigar::encode(&ops)?;
        let changed = encoded != self.raw_cigar;
        self.raw_cigar = encoded;
        Ok(changed)
    }

    fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    fn quality_scores_len(&self) -> Option<usize> {
        self.quality_scores.as_ref().map(Vec::len)
    }

    fn set_quality_scores(&mut self, scores: Vec<u8>) {
        self.quality_scores = Some(scores);
    }

    fn original_quality_scores(&self) -> Option<Vec<u8>> {
        self.original_quality_scores.clone()
    }
}

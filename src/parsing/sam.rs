use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use noodles::sam::alignment::record::cigar::op::Kind as NoodlesKind;
use noodles::sam::alignment::record::cigar::Op as NoodlesOp;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::{Cigar as CigarBuf, QualityScores};
use noodles::sam::alignment::RecordBuf;
use noodles::sam::Header;
use noodles::{bam, sam};
use thiserror::Error;
use tracing::warn;

use crate::core::cigar::{self, CigarError, Kind, Op};
use crate::core::record::AlignedRead;

/// Offset of Phred+33 text qualities such as the `OQ` tag
const PHRED_OFFSET: u8 = 33;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Alignment container format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    Sam,
    Bam,
}

impl AlignmentFormat {
    /// `.bam` is BAM, `.sam` or no extension is SAM
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("bam") => Ok(AlignmentFormat::Bam),
            Some("sam") | None => Ok(AlignmentFormat::Sam),
            Some(ext) => Err(ParseError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Lazily decoded records of an open alignment file
pub type RecordBufs = Box<dyn Iterator<Item = io::Result<RecordBuf>>>;

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open a SAM/BAM file (or `-` for SAM on stdin) and read its header
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or the header cannot
/// be read, or `ParseError::UnsupportedFormat` for unknown extensions.
pub fn open_reader(path: &Path) -> Result<(Header, RecordBufs), ParseError> {
    if is_stdio(path) {
        let reader = sam::io::Reader::new(Box::new(io::stdin().lock()) as Box<dyn io::BufRead>);
        return sam_records(reader);
    }

    match AlignmentFormat::from_path(path)? {
        AlignmentFormat::Sam => {
            let reader = File::open(path)
                .map(BufReader::new)
                .map(|r| sam::io::Reader::new(Box::new(r) as Box<dyn io::BufRead>))?;
            sam_records(reader)
        }
        AlignmentFormat::Bam => {
            let mut reader = File::open(path).map(bam::io::Reader::new)?;
            let header = reader.read_header()?;
            let records_header = header.clone();
            let records = std::iter::from_fn(move || {
                let mut record = RecordBuf::default();
                match reader.read_record_buf(&records_header, &mut record) {
                    Ok(0) => None,
                    Ok(_) => Some(Ok(record)),
                    Err(e) => Some(Err(e)),
                }
            });
            Ok((header, Box::new(records)))
        }
    }
}

fn sam_records(
    mut reader: sam::io::Reader<Box<dyn io::BufRead>>,
) -> Result<(Header, RecordBufs), ParseError> {
    let header = reader.read_header()?;
    let records_header = header.clone();
    let records = std::iter::from_fn(move || {
        let mut record = RecordBuf::default();
        match reader.read_record_buf(&records_header, &mut record) {
            Ok(0) => None,
            Ok(_) => Some(Ok(record)),
            Err(e) => Some(Err(e)),
        }
    });
    Ok((header, Box::new(records)))
}

/// Create an alignment writer: BAM for a `.bam` path, SAM otherwise, and SAM
/// on stdout for `None` or `-`
///
/// # Errors
///
/// Returns `ParseError::Io` if the output file cannot be created, or
/// `ParseError::UnsupportedFormat` for unknown extensions.
pub fn create_writer(
    path: Option<&Path>,
) -> Result<Box<dyn sam::alignment::io::Write>, ParseError> {
    let Some(path) = path.filter(|p| !is_stdio(p)) else {
        let stdout = BufWriter::new(io::stdout().lock());
        return Ok(Box::new(sam::io::Writer::new(stdout)));
    };

    let file = File::create(path)?;
    match AlignmentFormat::from_path(path)? {
        AlignmentFormat::Sam => Ok(Box::new(sam::io::Writer::new(BufWriter::new(file)))),
        AlignmentFormat::Bam => Ok(Box::new(bam::io::Writer::new(file))),
    }
}

fn kind_from_noodles(kind: NoodlesKind) -> Kind {
    match kind {
        NoodlesKind::Match => Kind::Match,
        NoodlesKind::Insertion => Kind::Insertion,
        NoodlesKind::Deletion => Kind::Deletion,
        NoodlesKind::Skip => Kind::Skip,
        NoodlesKind::SoftClip => Kind::SoftClip,
        NoodlesKind::HardClip => Kind::HardClip,
        NoodlesKind::Pad => Kind::Pad,
        NoodlesKind::SequenceMatch => Kind::SequenceMatch,
        NoodlesKind::SequenceMismatch => Kind::SequenceMismatch,
    }
}

fn kind_to_noodles(kind: Kind) -> NoodlesKind {
    match kind {
        Kind::Match => NoodlesKind::Match,
        Kind::Insertion => NoodlesKind::Insertion,
        Kind::Deletion => NoodlesKind::Deletion,
        Kind::Skip => NoodlesKind::Skip,
        Kind::SoftClip => NoodlesKind::SoftClip,
        Kind::HardClip => NoodlesKind::HardClip,
        Kind::Pad => NoodlesKind::Pad,
        Kind::SequenceMatch => NoodlesKind::SequenceMatch,
        Kind::SequenceMismatch => NoodlesKind::SequenceMismatch,
    }
}

fn op_from_noodles(op: &NoodlesOp) -> Result<Op, CigarError> {
    let len = u32::try_from(op.len()).map_err(|_| CigarError::LengthOverflow(op.len() as u64))?;
    Ok(Op::new(kind_from_noodles(op.kind()), len))
}

// noodles stores a missing quality string (`*`) as an empty array
impl AlignedRead for RecordBuf {
    fn consolidate_cigar(&mut self) -> Result<bool, CigarError> {
        let original = self.cigar().as_ref();
        let ops = cigar::consolidate(original.iter().map(op_from_noodles))?;
        if ops.len() == original.len() {
            return Ok(false);
        }

        let ops: Vec<NoodlesOp> = ops
            .iter()
            .map(|op| NoodlesOp::new(kind_to_noodles(op.kind()), op.len() as usize))
            .collect();
        *self.cigar_mut() = CigarBuf::from(ops);
        Ok(true)
    }

    fn sequence_len(&self) -> usize {
        self.sequence().len()
    }

    fn quality_scores_len(&self) -> Option<usize> {
        let len = self.quality_scores().as_ref().len();
        (len > 0).then_some(len)
    }

    fn set_quality_scores(&mut self, scores: Vec<u8>) {
        *self.quality_scores_mut() = QualityScores::from(scores);
    }

    fn original_quality_scores(&self) -> Option<Vec<u8>> {
        match self.data().get(&Tag::ORIGINAL_QUALITY_SCORES)? {
            Value::String(s) => {
                let bytes: &[u8] = s.as_ref();
                let scores: Option<Vec<u8>> =
                    bytes.iter().map(|b| b.checked_sub(PHRED_OFFSET)).collect();
                if scores.is_none() {
                    warn!("Invalid OQ quality string, ignoring");
                }
                scores
            }
            _ => {
                warn!("OQ tag is not a string, ignoring");
                None
            }
        }
    }
}

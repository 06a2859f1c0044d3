//! Streaming normalization of alignment records.
//!
//! [`ReadNormalizer`] wraps any iterator of records and yields them one by
//! one after:
//!
//! 1. **CIGAR consolidation**: zero-length operations are dropped and
//!    adjacent operations with the same operator are merged (`3M0M5M0M`
//!    becomes `8M`). The reference span is unchanged.
//! 2. **Original quality restoration** (optional): qualities from the `OQ`
//!    tag replace the current ones.
//! 3. **Quality filling** (optional): reads without qualities, or with fewer
//!    qualities than bases, get a constant default quality.
//!
//! ## Example
//!
//! ```rust
//! use read_prep::core::AlignmentRecord;
//! use read_prep::normalize::{NormalizeOptions, ReadNormalizer};
//!
//! let record = AlignmentRecord::new("read1", b"ACGTACGT".to_vec())
//!     .with_cigar("3M0M5M0M")
//!     .unwrap();
//!
//! let records = vec![Ok::<_, std::io::Error>(record)];
//! let mut normalizer = ReadNormalizer::new(records.into_iter(), NormalizeOptions::default()).unwrap();
//!
//! let normalized = normalizer.next().unwrap().unwrap();
//! assert_eq!(normalized.cigar_string().unwrap(), "8M");
//! ```

pub mod normalizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::cigar::CigarError;
use crate::utils::validation::{is_valid_base_quality, DEFAULT_BASE_QUALITY, MAX_PHRED};

pub use normalizer::{normalize_record, NormalizeStats, ReadNormalizer, RecordChanges};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Malformed record: {0}")]
    Format(#[from] CigarError),

    /// A record the reader could not decode, e.g. an unknown CIGAR operator
    #[error("Malformed record: {0}")]
    InvalidRecord(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Invalid normalization option: {0}")]
    InvalidOption(String),
}

// Readers report undecodable records as `InvalidData`
impl From<std::io::Error> for NormalizeError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::InvalidData {
            NormalizeError::InvalidRecord(e)
        } else {
            NormalizeError::Io(e)
        }
    }
}

impl From<std::convert::Infallible> for NormalizeError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Per-record normalization settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Synthesize qualities for reads that lack them
    #[serde(default)]
    pub fill_missing_qualities: bool,

    /// Phred score used when filling
    #[serde(default = "default_base_quality")]
    pub default_base_quality: u8,

    /// Replace qualities with the `OQ` tag when present
    #[serde(default)]
    pub use_original_qualities: bool,
}

fn default_base_quality() -> u8 {
    DEFAULT_BASE_QUALITY
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            fill_missing_qualities: false,
            default_base_quality: DEFAULT_BASE_QUALITY,
            use_original_qualities: false,
        }
    }
}

impl NormalizeOptions {
    /// # Errors
    ///
    /// Returns `NormalizeError::InvalidOption` if the default quality is above
    /// the SAM maximum.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if !is_valid_base_quality(self.default_base_quality) {
            return Err(NormalizeError::InvalidOption(format!(
                "default base quality {} exceeds maximum of {MAX_PHRED}",
                self.default_base_quality
            )));
        }
        Ok(())
    }
}

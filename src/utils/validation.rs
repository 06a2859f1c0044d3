//! Centralized limits and validation helpers.

/// Maximum nesting depth of list files referencing other list files
pub const MAX_LIST_DEPTH: usize = 16;

/// Highest Phred score representable in SAM text (`~`)
pub const MAX_PHRED: u8 = 93;

/// Base quality used when a read has none and filling is enabled
pub const DEFAULT_BASE_QUALITY: u8 = 30;

/// Validate that a Phred score is representable in SAM.
///
/// # Examples
///
/// ```
/// use read_prep::utils::validation::is_valid_base_quality;
///
/// assert!(is_valid_base_quality(30));
/// assert!(is_valid_base_quality(93));
/// assert!(!is_valid_base_quality(94));
/// ```
#[must_use]
pub fn is_valid_base_quality(quality: u8) -> bool {
    quality <= MAX_PHRED
}

/// Whether qualities need filling for a read with `sequence_len` bases.
///
/// True when the quality array is missing or shorter than the sequence. A
/// read without bases never needs filling.
#[must_use]
pub fn needs_quality_fill(sequence_len: usize, quality_len: Option<usize>) -> bool {
    sequence_len > 0 && quality_len.map_or(true, |len| len < sequence_len)
}

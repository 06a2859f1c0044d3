//! CIGAR operations, their SAM/BAM encodings, and consolidation.
//!
//! In BAM a CIGAR operation is a 32-bit integer: the low 4 bits hold the
//! operator code (0-8) and the high 28 bits hold the length.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest length representable in the BAM encoding (28 bits)
pub const MAX_OP_LEN: u32 = (1 << 28) - 1;

const KIND_MASK: u32 = 0xf;
const LEN_SHIFT: u32 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("Unknown CIGAR operator code: {0}")]
    UnknownKind(u32),

    #[error("Unknown CIGAR operator '{0}'")]
    UnknownChar(char),

    #[error("Invalid CIGAR string '{0}'")]
    InvalidText(String),

    #[error("CIGAR operation length {0} exceeds maximum of {MAX_OP_LEN}")]
    LengthOverflow(u64),
}

/// CIGAR operator tag. Discriminants follow the BAM operator codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Alignment match, base may or may not match the reference (M)
    Match,
    /// Insertion to the reference (I)
    Insertion,
    /// Deletion from the reference (D)
    Deletion,
    /// Skipped reference region, e.g. an intron (N)
    Skip,
    /// Soft clip, bases kept in the read (S)
    SoftClip,
    /// Hard clip, bases removed from the read (H)
    HardClip,
    /// Silent deletion from the padded reference (P)
    Pad,
    /// Sequence match (=)
    SequenceMatch,
    /// Sequence mismatch (X)
    SequenceMismatch,
}

impl Kind {
    /// Decode a BAM operator code
    pub fn from_code(code: u32) -> Result<Self, CigarError> {
        match code {
            0 => Ok(Kind::Match),
            1 => Ok(Kind::Insertion),
            2 => Ok(Kind::Deletion),
            3 => Ok(Kind::Skip),
            4 => Ok(Kind::SoftClip),
            5 => Ok(Kind::HardClip),
            6 => Ok(Kind::Pad),
            7 => Ok(Kind::SequenceMatch),
            8 => Ok(Kind::SequenceMismatch),
            _ => Err(CigarError::UnknownKind(code)),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Kind::Match => 0,
            Kind::Insertion => 1,
            Kind::Deletion => 2,
            Kind::Skip => 3,
            Kind::SoftClip => 4,
            Kind::HardClip => 5,
            Kind::Pad => 6,
            Kind::SequenceMatch => 7,
            Kind::SequenceMismatch => 8,
        }
    }

    /// Parse the SAM operator character
    pub fn from_char(c: char) -> Result<Self, CigarError> {
        match c {
            'M' => Ok(Kind::Match),
            'I' => Ok(Kind::Insertion),
            'D' => Ok(Kind::Deletion),
            'N' => Ok(Kind::Skip),
            'S' => Ok(Kind::SoftClip),
            'H' => Ok(Kind::HardClip),
            'P' => Ok(Kind::Pad),
            '=' => Ok(Kind::SequenceMatch),
            'X' => Ok(Kind::SequenceMismatch),
            _ => Err(CigarError::UnknownChar(c)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Kind::Match => 'M',
            Kind::Insertion => 'I',
            Kind::Deletion => 'D',
            Kind::Skip => 'N',
            Kind::SoftClip => 'S',
            Kind::HardClip => 'H',
            Kind::Pad => 'P',
            Kind::SequenceMatch => '=',
            Kind::SequenceMismatch => 'X',
        }
    }

    /// Whether this operator advances along the reference (M, D, N, =, X)
    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch
        )
    }

    /// Whether this operator advances along the read (M, I, S, =, X)
    pub fn consumes_read(self) -> bool {
        matches!(
            self,
            Kind::Match
                | Kind::Insertion
                | Kind::SoftClip
                | Kind::SequenceMatch
                | Kind::SequenceMismatch
        )
    }
}

/// A single CIGAR operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Op {
    kind: Kind,
    len: u32,
}

impl Op {
    pub fn new(kind: Kind, len: u32) -> Self {
        Self { kind, len }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode a BAM-encoded operation
    pub fn decode(raw: u32) -> Result<Self, CigarError> {
        let kind = Kind::from_code(raw & KIND_MASK)?;
        Ok(Self::new(kind, raw >> LEN_SHIFT))
    }

    /// Encode as a BAM operation
    pub fn encode(&self) -> Result<u32, CigarError> {
        if self.len > MAX_OP_LEN {
            return Err(CigarError::LengthOverflow(u64::from(self.len)));
        }
        Ok(self.len << LEN_SHIFT | self.kind.code())
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.len, self.kind.as_char())
    }
}

fn to_op_len(len: u64) -> Result<u32, CigarError> {
    u32::try_from(len)
        .ok()
        .filter(|&n| n <= MAX_OP_LEN)
        .ok_or(CigarError::LengthOverflow(len))
}

/// Decode a BAM-encoded CIGAR
pub fn decode(raw: &[u32]) -> Result<Vec<Op>, CigarError> {
    raw.iter().map(|&op| Op::decode(op)).collect()
}

/// Encode a CIGAR in BAM form
pub fn encode(ops: &[Op]) -> Result<Vec<u32>, CigarError> {
    ops.iter().map(Op::encode).collect()
}

/// Parse a SAM CIGAR string such as `3M1I4M`. `*` is the empty CIGAR.
pub fn parse(text: &str) -> Result<Vec<Op>, CigarError> {
    if text == "*" {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut len: Option<u64> = None;

    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            let next = len.unwrap_or(0) * 10 + u64::from(digit);
            if next > u64::from(MAX_OP_LEN) {
                return Err(CigarError::LengthOverflow(next));
            }
            len = Some(next);
        } else {
            let kind = Kind::from_char(c)?;
            let n = len
                .take()
                .ok_or_else(|| CigarError::InvalidText(text.to_string()))?;
            ops.push(Op::new(kind, to_op_len(n)?));
        }
    }

    if len.is_some() {
        return Err(CigarError::InvalidText(text.to_string()));
    }

    Ok(ops)
}

/// Render operations in SAM text form
pub fn to_text(ops: &[Op]) -> String {
    if ops.is_empty() {
        return "*".to_string();
    }
    ops.iter().map(ToString::to_string).collect()
}

/// Collapse a CIGAR into its canonical form.
///
/// Zero-length operations are dropped and adjacent operations with the same
/// operator are merged, so the output has no empty operations and no two
/// neighbours share an operator. The total length per operator is unchanged,
/// which keeps the alignment span intact.
///
/// Accepts fallible input so callers decoding raw BAM operations can stream
/// straight into the accumulator.
///
/// # Errors
///
/// Propagates the first decoding error, or returns `CigarError::LengthOverflow`
/// if a merged length no longer fits the BAM encoding.
pub fn consolidate<I>(ops: I) -> Result<Vec<Op>, CigarError>
where
    I: IntoIterator<Item = Result<Op, CigarError>>,
{
    let mut consolidated = Vec::new();
    let mut current: Option<Op> = None;

    for op in ops {
        let op = op?;
        if op.is_empty() {
            continue;
        }

        current = match current {
            Some(acc) if acc.kind == op.kind => {
                let len = to_op_len(u64::from(acc.len) + u64::from(op.len))?;
                Some(Op::new(acc.kind, len))
            }
            Some(acc) => {
                consolidated.push(acc);
                Some(op)
            }
            None => Some(op),
        };
    }

    if let Some(acc) = current {
        consolidated.push(acc);
    }

    Ok(consolidated)
}

/// Whether `ops` is already in canonical form
pub fn is_consolidated(ops: &[Op]) -> bool {
    ops.iter().all(|op| !op.is_empty()) && ops.windows(2).all(|w| w[0].kind != w[1].kind)
}

/// Number of reference bases spanned by the alignment
pub fn reference_span(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| op.kind.consumes_reference())
        .map(|op| u64::from(op.len))
        .sum()
}

/// Number of read bases described by the CIGAR
pub fn read_length(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| op.kind.consumes_read())
        .map(|op| u64::from(op.len))
        .sum()
}

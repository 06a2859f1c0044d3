//! Core data types shared by the normalizer and the resolver.
//!
//! - [`cigar`]: CIGAR operators, SAM/BAM encodings, and consolidation
//! - [`AlignmentRecord`]: an aligned read with a BAM-encoded CIGAR
//! - [`AlignedRead`]: the mutable read view the normalizer works against
//! - [`ResourceReference`], [`Tags`]: resolved analysis inputs
//!
//! ## CIGAR operators
//!
//! | Op | Code | Consumes read | Consumes reference |
//! |----|------|---------------|--------------------|
//! | M  | 0    | yes           | yes                |
//! | I  | 1    | yes           | no                 |
//! | D  | 2    | no            | yes                |
//! | N  | 3    | no            | yes                |
//! | S  | 4    | yes           | no                 |
//! | H  | 5    | no            | no                 |
//! | P  | 6    | no            | no                 |
//! | =  | 7    | yes           | yes                |
//! | X  | 8    | yes           | yes                |

pub mod cigar;
pub mod record;
pub mod resource;

pub use record::{AlignedRead, AlignmentRecord};
pub use resource::{ResourceReference, Tags};

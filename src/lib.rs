//! # read-prep
//!
//! Preparation of inputs for read-level genomic analyses.
//!
//! Before an analysis walks over alignment records, two things have to be
//! right: the set of files it reads, and the canonical form of every record
//! it sees. Mistakes in either do not fail loudly; they silently change which
//! samples are analyzed or where reads land on the reference.
//!
//! `read-prep` covers both:
//!
//! - **Input resolution**: command-line inputs and `*.list` files are expanded
//!   into a flat, deduplicated, ordered list of resources, then narrowed by
//!   literal or regular-expression include/exclude filters
//! - **Record normalization**: a streaming adapter collapses zero-length and
//!   repeated CIGAR operations and optionally restores or fills base qualities
//!
//! ## Example
//!
//! ```rust,no_run
//! use read_prep::normalize::{NormalizeOptions, ReadNormalizer};
//! use read_prep::parsing::sam::open_reader;
//! use read_prep::resources::{unpack_bam_file_list, LocalFileSystem};
//! use std::path::Path;
//!
//! let inputs = unpack_bam_file_list(&["samples.list"], &LocalFileSystem).unwrap();
//!
//! for input in &inputs {
//!     let (_header, records) = open_reader(Path::new(input.id())).unwrap();
//!     let normalizer = ReadNormalizer::new(records, NormalizeOptions::default()).unwrap();
//!     for record in normalizer {
//!         let _record = record.unwrap();
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: CIGAR operations, alignment records, and resource references
//! - [`matching`]: Include/exclude filtering with exact or pattern filters
//! - [`resources`]: List-file expansion and resource filtering
//! - [`normalize`]: Streaming record normalization
//! - [`parsing`]: List-file lines and SAM/BAM reading and writing
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod normalize;
pub mod parsing;
pub mod resources;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::record::{AlignedRead, AlignmentRecord};
pub use core::resource::{ResourceReference, Tags};
pub use matching::{exclude_matching, include_matching, MatchMode};
pub use normalize::{NormalizeOptions, ReadNormalizer};
pub use resources::{unpack, unpack_bam_file_list, LocalFileSystem};

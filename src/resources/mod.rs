//! Resolution of analysis inputs from literal paths and list files.
//!
//! Inputs given on the command line are either resources themselves (BAM
//! files, `-` for stdin, ...) or list files (`*.list`) naming further inputs,
//! one per line:
//!
//! ```text
//! # tumor samples
//! /data/run1/tumor_a.bam
//!     /data/run1/tumor_b.bam
//!
//! /data/lists/normals.list
//! ```
//!
//! Blank lines and lines whose first non-whitespace character is `#` are
//! skipped. List files may name other list files; these are expanded in
//! place, and a list file seen earlier in the same resolution is not read
//! again. The resolved references are deduplicated and keep first-seen order.
//!
//! [`ResourceFilter`] then narrows the resolved set with include/exclude
//! filters from [`crate::matching`].

pub mod filesystem;
pub mod filter;
pub mod resolver;

use thiserror::Error;

pub use filesystem::{FileSystem, LocalFileSystem};
pub use filter::{MatchOn, ResourceFilter};
pub use resolver::{unpack, unpack_bam_file_list, unpack_tagged_bam_file_list};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Could not read list file '{path}': {source}")]
    ResourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("List file '{path}' is nested deeper than {max} levels")]
    ListNestingTooDeep { path: String, max: usize },
}

//! Parsers for the text and alignment formats read-prep consumes.
//!
//! - **List files**: one input per line, with blank and `#` comment lines
//!   skipped
//! - **SAM/BAM files**: alignment records read and written through `noodles`
//!
//! ## List file format
//!
//! | Line | Meaning |
//! |------|---------|
//! | empty or whitespace only | ignored |
//! | first non-whitespace char is `#` | comment, ignored in full |
//! | anything else | a reference, surrounding whitespace trimmed |

pub mod list_file;
pub mod sam;

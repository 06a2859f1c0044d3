//! Include/exclude filtering of value sets by literal or pattern filters.
//!
//! Each value is first projected to a string key by a [`KeyProjection`], then
//! compared against every filter:
//!
//! - [`MatchMode::Exact`]: the key must equal the filter
//! - [`MatchMode::Pattern`]: the filter is a regular expression that may match
//!   anywhere in the key
//!
//! A value is included when any filter matches and excluded otherwise. Both
//! directions evaluate the same predicate, so they always partition the input
//! even when the projection maps several values to the same key.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use read_prep::matching::{include_matching, Identity, MatchMode};
//!
//! let values: BTreeSet<String> = ["a", "ab", "abc"].iter().map(|s| s.to_string()).collect();
//! let kept = include_matching(&values, &Identity, &["b"], MatchMode::Pattern).unwrap();
//! assert_eq!(kept.len(), 2);
//! ```

pub mod filter;

pub use filter::{
    exclude_matching, exclude_matching_ordered, include_matching, include_matching_ordered,
    matches, FilterError, Identity, KeyProjection, MatchMode, ProjectWith,
};

use std::borrow::Cow;
use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter pattern '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: regex::Error,
    },
}

/// How a filter string is compared against a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Regular expression, matched anywhere in the key
    #[default]
    Pattern,
    /// Literal string equality
    Exact,
}

impl MatchMode {
    pub fn from_exact(exact: bool) -> Self {
        if exact {
            MatchMode::Exact
        } else {
            MatchMode::Pattern
        }
    }
}

/// Maps a value to the string key filters are compared against.
pub trait KeyProjection<V: ?Sized> {
    fn key<'v>(&self, value: &'v V) -> Cow<'v, str>;
}

/// Compares values by their own string form
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<V: AsRef<str> + ?Sized> KeyProjection<V> for Identity {
    fn key<'v>(&self, value: &'v V) -> Cow<'v, str> {
        Cow::Borrowed(value.as_ref())
    }
}

/// Adapts a closure producing owned keys
#[derive(Debug, Clone, Copy)]
pub struct ProjectWith<F>(pub F);

impl<V: ?Sized, F> KeyProjection<V> for ProjectWith<F>
where
    F: Fn(&V) -> String,
{
    fn key<'v>(&self, value: &'v V) -> Cow<'v, str> {
        Cow::Owned((self.0)(value))
    }
}

enum CompiledFilter<'a> {
    Exact(&'a str),
    Pattern(Regex),
}

impl<'a> CompiledFilter<'a> {
    fn compile(filter: &'a str, mode: MatchMode) -> Result<Self, FilterError> {
        match mode {
            MatchMode::Exact => Ok(CompiledFilter::Exact(filter)),
            MatchMode::Pattern => Regex::new(filter)
                .map(CompiledFilter::Pattern)
                .map_err(|source| FilterError::InvalidFilter {
                    filter: filter.to_string(),
                    source,
                }),
        }
    }

    fn is_match(&self, key: &str) -> bool {
        match self {
            CompiledFilter::Exact(filter) => key == *filter,
            CompiledFilter::Pattern(regex) => regex.is_match(key),
        }
    }
}

fn compile_filters<S: AsRef<str>>(
    filters: &[S],
    mode: MatchMode,
) -> Result<Vec<CompiledFilter<'_>>, FilterError> {
    filters
        .iter()
        .map(|f| CompiledFilter::compile(f.as_ref(), mode))
        .collect()
}

/// Whether `key` satisfies `filter`.
///
/// In [`MatchMode::Exact`] the filter is compared literally. In
/// [`MatchMode::Pattern`] it is a regular expression searched for anywhere in
/// `key`, so `b` matches `abc` and `^a$` matches only `a`.
///
/// # Errors
///
/// Returns `FilterError::InvalidFilter` if the pattern does not compile.
pub fn matches(key: &str, filter: &str, mode: MatchMode) -> Result<bool, FilterError> {
    Ok(CompiledFilter::compile(filter, mode)?.is_match(key))
}

/// Values whose key matches (`keep_matching`) or fails to match every filter.
/// All filters are compiled up front so a bad pattern fails even for empty input.
fn select<'a, V, P, S, I>(
    values: I,
    projection: &P,
    filters: &[S],
    mode: MatchMode,
    keep_matching: bool,
) -> Result<Vec<&'a V>, FilterError>
where
    V: 'a + ?Sized,
    P: KeyProjection<V> + ?Sized,
    S: AsRef<str>,
    I: IntoIterator<Item = &'a V>,
{
    let compiled = compile_filters(filters, mode)?;
    Ok(values
        .into_iter()
        .filter(|value| {
            let key = projection.key(value);
            compiled.iter().any(|f| f.is_match(&key)) == keep_matching
        })
        .collect())
}

/// Values matched by at least one filter. No filters selects nothing.
///
/// # Errors
///
/// Returns `FilterError::InvalidFilter` if any pattern does not compile.
pub fn include_matching<V, P, S>(
    values: &BTreeSet<V>,
    projection: &P,
    filters: &[S],
    mode: MatchMode,
) -> Result<BTreeSet<V>, FilterError>
where
    V: Ord + Clone,
    P: KeyProjection<V> + ?Sized,
    S: AsRef<str>,
{
    Ok(select(values, projection, filters, mode, true)?
        .into_iter()
        .cloned()
        .collect())
}

/// Values matched by none of the filters. No filters selects everything.
///
/// # Errors
///
/// Returns `FilterError::InvalidFilter` if any pattern does not compile.
pub fn exclude_matching<V, P, S>(
    values: &BTreeSet<V>,
    projection: &P,
    filters: &[S],
    mode: MatchMode,
) -> Result<BTreeSet<V>, FilterError>
where
    V: Ord + Clone,
    P: KeyProjection<V> + ?Sized,
    S: AsRef<str>,
{
    Ok(select(values, projection, filters, mode, false)?
        .into_iter()
        .cloned()
        .collect())
}

/// Like [`include_matching`], keeping the input order
///
/// # Errors
///
/// Returns `FilterError::InvalidFilter` if any pattern does not compile.
pub fn include_matching_ordered<V, P, S>(
    values: &[V],
    projection: &P,
    filters: &[S],
    mode: MatchMode,
) -> Result<Vec<V>, FilterError>
where
    V: Clone,
    P: KeyProjection<V> + ?Sized,
    S: AsRef<str>,
{
    Ok(select(values, projection, filters, mode, true)?
        .into_iter()
        .cloned()
        .collect())
}

/// Like [`exclude_matching`], keeping the input order
///
/// # Errors
///
/// Returns `FilterError::InvalidFilter` if any pattern does not compile.
pub fn exclude_matching_ordered<V, P, S>(
    values: &[V],
    projection: &P,
    filters: &[S],
    mode: MatchMode,
) -> Result<Vec<V>, FilterError>
where
    V: Clone,
    P: KeyProjection<V> + ?Sized,
    S: AsRef<str>,
{
    Ok(select(values, projection, filters, mode, false)?
        .into_iter()
        .cloned()
        .collect())
}

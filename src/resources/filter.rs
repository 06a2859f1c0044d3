use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::resource::ResourceReference;
use crate::matching::{exclude_matching_ordered, include_matching_ordered, FilterError};
use crate::matching::{KeyProjection, MatchMode};

/// Which part of a reference filters are compared against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOn {
    /// The full normalized identifier
    #[default]
    Path,
    /// The last path component
    FileName,
}

impl KeyProjection<ResourceReference> for MatchOn {
    fn key<'v>(&self, value: &'v ResourceReference) -> Cow<'v, str> {
        match self {
            MatchOn::Path => Cow::Borrowed(value.id()),
            MatchOn::FileName => Cow::Borrowed(value.file_name()),
        }
    }
}

/// Include/exclude rules applied to resolved references
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceFilter {
    /// Keep only references matching one of these; empty keeps everything
    #[serde(default)]
    pub include: Vec<String>,

    /// Drop references matching any of these
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub mode: MatchMode,

    #[serde(default)]
    pub match_on: MatchOn,
}

impl ResourceFilter {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Apply include rules, then exclude rules, keeping input order
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidFilter` if a pattern does not compile.
    pub fn apply(
        &self,
        references: Vec<ResourceReference>,
    ) -> Result<Vec<ResourceReference>, FilterError> {
        let total = references.len();

        let included = if self.include.is_empty() {
            references
        } else {
            include_matching_ordered(&references, &self.match_on, &self.include, self.mode)?
        };
        let kept = exclude_matching_ordered(&included, &self.match_on, &self.exclude, self.mode)?;

        debug!(total, kept = kept.len(), "Filtered resources");
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::Tags;

    fn refs(ids: &[&str]) -> Vec<ResourceReference> {
        ids.iter()
            .map(|id| ResourceReference::new(id, Tags::default()))
            .collect()
    }

    fn ids(references: &[ResourceReference]) -> Vec<&str> {
        references.iter().map(ResourceReference::id).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ResourceFilter::default();
        assert!(filter.is_empty());
        let kept = filter.apply(refs(&["a.bam", "b.bam"])).unwrap();
        assert_eq!(ids(&kept), vec!["a.bam", "b.bam"]);
    }

    #[test]
    fn test_include_then_exclude() {
        let filter = ResourceFilter {
            include: vec!["tumor".to_string()],
            exclude: vec!["_b".to_string()],
            ..ResourceFilter::default()
        };
        let kept = filter
            .apply(refs(&["tumor_a.bam", "normal_a.bam", "tumor_b.bam", "tumor_c.bam"]))
            .unwrap();
        assert_eq!(ids(&kept), vec!["tumor_a.bam", "tumor_c.bam"]);
    }

    #[test]
    fn test_match_on_file_name() {
        let references = refs(&["/data/tumor/a.bam", "/data/normal/b.bam"]);

        let by_path = ResourceFilter {
            include: vec!["tumor".to_string()],
            ..ResourceFilter::default()
        };
        assert_eq!(ids(&by_path.apply(references.clone()).unwrap()), vec!["/data/tumor/a.bam"]);

        let by_name = ResourceFilter {
            include: vec!["tumor".to_string()],
            match_on: MatchOn::FileName,
            ..ResourceFilter::default()
        };
        assert!(by_name.apply(references.clone()).unwrap().is_empty());

        let exact_name = ResourceFilter {
            exclude: vec!["b.bam".to_string()],
            mode: MatchMode::Exact,
            match_on: MatchOn::FileName,
            ..ResourceFilter::default()
        };
        assert_eq!(ids(&exact_name.apply(references).unwrap()), vec!["/data/tumor/a.bam"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let filter = ResourceFilter {
            exclude: vec!["(".to_string()],
            ..ResourceFilter::default()
        };
        assert!(filter.apply(refs(&["a.bam"])).is_err());
    }
}

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Metadata attached to an input by the caller, e.g. `tumor,sample=NA12878`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    positional: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    key_values: BTreeMap<String, String>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse comma-separated tags; `key=value` items become key/value tags,
    /// everything else is positional. Empty items are ignored.
    pub fn parse(text: &str) -> Self {
        let mut tags = Self::new();
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.split_once('=') {
                Some((key, value)) => tags.add_key_value(key.trim(), value.trim()),
                None => tags.add_positional(item),
            }
        }
        tags
    }

    pub fn add_positional(&mut self, tag: impl Into<String>) {
        self.positional.push(tag.into());
    }

    pub fn add_key_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.key_values.insert(key.into(), value.into());
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.key_values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.key_values.is_empty()
    }
}

impl std::fmt::Display for Tags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items: Vec<String> = self
            .positional
            .iter()
            .cloned()
            .chain(self.key_values.iter().map(|(k, v)| format!("{k}={v}")))
            .collect();
        write!(f, "{}", items.join(","))
    }
}

/// A resolved input: a file path or literal token plus caller metadata.
///
/// Two references are the same resource when their normalized identifiers
/// are equal; tags do not take part in identity.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReference {
    #[serde(rename = "resource")]
    id: String,

    #[serde(skip_serializing_if = "Tags::is_empty")]
    tags: Tags,
}

impl ResourceReference {
    pub fn new(raw: &str, tags: Tags) -> Self {
        Self {
            id: normalize_identifier(raw),
            tags,
        }
    }

    /// Normalized identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Last path component, or the whole identifier for literal tokens
    pub fn file_name(&self) -> &str {
        Path::new(&self.id)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.id)
    }
}

impl PartialEq for ResourceReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResourceReference {}

impl Hash for ResourceReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Lexically normalize a resource identifier.
///
/// Redundant separators and interior `.` components are removed and a
/// trailing separator is dropped. `..` is kept since resolving it needs the
/// filesystem. Identifiers without a separator are returned unchanged.
pub fn normalize_identifier(raw: &str) -> String {
    if !raw.contains(std::path::MAIN_SEPARATOR) && !raw.contains('/') {
        return raw.to_string();
    }

    let normalized: PathBuf = Path::new(raw)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        return ".".to_string();
    }
    normalized.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("sample.bam"), "sample.bam");
        assert_eq!(normalize_identifier("-"), "-");
        assert_eq!(normalize_identifier("/data//run1/./a.bam"), "/data/run1/a.bam");
        assert_eq!(normalize_identifier("./a.bam"), "a.bam");
        assert_eq!(normalize_identifier("data/run1/"), "data/run1");
        assert_eq!(normalize_identifier("data/../a.bam"), "data/../a.bam");
        assert_eq!(normalize_identifier("./"), ".");
    }

    #[test]
    fn test_identity_ignores_tags() {
        let a = ResourceReference::new("/data//a.bam", Tags::parse("tumor"));
        let b = ResourceReference::new("/data/a.bam", Tags::new());
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            ResourceReference::new("/data/run1/a.bam", Tags::new()).file_name(),
            "a.bam"
        );
        assert_eq!(ResourceReference::new("-", Tags::new()).file_name(), "-");
    }

    #[test]
    fn test_parse_tags() {
        let tags = Tags::parse("tumor, sample=NA12878,,lane=2");
        assert_eq!(tags.positional(), ["tumor".to_string()]);
        assert_eq!(tags.get("sample"), Some("NA12878"));
        assert_eq!(tags.get("lane"), Some("2"));
        assert_eq!(tags.to_string(), "tumor,lane=2,sample=NA12878");
        assert!(Tags::parse("").is_empty());
    }
}

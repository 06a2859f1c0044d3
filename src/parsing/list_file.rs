use std::path::Path;

/// Marker that starts a comment line in a list file
pub const COMMENT_START: char = '#';

/// One classified line of a list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFileEntry {
    /// Empty or whitespace-only
    Blank,
    /// First non-whitespace character is `#`; the whole line is ignored
    Comment,
    /// A resource reference, trimmed of surrounding whitespace
    Reference(String),
}

impl ListFileEntry {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ListFileEntry::Blank
        } else if trimmed.starts_with(COMMENT_START) {
            ListFileEntry::Comment
        } else {
            ListFileEntry::Reference(trimmed.to_string())
        }
    }

    pub fn into_reference(self) -> Option<String> {
        match self {
            ListFileEntry::Reference(reference) => Some(reference),
            ListFileEntry::Blank | ListFileEntry::Comment => None,
        }
    }
}

/// References named by the lines of a list file, in file order
pub fn parse_list_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| ListFileEntry::classify(line.as_ref()).into_reference())
        .collect()
}

/// Whether a path follows the list-file naming convention (`*.list`)
pub fn has_list_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("list"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ListFileEntry::classify(""), ListFileEntry::Blank);
        assert_eq!(ListFileEntry::classify("   \t"), ListFileEntry::Blank);
        assert_eq!(ListFileEntry::classify("#"), ListFileEntry::Comment);
        assert_eq!(
            ListFileEntry::classify("      # /data/bar.bam"),
            ListFileEntry::Comment
        );
        assert_eq!(
            ListFileEntry::classify("  /data/a.bam \r"),
            ListFileEntry::Reference("/data/a.bam".to_string())
        );
        // Only a leading '#' marks a comment
        assert_eq!(
            ListFileEntry::classify("/data/a#1.bam"),
            ListFileEntry::Reference("/data/a#1.bam".to_string())
        );
    }

    #[test]
    fn test_parse_list_lines() {
        let lines = [
            "#",
            "/data/example.bam",
            "#/data/foo.bam",
            "      # /data/bar.bam",
            "",
            "   ",
        ];
        assert_eq!(parse_list_lines(&lines), vec!["/data/example.bam".to_string()]);
    }

    #[test]
    fn test_has_list_extension() {
        assert!(has_list_extension("inputs.list"));
        assert!(has_list_extension("/data/INPUTS.LIST"));
        assert!(!has_list_extension("inputs.bam"));
        assert!(!has_list_extension("list"));
        assert!(!has_list_extension("inputs.list.bak"));
    }
}

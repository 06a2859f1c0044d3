use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::core::resource::{normalize_identifier, ResourceReference, Tags};
use crate::parsing::list_file::parse_list_lines;
use crate::resources::{FileSystem, ResolveError};
use crate::utils::validation::MAX_LIST_DEPTH;

struct Pending {
    entry: String,
    tags: Tags,
    depth: usize,
}

/// Expand entries depth-first with an explicit worklist.
///
/// The stack holds pending entries in reverse so popping yields them in
/// input order; a list file's lines are pushed in reverse at its position.
fn expand<F, I>(entries: I, fs: &F) -> Result<Vec<ResourceReference>, ResolveError>
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = (String, Tags)>,
{
    let mut stack: Vec<Pending> = entries
        .into_iter()
        .map(|(entry, tags)| Pending {
            entry: entry.trim().to_string(),
            tags,
            depth: 0,
        })
        .collect();
    stack.reverse();

    let mut visited_lists: HashSet<String> = HashSet::new();
    let mut seen: HashSet<ResourceReference> = HashSet::new();
    let mut resolved = Vec::new();

    while let Some(Pending { entry, tags, depth }) = stack.pop() {
        if !fs.is_list_file(&entry) {
            let reference = ResourceReference::new(&entry, tags);
            if seen.insert(reference.clone()) {
                resolved.push(reference);
            }
            continue;
        }

        if !visited_lists.insert(normalize_identifier(&entry)) {
            warn!(list = %entry, "List file already expanded, skipping");
            continue;
        }

        if depth >= MAX_LIST_DEPTH {
            return Err(ResolveError::ListNestingTooDeep {
                path: entry,
                max: MAX_LIST_DEPTH,
            });
        }

        let lines = fs
            .read_lines(&entry)
            .map_err(|source| ResolveError::ResourceNotFound {
                path: entry.clone(),
                source,
            })?;

        let children = parse_list_lines(&lines);
        debug!(list = %entry, entries = children.len(), "Expanded list file");

        stack.extend(children.into_iter().rev().map(|child| Pending {
            entry: child,
            tags: tags.clone(),
            depth: depth + 1,
        }));
    }

    Ok(resolved)
}

/// Resolve entries into a deduplicated set of resource identifiers.
///
/// Entries that are not list files are taken literally; list files are
/// replaced by the references they contain.
///
/// # Errors
///
/// Returns `ResolveError::ResourceNotFound` if a list file cannot be read, or
/// `ResolveError::ListNestingTooDeep` if list files nest too deeply.
pub fn unpack<F, S>(entries: &[S], fs: &F) -> Result<BTreeSet<String>, ResolveError>
where
    F: FileSystem + ?Sized,
    S: AsRef<str>,
{
    let references = expand(
        entries.iter().map(|e| (e.as_ref().to_string(), Tags::default())),
        fs,
    )?;
    Ok(references.into_iter().map(|r| r.id().to_string()).collect())
}

/// Resolve alignment inputs into references with default tags, keeping
/// first-seen order and dropping duplicates.
///
/// # Errors
///
/// Same as [`unpack`].
pub fn unpack_bam_file_list<F, S>(
    entries: &[S],
    fs: &F,
) -> Result<Vec<ResourceReference>, ResolveError>
where
    F: FileSystem + ?Sized,
    S: AsRef<str>,
{
    expand(
        entries.iter().map(|e| (e.as_ref().to_string(), Tags::default())),
        fs,
    )
}

/// Like [`unpack_bam_file_list`] for entries carrying caller tags. References
/// read from a list file inherit the tags given to the list file.
///
/// # Errors
///
/// Same as [`unpack`].
pub fn unpack_tagged_bam_file_list<F, I>(
    entries: I,
    fs: &F,
) -> Result<Vec<ResourceReference>, ResolveError>
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = (String, Tags)>,
{
    expand(entries, fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    #[derive(Default)]
    struct MemoryFileSystem {
        files: HashMap<String, String>,
    }

    impl MemoryFileSystem {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }
    }

    impl FileSystem for MemoryFileSystem {
        fn is_list_file(&self, entry: &str) -> bool {
            crate::parsing::list_file::has_list_extension(entry)
        }

        fn read_lines(&self, entry: &str) -> io::Result<Vec<String>> {
            self.files
                .get(entry)
                .map(|content| content.lines().map(str::to_string).collect())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, entry.to_string()))
        }
    }

    fn ids(references: &[ResourceReference]) -> Vec<&str> {
        references.iter().map(ResourceReference::id).collect()
    }

    #[test]
    fn test_literal_entries_pass_through() {
        let fs = MemoryFileSystem::default();
        let resolved = unpack_bam_file_list(&["b.bam", "a.bam", "-"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["b.bam", "a.bam", "-"]);
        assert!(resolved.iter().all(|r| r.tags().is_empty()));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let fs = MemoryFileSystem::default().with_file("in.list", "\n/data/example.bam\n         \n");
        let resolved = unpack_bam_file_list(&["in.list"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["/data/example.bam"]);
    }

    #[test]
    fn test_comment_lines_ignored() {
        let fs = MemoryFileSystem::default().with_file(
            "in.list",
            "#\n/data/example.bam\n#/data/foo.bam\n      # /data/bar.bam\n",
        );
        let resolved = unpack_bam_file_list(&["in.list"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["/data/example.bam"]);

        let set = unpack(&["in.list"], &fs).unwrap();
        assert_eq!(set, BTreeSet::from(["/data/example.bam".to_string()]));
    }

    #[test]
    fn test_unpack_deduplicates_and_is_idempotent() {
        let fs = MemoryFileSystem::default().with_file("in.list", "a.bam\nb.bam\n/x//a.bam\n");
        let entries = ["a.bam", "in.list", "/x/a.bam"];

        let first = unpack(&entries, &fs).unwrap();
        let second = unpack(&entries, &fs).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            BTreeSet::from(["a.bam".to_string(), "b.bam".to_string(), "/x/a.bam".to_string()])
        );
    }

    #[test]
    fn test_top_level_entries_are_trimmed() {
        let fs = MemoryFileSystem::default().with_file("in.list", "b.bam\n");

        let set = unpack(&["  a.bam  ", "a.bam", "\tin.list "], &fs).unwrap();
        assert_eq!(set, BTreeSet::from(["a.bam".to_string(), "b.bam".to_string()]));

        let resolved = unpack_bam_file_list(&[" a.bam", " in.list\n"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["a.bam", "b.bam"]);
    }

    #[test]
    fn test_first_seen_order() {
        let fs = MemoryFileSystem::default().with_file("in.list", "c.bam\na.bam\n");
        let resolved = unpack_bam_file_list(&["a.bam", "in.list", "b.bam"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["a.bam", "c.bam", "b.bam"]);
    }

    #[test]
    fn test_missing_list_file() {
        let fs = MemoryFileSystem::default();
        let err = unpack_bam_file_list(&["a.bam", "missing.list"], &fs).unwrap_err();
        assert!(
            matches!(err, ResolveError::ResourceNotFound { ref path, .. } if path == "missing.list")
        );
    }

    #[test]
    fn test_nested_list_files_expand_in_place() {
        let fs = MemoryFileSystem::default()
            .with_file("outer.list", "a.bam\ninner.list\nd.bam\n")
            .with_file("inner.list", "b.bam\n# skipped\nc.bam\n");
        let resolved = unpack_bam_file_list(&["outer.list"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["a.bam", "b.bam", "c.bam", "d.bam"]);
    }

    #[test]
    fn test_list_file_cycle_terminates() {
        let fs = MemoryFileSystem::default()
            .with_file("a.list", "one.bam\nb.list\n")
            .with_file("b.list", "two.bam\na.list\n");
        let resolved = unpack_bam_file_list(&["a.list"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["one.bam", "two.bam"]);
    }

    #[test]
    fn test_self_referencing_list_file() {
        let fs = MemoryFileSystem::default().with_file("self.list", "x.bam\nself.list\n");
        let resolved = unpack_bam_file_list(&["self.list", "self.list"], &fs).unwrap();
        assert_eq!(ids(&resolved), vec!["x.bam"]);
    }

    #[test]
    fn test_nesting_too_deep() {
        let mut fs = MemoryFileSystem::default();
        for i in 0..=MAX_LIST_DEPTH {
            fs = fs.with_file(&format!("l{i}.list"), &format!("l{}.list\n", i + 1));
        }
        let err = unpack_bam_file_list(&["l0.list"], &fs).unwrap_err();
        assert!(matches!(err, ResolveError::ListNestingTooDeep { .. }));
    }

    #[test]
    fn test_tags_inherited_from_list_file() {
        let fs = MemoryFileSystem::default().with_file("tumor.list", "t1.bam\nt2.bam\n");
        let resolved = unpack_tagged_bam_file_list(
            [
                ("tumor.list".to_string(), Tags::parse("tumor")),
                ("n1.bam".to_string(), Tags::parse("normal,sample=N1")),
            ],
            &fs,
        )
        .unwrap();

        assert_eq!(ids(&resolved), vec!["t1.bam", "t2.bam", "n1.bam"]);
        assert_eq!(resolved[0].tags().positional(), ["tumor".to_string()]);
        assert_eq!(resolved[1].tags().positional(), ["tumor".to_string()]);
        assert_eq!(resolved[2].tags().get("sample"), Some("N1"));
    }
}

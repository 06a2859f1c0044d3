//! List-file unpacking against real files on disk.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use read_prep::core::resource::Tags;
use read_prep::resources::{unpack, unpack_bam_file_list, LocalFileSystem, ResolveError};
use read_prep::ResourceReference;
use tempfile::{NamedTempFile, TempDir};

fn create_list_file(dir: &Path, name: &str, lines: &[&str]) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create list file");
    for line in lines {
        writeln!(file, "{line}").expect("Failed to write list file");
    }
    path.to_string_lossy().into_owned()
}

fn example_bam(dir: &Path) -> String {
    dir.join("exampleBAM.bam").to_string_lossy().into_owned()
}

#[test]
fn test_ignore_blank_lines_in_bam_list_files() {
    let dir = TempDir::new().unwrap();
    let bam = example_bam(dir.path());
    let list = create_list_file(dir.path(), "blank_lines.list", &["", &bam, "         "]);

    let unpacked = unpack_bam_file_list(&[list], &LocalFileSystem).unwrap();

    assert_eq!(unpacked.len(), 1, "Unpacked BAM file list contains extraneous lines");
    assert_eq!(unpacked, vec![ResourceReference::new(&bam, Tags::default())]);
}

#[test]
fn test_comment_support_in_bam_list_files() {
    let dir = TempDir::new().unwrap();
    let bam = example_bam(dir.path());
    let foo = format!("#{}", dir.path().join("foo.bam").display());
    let bar = format!("      # {}", dir.path().join("bar.bam").display());
    let list = create_list_file(dir.path(), "comments.list", &["#", &bam, &foo, &bar]);

    let unpacked = unpack_bam_file_list(&[list], &LocalFileSystem).unwrap();

    assert_eq!(unpacked.len(), 1, "Unpacked BAM file list contains extraneous lines");
    assert_eq!(unpacked[0].id(), bam);
    assert!(unpacked[0].tags().is_empty());
}

#[test]
fn test_unpack_set() {
    let dir = TempDir::new().unwrap();
    let bam = example_bam(dir.path());
    let expected = BTreeSet::from([bam.clone()]);

    let actual = unpack(&[bam.as_str()], &LocalFileSystem).unwrap();
    assert_eq!(actual, expected);

    let foo = format!("#{}", dir.path().join("foo.bam").display());
    let bar = format!("      # {}", dir.path().join("bar.bam").display());
    let list = create_list_file(dir.path(), "unpack_set.list", &["#", &bam, &foo, &bar]);

    let actual = unpack(&[list.as_str()], &LocalFileSystem).unwrap();
    assert_eq!(actual, expected);

    // Unpacking is deterministic and deduplicating
    let twice = unpack(&[list.as_str(), bam.as_str(), list.as_str()], &LocalFileSystem).unwrap();
    assert_eq!(twice, expected);
}

#[test]
fn test_missing_list_file_aborts() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.list").to_string_lossy().into_owned();
    let bam = example_bam(dir.path());

    let err = unpack_bam_file_list(&[bam, missing.clone()], &LocalFileSystem).unwrap_err();
    match err {
        ResolveError::ResourceNotFound { path, .. } => assert_eq!(path, missing),
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn test_non_list_entries_are_not_opened() {
    // Literal entries are taken as-is even when no such file exists
    let unpacked =
        unpack_bam_file_list(&["/nonexistent/a.bam", "stdin"], &LocalFileSystem).unwrap();
    let ids: Vec<&str> = unpacked.iter().map(ResourceReference::id).collect();
    assert_eq!(ids, vec!["/nonexistent/a.bam", "stdin"]);
}

#[test]
fn test_nested_list_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let inner = create_list_file(dir.path(), "inner.list", &["b.bam", "c.bam"]);
    let outer = create_list_file(dir.path(), "outer.list", &["a.bam", &inner, "a.bam"]);

    let unpacked = unpack_bam_file_list(&[outer], &LocalFileSystem).unwrap();
    let ids: Vec<&str> = unpacked.iter().map(ResourceReference::id).collect();
    assert_eq!(ids, vec!["a.bam", "b.bam", "c.bam"]);
}

#[test]
fn test_list_extension_is_case_insensitive() {
    let mut file = tempfile::Builder::new()
        .suffix(".LIST")
        .tempfile()
        .expect("Failed to create temp file");
    writeln!(file, "x.bam").unwrap();
    file.flush().unwrap();

    let path = file.path().to_string_lossy().into_owned();
    let unpacked = unpack(&[path], &LocalFileSystem).unwrap();
    assert_eq!(unpacked, BTreeSet::from(["x.bam".to_string()]));

    // Not a list file: passed through literally
    let plain = NamedTempFile::new().unwrap();
    let plain_path = plain.path().to_string_lossy().into_owned();
    let unpacked = unpack(&[plain_path.clone()], &LocalFileSystem).unwrap();
    assert_eq!(unpacked, BTreeSet::from([plain_path]));
}

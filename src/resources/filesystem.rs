use std::io;
use std::path::Path;

use crate::parsing::list_file::has_list_extension;

/// Filesystem access needed to expand list files.
pub trait FileSystem {
    /// Whether `entry` names a list file. Decided by naming convention only;
    /// a list file that does not exist is reported when it is read.
    fn is_list_file(&self, entry: &str) -> bool;

    /// All lines of the file at `entry`
    ///
    /// # Errors
    ///
    /// Returns any I/O error from opening or reading the file.
    fn read_lines(&self, entry: &str) -> io::Result<Vec<String>>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn is_list_file(&self, entry: &str) -> bool {
        has_list_extension(entry)
    }

    fn read_lines(&self, entry: &str) -> io::Result<Vec<String>> {
        let content = std::fs::read_to_string(Path::new(entry))?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

//! Filesystem port for file I/O operations.

use std::path::Path;

/// Provides filesystem access for reading, writing, and listing files.
///
/// Abstracting the filesystem allows deterministic replay and testing
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Removes a directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Lists every file below `root`, relative to it with `/` separators.
    ///
    /// Version-control metadata directories (`.git`) are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be traversed.
    fn walk_files(&self, root: &Path)
        -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}

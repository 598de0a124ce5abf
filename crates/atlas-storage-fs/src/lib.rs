//! Filesystem storage implementation for localized markdown content.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](atlas_storage::Storage) trait. Content is laid out as:
//!
//! ```text
//! <root>/<kind>/<locale>/<slug>.md
//! ```
//!
//! where `<kind>` is one of `docs`, `blog`, `clients`, `servers`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use atlas_storage::{EntityKind, Storage};
//! use atlas_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("public"));
//! for file in storage.list(EntityKind::Doc, "en")? {
//!     println!("{}: {}", file.name, file.path.display());
//! }
//! ```

mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use atlas_storage::{EntityKind, SourceFile, Storage, StorageError, StorageErrorKind};
use scanner::Scanner;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Stateless apart from the content root: every call reads the filesystem
/// afresh, so each resolution cycle sees the current snapshot.
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory containing one subdirectory per entity kind.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a locale or file name is a single plain path segment.
    ///
    /// Rejects empty segments, separators and `..` to prevent path traversal.
    fn validate_segment(segment: &str) -> Result<(), StorageError> {
        if segment.is_empty()
            || segment.contains("..")
            || segment.contains('/')
            || segment.contains('\\')
        {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(segment)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Directory holding one locale's files for one kind.
    fn locale_dir(&self, kind: EntityKind, locale: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(locale)
    }

    /// Path of a single content file.
    fn file_path(&self, kind: EntityKind, locale: &str, name: &str) -> PathBuf {
        self.locale_dir(kind, locale).join(format!("{name}.md"))
    }
}

impl Storage for FsStorage {
    fn list(&self, kind: EntityKind, locale: &str) -> Result<Vec<SourceFile>, StorageError> {
        Self::validate_segment(locale)?;
        let dir = self.locale_dir(kind, locale);
        let files = Scanner::scan(&dir)
            .map_err(|e| StorageError::io(e, Some(dir.clone())).with_backend(BACKEND))?;
        tracing::debug!(dir = %dir.display(), file_count = files.len(), "Scanned content directory");
        Ok(files)
    }

    fn read(&self, kind: EntityKind, locale: &str, name: &str) -> Result<String, StorageError> {
        Self::validate_segment(locale)?;
        Self::validate_segment(name)?;
        let path = self.file_path(kind, locale, name);
        fs::read_to_string(&path)
            .map_err(|e| StorageError::io(e, Some(path.clone())).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_locale_dir() {
        let temp_dir = create_test_dir();
        write_file(temp_dir.path(), "docs/en/intro.md", "# Intro");
        write_file(temp_dir.path(), "docs/en/quickstart.md", "# Quickstart");
        write_file(temp_dir.path(), "docs/zh/intro.md", "# 介绍");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let mut names: Vec<_> = storage
            .list(EntityKind::Doc, "en")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["intro".to_owned(), "quickstart".to_owned()]);
    }

    #[test]
    fn test_list_missing_locale_is_not_found() {
        let temp_dir = create_test_dir();
        write_file(temp_dir.path(), "docs/en/intro.md", "# Intro");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let err = storage.list(EntityKind::Doc, "fr").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Fs"));
        assert!(err.path.unwrap().ends_with("docs/fr"));
    }

    #[test]
    fn test_list_kinds_are_separate() {
        let temp_dir = create_test_dir();
        write_file(temp_dir.path(), "servers/en/github.md", "x");
        write_file(temp_dir.path(), "clients/en/cursor.md", "y");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let servers = storage.list(EntityKind::Server, "en").unwrap();
        let clients = storage.list(EntityKind::Client, "en").unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "github");
        assert_eq!(clients[0].name, "cursor");
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = create_test_dir();
        write_file(temp_dir.path(), "blog/en/launch.md", "---\ntitle: Launch\n---\nHi");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let content = storage.read(EntityKind::Blog, "en", "launch").unwrap();

        assert_eq!(content, "---\ntitle: Launch\n---\nHi");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let err = storage.read(EntityKind::Blog, "en", "missing").unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read(EntityKind::Doc, "en", "../secret").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        let err = storage.list(EntityKind::Doc, "..").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        let err = storage.list(EntityKind::Doc, "").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_traversal_in_name() {
        let temp_dir = create_test_dir();
        write_file(temp_dir.path(), "docs/en/intro.md", "# Intro");

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read(EntityKind::Doc, "en", "../intro").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }
}

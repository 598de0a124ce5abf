//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::kind::EntityKind;
use crate::storage::{SourceFile, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// One mocked file. `content` is `None` for files that list but fail to read.
#[derive(Clone, Debug)]
struct MockFile {
    name: String,
    content: Option<String>,
}

/// Mock storage for testing.
///
/// Stores content in memory, keyed by `(kind, locale)`. A directory exists
/// once any builder method touched it; listing an untouched directory
/// returns a not found error, like a missing locale directory on disk.
/// Files are listed in insertion order.
///
/// # Example
///
/// ```ignore
/// use atlas_storage::{EntityKind, MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file(EntityKind::Doc, "en", "intro", "---\ntitle: Intro\n---\nBody");
///
/// let files = storage.list(EntityKind::Doc, "en").unwrap();
/// let content = storage.read(EntityKind::Doc, "en", "intro").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    dirs: RwLock<HashMap<(EntityKind, String), Vec<MockFile>>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty `(kind, locale)` directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, kind: EntityKind, locale: impl Into<String>) -> Self {
        self.dirs
            .write()
            .unwrap()
            .entry((kind, locale.into()))
            .or_default();
        self
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        kind: EntityKind,
        locale: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.set_file(kind, locale, name, content);
        self
    }

    /// Add a file that is listed but cannot be read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(
        self,
        kind: EntityKind,
        locale: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.dirs
            .write()
            .unwrap()
            .entry((kind, locale.into()))
            .or_default()
            .push(MockFile {
                name: name.into(),
                content: None,
            });
        self
    }

    /// Insert or replace a file after construction.
    ///
    /// Replacing keeps the file's initial listing position.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(
        &self,
        kind: EntityKind,
        locale: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) {
        let name = name.into();
        let content = Some(content.into());
        let mut dirs = self.dirs.write().unwrap();
        let files = dirs.entry((kind, locale.into())).or_default();
        match files.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.content = content,
            None => files.push(MockFile { name, content }),
        }
    }

    /// Remove a whole `(kind, locale)` directory.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_dir(&self, kind: EntityKind, locale: &str) {
        self.dirs
            .write()
            .unwrap()
            .remove(&(kind, locale.to_owned()));
    }

    fn file_path(kind: EntityKind, locale: &str, name: &str) -> PathBuf {
        PathBuf::from(kind.dir_name()).join(locale).join(format!("{name}.md"))
    }
}

impl Storage for MockStorage {
    fn list(&self, kind: EntityKind, locale: &str) -> Result<Vec<SourceFile>, StorageError> {
        let dirs = self.dirs.read().unwrap();
        let files = dirs.get(&(kind, locale.to_owned())).ok_or_else(|| {
            StorageError::not_found(PathBuf::from(kind.dir_name()).join(locale))
                .with_backend(BACKEND)
        })?;
        Ok(files
            .iter()
            .map(|f| SourceFile {
                name: f.name.clone(),
                path: Self::file_path(kind, locale, &f.name),
            })
            .collect())
    }

    fn read(&self, kind: EntityKind, locale: &str, name: &str) -> Result<String, StorageError> {
        let dirs = self.dirs.read().unwrap();
        let file = dirs
            .get(&(kind, locale.to_owned()))
            .and_then(|files| files.iter().find(|f| f.name == name))
            .ok_or_else(|| {
                StorageError::not_found(Self::file_path(kind, locale, name)).with_backend(BACKEND)
            })?;
        file.content.clone().ok_or_else(|| {
            StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(Self::file_path(kind, locale, name))
                .with_backend(BACKEND)
        })
    }
}

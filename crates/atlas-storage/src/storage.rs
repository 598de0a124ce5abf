//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for listing and reading localized
//! content files, along with [`StorageError`] for unified error handling
//! across backends.
//!
//! # Layout Convention
//!
//! Content is addressed by `(kind, locale, name)`:
//! - `kind` selects the top-level directory (`docs`, `blog`, `clients`, `servers`)
//! - `locale` selects the subdirectory (`en`, `zh`, ...)
//! - `name` is the file stem (`intro` for `intro.md`)
//!
//! Storage implementations handle the mapping to their internal format.

use std::path::PathBuf;

use crate::kind::EntityKind;

/// Reference to a content file returned by [`Storage::list`].
///
/// Contains only the location; content is fetched with [`Storage::read`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// File stem, used as the default slug.
    pub name: String,
    /// Backend-specific path, used in diagnostics.
    pub path: PathBuf,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Content exists but cannot be decoded (e.g. not UTF-8).
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Whether this error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for listing and reading localized content.
///
/// Implementations are read-only; nothing in this workspace writes content.
pub trait Storage: Send + Sync {
    /// List content files for one `(kind, locale)` directory.
    ///
    /// The returned order is the backend's enumeration order. Callers that
    /// need a particular order must sort themselves.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the locale directory does not
    /// exist, or another kind if listing fails.
    fn list(&self, kind: EntityKind, locale: &str) -> Result<Vec<SourceFile>, StorageError>;

    /// Read the raw content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read(&self, kind: EntityKind, locale: &str, name: &str) -> Result<String, StorageError>;
}

//! Error types for entity loading.

use std::path::PathBuf;

use atlas_storage::{EntityKind, StorageError};

/// Failure to load a whole `(locale, kind)` collection.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The locale has no directory for this kind.
    ///
    /// Callers treat this as an empty collection, not as a failure.
    #[error("Content directory missing for {kind}/{locale}")]
    DirectoryMissing {
        /// Entity kind.
        kind: EntityKind,
        /// Locale code.
        locale: String,
    },
    /// Listing the directory failed for another reason.
    #[error("Failed to list {kind}/{locale}: {source}")]
    Storage {
        /// Entity kind.
        kind: EntityKind,
        /// Locale code.
        locale: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

/// Malformed front-matter in a single file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// File does not start with a `---` delimited block.
    #[error("Missing front-matter block")]
    MissingFrontMatter,
    /// Front-matter is not valid YAML or has wrongly typed fields.
    #[error("Invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A required field is absent or blank.
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),
    /// Date value is neither RFC 3339 nor `YYYY-MM-DD`.
    #[error("Invalid date `{0}`")]
    InvalidDate(String),
}

/// Why a single file was left out of a collection.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("{0}")]
    Read(#[from] StorageError),
    /// The file could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// A file skipped during loading, with the reason.
#[derive(Debug)]
pub struct SkippedFile {
    /// Offending path.
    pub path: PathBuf,
    /// What went wrong.
    pub error: FileError,
}

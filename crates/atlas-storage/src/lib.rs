//! Storage abstraction for localized markdown content.
//!
//! This crate provides a [`Storage`] trait for abstracting how content files
//! are listed and read. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (filesystem today, object stores later)
//! - **Clean separation** between entity parsing and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`EntityKind`] naming the four content collections
//! - [`Storage`] trait with `list()` and `read()` methods
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in `atlas-storage-fs`.
//!
//! # Example
//!
//! ```ignore
//! use atlas_storage::{EntityKind, Storage};
//!
//! for file in storage.list(EntityKind::Doc, "en")? {
//!     let raw = storage.read(EntityKind::Doc, "en", &file.name)?;
//! }
//! ```

mod kind;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use kind::{EntityKind, UnknownKind};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{SourceFile, Storage, StorageError, StorageErrorKind};

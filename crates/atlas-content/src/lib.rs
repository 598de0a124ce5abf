//! Markdown-backed content entities.
//!
//! This crate provides:
//! - [`Entity`]: normalized record for docs, blog posts, clients and servers
//! - [`parse_entity`]: front-matter + body parsing for a single file
//! - [`EntityLoader`]: loads one `(locale, kind)` collection from a
//!   [`Storage`](atlas_storage::Storage) backend with per-file error containment
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use atlas_content::EntityLoader;
//! use atlas_storage::EntityKind;
//! use atlas_storage_fs::FsStorage;
//!
//! let loader = EntityLoader::new(Arc::new(FsStorage::new(PathBuf::from("public"))));
//! let loaded = loader.load_or_empty("en", EntityKind::Doc)?;
//! for entity in &loaded.entities {
//!     println!("{} ({})", entity.title, entity.slug);
//! }
//! # Ok(())
//! # }
//! ```

mod entity;
mod error;
mod front_matter;
mod loader;

pub use entity::Entity;
pub use error::{FileError, LoadError, ParseError, SkippedFile};
pub use front_matter::parse_entity;
pub use loader::{EntityLoader, LoadedEntities};

// Re-export EntityKind so consumers need only this crate for the model
pub use atlas_storage::EntityKind;

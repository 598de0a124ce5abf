//! Localized content resolution.
//!
//! This crate provides:
//! - [`LocaleIndex`]: slug, section, tag, featured and date lookups over one
//!   `(locale, kind)` collection
//! - [`Filter`], [`filter`] and [`tags_used`]: list page filtering
//! - [`resolve_siblings`]: prev/next document navigation
//! - [`recommend`]: related items with tiered fallback
//! - [`SiteLoader`]: per-locale resolution cycles behind a revalidation window
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use atlas_site::{EntityKind, Filter, SiteConfig, SiteLoader, filter};
//! use atlas_storage_fs::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("public")));
//! let loader = SiteLoader::new(SiteConfig::default(), storage);
//!
//! let content = loader.locale("en")?;
//! let query = Filter::from_query([("tags", "database")]);
//! let servers = filter(content.servers().entities(), &query);
//!
//! let siblings = content.siblings("quickstart");
//! let related = content.related(EntityKind::Server, "github", &mut rand::rng());
//! # Ok(())
//! # }
//! ```

mod index;
mod navigator;
mod query;
mod recommend;
mod site_loader;

pub use index::{IndexError, LocaleIndex, Section};
pub use navigator::{Siblings, resolve_siblings};
pub use query::{Filter, KEYWORD_PARAM, TAG_PARAM, filter, tags_used};
pub use recommend::{DEFAULT_RELATED_COUNT, recommend};
pub use site_loader::{
    DEFAULT_REVALIDATE, LocaleContent, SiteConfig, SiteError, SiteLoader, StaticPath,
};

// Re-export the entity model for convenience
pub use atlas_content::{Entity, EntityKind};

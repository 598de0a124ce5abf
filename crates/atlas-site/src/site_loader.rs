//! Per-locale resolution cycles with a revalidation window.
//!
//! Provides [`SiteLoader`] for turning a [`Storage`] backend into immutable
//! [`LocaleContent`] snapshots, one per configured locale.
//!
//! # Resolution cycle
//!
//! A cycle loads all four entity kinds for one locale and builds one
//! [`LocaleIndex`] per kind. Missing kind directories yield empty indices,
//! malformed files are skipped, and a duplicate slug fails the whole cycle for
//! that locale only.
//!
//! # Thread Safety
//!
//! `SiteLoader` is designed for concurrent access:
//! - `locale()` returns `Arc<LocaleContent>` with minimal locking (just Arc clone)
//!   while the snapshot is younger than the revalidation window
//! - stale snapshots are rebuilt under a per-locale `Mutex<()>` with
//!   double-checked validity, so each locale is rebuilt at most once at a time
//! - readers keep their existing `Arc` across reloads and never observe partial
//!   state
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use atlas_site::{SiteConfig, SiteLoader};
//! use atlas_storage_fs::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("public")));
//! let loader = SiteLoader::new(SiteConfig::default(), storage);
//!
//! let content = loader.locale("en")?;
//! let featured = content.servers().featured(0);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use atlas_config::Config;
use atlas_content::{Entity, EntityKind, EntityLoader, LoadError, SkippedFile};
use atlas_storage::Storage;
use rayon::prelude::*;
use serde::Serialize;

use crate::index::{IndexError, LocaleIndex};
use crate::navigator::{Siblings, resolve_siblings};
use crate::recommend::{DEFAULT_RELATED_COUNT, recommend};

/// Default revalidation window: one hour.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(3600);

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Configuration for [`SiteLoader`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Configured locales, in display order.
    pub locales: Vec<String>,
    /// Declaration order of doc sections.
    pub section_order: Vec<String>,
    /// How long a resolved snapshot is reused. Zero disables reuse.
    pub revalidate: Duration,
    /// Maximum number of related items per detail page.
    pub related_count: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_owned()],
            section_order: Vec::new(),
            revalidate: DEFAULT_REVALIDATE,
            related_count: DEFAULT_RELATED_COUNT,
        }
    }
}

impl From<&Config> for SiteConfig {
    fn from(config: &Config) -> Self {
        Self {
            locales: config.content_resolved.locales.clone(),
            section_order: config.docs.sections.clone(),
            revalidate: config.cache.revalidate(),
            related_count: config.related.max_count,
        }
    }
}

/// Error returned when a locale cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Locale is not part of the configured set.
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
    /// A content directory could not be listed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// An index could not be built.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// One `(locale, slug)` pair for static page generation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct StaticPath {
    /// Locale code.
    pub locale: String,
    /// Entity slug.
    pub slug: String,
}

/// Immutable content snapshot for one locale.
#[derive(Debug)]
pub struct LocaleContent {
    locale: String,
    docs: LocaleIndex,
    blog: LocaleIndex,
    clients: LocaleIndex,
    servers: LocaleIndex,
    skipped: Vec<SkippedFile>,
    related_count: usize,
}

impl LocaleContent {
    fn empty(locale: &str, related_count: usize) -> Self {
        Self {
            locale: locale.to_owned(),
            docs: LocaleIndex::empty(locale, EntityKind::Doc),
            blog: LocaleIndex::empty(locale, EntityKind::Blog),
            clients: LocaleIndex::empty(locale, EntityKind::Client),
            servers: LocaleIndex::empty(locale, EntityKind::Server),
            skipped: Vec::new(),
            related_count,
        }
    }

    fn index_mut(&mut self, kind: EntityKind) -> &mut LocaleIndex {
        match kind {
            EntityKind::Doc => &mut self.docs,
            EntityKind::Blog => &mut self.blog,
            EntityKind::Client => &mut self.clients,
            EntityKind::Server => &mut self.servers,
        }
    }

    /// Locale code.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Index for `kind`.
    #[must_use]
    pub fn index(&self, kind: EntityKind) -> &LocaleIndex {
        match kind {
            EntityKind::Doc => &self.docs,
            EntityKind::Blog => &self.blog,
            EntityKind::Client => &self.clients,
            EntityKind::Server => &self.servers,
        }
    }

    /// Documentation pages.
    #[must_use]
    pub fn docs(&self) -> &LocaleIndex {
        &self.docs
    }

    /// Blog posts.
    #[must_use]
    pub fn blog(&self) -> &LocaleIndex {
        &self.blog
    }

    /// Client directory entries.
    #[must_use]
    pub fn clients(&self) -> &LocaleIndex {
        &self.clients
    }

    /// Server directory entries.
    #[must_use]
    pub fn servers(&self) -> &LocaleIndex {
        &self.servers
    }

    /// Files left out of this snapshot.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Prev/next neighbours of a document.
    #[must_use]
    pub fn siblings(&self, slug: &str) -> Siblings<'_> {
        resolve_siblings(&self.docs, slug)
    }

    /// Related items for the entity `slug` of `kind`.
    ///
    /// Returns an empty list if the slug is unknown.
    pub fn related<R>(&self, kind: EntityKind, slug: &str, rng: &mut R) -> Vec<&Entity>
    where
        R: rand::Rng + ?Sized,
    {
        let index = self.index(kind);
        match index.by_slug(slug) {
            Some(source) => recommend(index.entities(), source, self.related_count, rng),
            None => Vec::new(),
        }
    }
}

struct CachedLocale {
    content: Arc<LocaleContent>,
    loaded_at: Instant,
}

/// Resolves and caches per-locale content snapshots.
///
/// # Thread Safety
///
/// This struct is designed for concurrent access without external locking:
/// - Uses internal `RwLock<HashMap<..>>` for the current snapshots
/// - Uses one `Mutex<()>` per configured locale for serializing reloads
pub struct SiteLoader {
    config: SiteConfig,
    loader: EntityLoader,
    /// Reload locks, one per configured locale.
    reload_locks: HashMap<String, Mutex<()>>,
    /// Current snapshots (atomically swappable).
    snapshots: RwLock<HashMap<String, CachedLocale>>,
}

impl SiteLoader {
    /// Create a new site loader.
    ///
    /// # Arguments
    ///
    /// * `config` - Locale set, section order and cache settings
    /// * `storage` - Storage implementation for content files
    #[must_use]
    pub fn new(config: SiteConfig, storage: Arc<dyn Storage>) -> Self {
        let reload_locks = config
            .locales
            .iter()
            .map(|locale| (locale.clone(), Mutex::new(())))
            .collect();

        Self {
            config,
            loader: EntityLoader::new(storage),
            reload_locks,
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Configured locales.
    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.config.locales
    }

    /// Get the content snapshot for `locale`, rebuilding it if stale.
    ///
    /// Uses double-checked locking pattern:
    /// 1. Fast path: return cached snapshot if younger than the window
    /// 2. Slow path: acquire the locale's reload lock, recheck, then reload
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownLocale`] for a locale outside the
    /// configured set, or the cycle's load/index error.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn locale(&self, locale: &str) -> Result<Arc<LocaleContent>, SiteError> {
        let reload_lock = self
            .reload_locks
            .get(locale)
            .ok_or_else(|| SiteError::UnknownLocale(locale.to_owned()))?;

        // Fast path: snapshot still fresh
        if let Some(content) = self.fresh(locale) {
            return Ok(content);
        }

        // Slow path: acquire reload lock
        let _guard = reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        if let Some(content) = self.fresh(locale) {
            return Ok(content);
        }

        let content = Arc::new(self.resolve(locale)?);
        self.snapshots.write().unwrap().insert(
            locale.to_owned(),
            CachedLocale {
                content: Arc::clone(&content),
                loaded_at: Instant::now(),
            },
        );

        Ok(content)
    }

    /// Resolve every configured locale concurrently.
    ///
    /// Results follow configuration order. A failing locale does not affect
    /// the others.
    pub fn load_all(&self) -> Vec<(String, Result<Arc<LocaleContent>, SiteError>)> {
        self.config
            .locales
            .par_iter()
            .map(|locale| (locale.clone(), self.locale(locale)))
            .collect()
    }

    /// Every `(locale, slug)` pair of `kind` for static generation.
    ///
    /// Locales that fail to resolve are logged and contribute nothing.
    pub fn static_paths(&self, kind: EntityKind) -> Vec<StaticPath> {
        let mut paths = Vec::new();
        for (locale, result) in self.load_all() {
            match result {
                Ok(content) => paths.extend(content.index(kind).entities().iter().map(|e| {
                    StaticPath {
                        locale: locale.clone(),
                        slug: e.slug.clone(),
                    }
                })),
                Err(e) => {
                    tracing::warn!(%locale, %kind, error = %e, "Skipping locale for static paths");
                }
            }
        }
        paths
    }

    /// Drop all cached snapshots.
    ///
    /// Next `locale()` call rebuilds. Current readers keep their existing
    /// `Arc<LocaleContent>`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn invalidate(&self) {
        self.snapshots.write().unwrap().clear();
    }

    fn fresh(&self, locale: &str) -> Option<Arc<LocaleContent>> {
        let snapshots = self.snapshots.read().unwrap();
        snapshots
            .get(locale)
            .filter(|cached| cached.loaded_at.elapsed() < self.config.revalidate)
            .map(|cached| Arc::clone(&cached.content))
    }

    /// Run one resolution cycle: load every kind, then build every index.
    fn resolve(&self, locale: &str) -> Result<LocaleContent, SiteError> {
        let start = Instant::now();
        let mut content = LocaleContent::empty(locale, self.config.related_count);

        let load_start = Instant::now();
        let results = self.loader.load_kinds(locale, &EntityKind::ALL);
        let load_ms = elapsed_ms(load_start);

        for (kind, result) in results {
            let loaded = result?;
            let section_order: &[String] = match kind {
                EntityKind::Doc => &self.config.section_order,
                _ => &[],
            };
            *content.index_mut(kind) =
                LocaleIndex::build(locale, kind, loaded.entities, section_order)?;
            content.skipped.extend(loaded.skipped);
        }

        tracing::info!(
            locale,
            doc_count = content.docs.len(),
            blog_count = content.blog.len(),
            client_count = content.clients.len(),
            server_count = content.servers.len(),
            skipped_count = content.skipped.len(),
            load_ms,
            elapsed_ms = elapsed_ms(start),
            "Locale resolved"
        );

        Ok(content)
    }
}

//! Entity loading from storage.
//!
//! Provides [`EntityLoader`] for turning one `(locale, kind)` directory into a
//! sequence of [`Entity`] records.
//!
//! # Error containment
//!
//! - A missing locale directory fails the whole load with
//!   [`LoadError::DirectoryMissing`]; [`EntityLoader::load_or_empty`] turns it
//!   into an empty collection.
//! - A file that cannot be read or parsed is skipped, logged, and reported in
//!   [`LoadedEntities::skipped`]. The rest of the batch still loads.
//!
//! # Ordering
//!
//! Entities come back in storage enumeration order. File reads run in parallel
//! on the rayon pool, but results are collected back into listing order.

use std::sync::Arc;
use std::time::Instant;

use atlas_storage::{EntityKind, SourceFile, Storage};
use rayon::prelude::*;

use crate::entity::Entity;
use crate::error::{FileError, LoadError, SkippedFile};
use crate::front_matter::parse_entity;

/// Result of loading one `(locale, kind)` directory.
#[derive(Debug, Default)]
pub struct LoadedEntities {
    /// Successfully parsed entities, in storage enumeration order.
    pub entities: Vec<Entity>,
    /// Files left out, with reasons.
    pub skipped: Vec<SkippedFile>,
}

/// Loads entities from a [`Storage`] backend.
///
/// Pure read: holds no state besides the storage handle, so one loader can
/// serve any number of concurrent resolution cycles.
#[derive(Clone)]
pub struct EntityLoader {
    storage: Arc<dyn Storage>,
}

impl EntityLoader {
    /// Create a loader over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load every entity of `kind` for `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DirectoryMissing`] if the locale has no directory
    /// for this kind, or [`LoadError::Storage`] if listing fails otherwise.
    /// Per-file failures never surface here.
    pub fn load(&self, locale: &str, kind: EntityKind) -> Result<LoadedEntities, LoadError> {
        let start = Instant::now();

        let files = self.storage.list(kind, locale).map_err(|e| {
            if e.is_not_found() {
                LoadError::DirectoryMissing {
                    kind,
                    locale: locale.to_owned(),
                }
            } else {
                LoadError::Storage {
                    kind,
                    locale: locale.to_owned(),
                    source: e,
                }
            }
        })?;

        let results: Vec<_> = files
            .par_iter()
            .map(|file| self.load_file(locale, kind, file))
            .collect();

        let mut loaded = LoadedEntities::default();
        for (file, result) in files.into_iter().zip(results) {
            match result {
                Ok(entity) => loaded.entities.push(entity),
                Err(error) => {
                    tracing::warn!(path = %file.path.display(), error = %error, "Skipping content file");
                    loaded.skipped.push(SkippedFile {
                        path: file.path,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            %kind,
            locale,
            entity_count = loaded.entities.len(),
            skipped_count = loaded.skipped.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Loaded entities"
        );

        Ok(loaded)
    }

    /// Like [`load`](Self::load), but a missing directory yields an empty
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Storage`] for listing failures other than a
    /// missing directory.
    pub fn load_or_empty(
        &self,
        locale: &str,
        kind: EntityKind,
    ) -> Result<LoadedEntities, LoadError> {
        match self.load(locale, kind) {
            Err(e @ LoadError::DirectoryMissing { .. }) => {
                tracing::warn!(error = %e, "No content for locale, treating as empty");
                Ok(LoadedEntities::default())
            }
            other => other,
        }
    }

    /// Load several kinds for one locale concurrently.
    ///
    /// Results are returned in the order of `kinds`, once every read has
    /// finished. Missing directories collapse to empty collections as in
    /// [`load_or_empty`](Self::load_or_empty).
    pub fn load_kinds(
        &self,
        locale: &str,
        kinds: &[EntityKind],
    ) -> Vec<(EntityKind, Result<LoadedEntities, LoadError>)> {
        kinds
            .par_iter()
            .map(|&kind| (kind, self.load_or_empty(locale, kind)))
            .collect()
    }

    fn load_file(
        &self,
        locale: &str,
        kind: EntityKind,
        file: &SourceFile,
    ) -> Result<Entity, FileError> {
        let raw = self.storage.read(kind, locale, &file.name)?;
        Ok(parse_entity(kind, locale, &file.name, &file.path, &raw)?)
    }
}

#[cfg(test)]
mod tests {
    use atlas_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ParseError;

    fn doc(title: &str, section: &str) -> String {
        format!("---\ntitle: {title}\ndescription: About {title}\nsection: {section}\n---\n# {title}\n")
    }

    fn loader(storage: MockStorage) -> EntityLoader {
        EntityLoader::new(Arc::new(storage))
    }

    #[test]
    fn test_load_preserves_enumeration_order() {
        let storage = MockStorage::new()
            .with_file(EntityKind::Doc, "en", "zeta", doc("Zeta", "guide"))
            .with_file(EntityKind::Doc, "en", "alpha", doc("Alpha", "guide"))
            .with_file(EntityKind::Doc, "en", "mid", doc("Mid", "reference"));

        let loaded = loader(storage).load("en", EntityKind::Doc).unwrap();

        let slugs: Vec<_> = loaded.entities.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["zeta", "alpha", "mid"]);
        assert!(loaded.skipped.is_empty());
        assert!(loaded.entities.iter().all(|e| e.locale == "en"));
        assert!(loaded.entities.iter().all(|e| e.kind == EntityKind::Doc));
    }

    #[test]
    fn test_load_missing_directory() {
        let storage = MockStorage::new().with_file(EntityKind::Doc, "en", "a", doc("A", "s"));

        let err = loader(storage).load("fr", EntityKind::Doc).unwrap_err();

        assert!(matches!(
            err,
            LoadError::DirectoryMissing { kind: EntityKind::Doc, ref locale } if locale == "fr"
        ));
    }

    #[test]
    fn test_load_or_empty_collapses_missing_directory() {
        let loaded = loader(MockStorage::new())
            .load_or_empty("fr", EntityKind::Doc)
            .unwrap();

        assert!(loaded.entities.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_skips_malformed_file() {
        let storage = MockStorage::new()
            .with_file(EntityKind::Doc, "en", "good", doc("Good", "guide"))
            .with_file(EntityKind::Doc, "en", "bad", "no front matter here")
            .with_file(EntityKind::Doc, "en", "also-good", doc("Also", "guide"));

        let loaded = loader(storage).load("en", EntityKind::Doc).unwrap();

        let slugs: Vec<_> = loaded.entities.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["good", "also-good"]);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].path.ends_with("bad.md"));
        assert!(matches!(
            loaded.skipped[0].error,
            FileError::Parse(ParseError::MissingFrontMatter)
        ));
    }

    #[test]
    fn test_load_skips_unreadable_file() {
        let storage = MockStorage::new()
            .with_unreadable(EntityKind::Server, "en", "locked")
            .with_file(
                EntityKind::Server,
                "en",
                "github",
                "---\nname: GitHub\ndigest: Git\n---\n",
            );

        let loaded = loader(storage).load("en", EntityKind::Server).unwrap();

        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entities[0].slug, "github");
        assert!(matches!(loaded.skipped[0].error, FileError::Read(_)));
    }

    #[test]
    fn test_load_kinds_isolated() {
        let storage = MockStorage::new()
            .with_file(EntityKind::Doc, "en", "intro", doc("Intro", "guide"))
            .with_file(
                EntityKind::Server,
                "en",
                "github",
                "---\nname: GitHub\ndigest: Git\n---\n",
            );

        let results = loader(storage).load_kinds("en", &EntityKind::ALL);

        let kinds: Vec<_> = results.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
        let counts: Vec<_> = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().entities.len())
            .collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
    }
}

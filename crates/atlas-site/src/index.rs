//! Per-locale lookup index over one entity collection.
//!
//! # Architecture
//!
//! Entities are stored in a flat `Vec<Entity>` in loader order, with derived
//! lookups tracked by position:
//! - O(1) slug lookups via a `HashMap`
//! - O(1) tag lookups returning positions in collection order
//! - sections as ordered lists of positions
//!
//! The index is built once per resolution cycle and never mutated. A build
//! either succeeds completely or fails with [`IndexError`]; there is no
//! partially built index.

use std::collections::HashMap;
use std::path::PathBuf;

use atlas_content::{Entity, EntityKind};

/// Error returned when an index cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Two entities in one `(locale, kind)` collection share a slug.
    #[error(
        "Duplicate slug `{slug}` in {kind}/{locale}: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        /// Locale code.
        locale: String,
        /// Entity kind.
        kind: EntityKind,
        /// Conflicting slug.
        slug: String,
        /// Source of the entity that claimed the slug first.
        first: PathBuf,
        /// Source of the conflicting entity.
        second: PathBuf,
    },
}

/// Named group of doc entities, borrowed from a [`LocaleIndex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<'a> {
    /// Section name.
    pub name: &'a str,
    /// Entities in loader order.
    pub entities: Vec<&'a Entity>,
}

#[derive(Debug)]
struct SectionSlots {
    name: String,
    members: Vec<usize>,
}

/// Immutable lookup structure for one `(locale, kind)` collection.
#[derive(Debug)]
pub struct LocaleIndex {
    locale: String,
    kind: EntityKind,
    entities: Vec<Entity>,
    slug_index: HashMap<String, usize>,
    tag_index: HashMap<String, Vec<usize>>,
    sections: Vec<SectionSlots>,
}

impl LocaleIndex {
    /// Build an index over `entities`.
    ///
    /// `section_order` is the configured declaration order for doc sections.
    /// Sections found in content but missing from it are appended in
    /// first-appearance order. Entities without a section are reachable by
    /// slug and tag but belong to no section.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateSlug`] if two entities share a slug.
    pub fn build(
        locale: impl Into<String>,
        kind: EntityKind,
        entities: Vec<Entity>,
        section_order: &[String],
    ) -> Result<Self, IndexError> {
        let locale = locale.into();
        let mut slug_index = HashMap::with_capacity(entities.len());
        let mut tag_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut sections: Vec<SectionSlots> = section_order
            .iter()
            .map(|name| SectionSlots {
                name: name.clone(),
                members: Vec::new(),
            })
            .collect();
        let mut section_pos: HashMap<String, usize> = section_order
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.clone(), pos))
            .collect();

        for (idx, entity) in entities.iter().enumerate() {
            if let Some(&first) = slug_index.get(&entity.slug) {
                let first: &Entity = &entities[first];
                return Err(IndexError::DuplicateSlug {
                    locale,
                    kind,
                    slug: entity.slug.clone(),
                    first: first.source.clone(),
                    second: entity.source.clone(),
                });
            }
            slug_index.insert(entity.slug.clone(), idx);

            for tag in &entity.tags {
                tag_index.entry(tag.clone()).or_default().push(idx);
            }

            if kind == EntityKind::Doc
                && let Some(name) = &entity.section
            {
                let pos = *section_pos.entry(name.clone()).or_insert_with(|| {
                    sections.push(SectionSlots {
                        name: name.clone(),
                        members: Vec::new(),
                    });
                    sections.len() - 1
                });
                sections[pos].members.push(idx);
            }
        }

        sections.retain(|s| !s.members.is_empty());

        Ok(Self {
            locale,
            kind,
            entities,
            slug_index,
            tag_index,
            sections,
        })
    }

    /// Empty index, used when a locale has no content of this kind.
    #[must_use]
    pub fn empty(locale: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            locale: locale.into(),
            kind,
            entities: Vec::new(),
            slug_index: HashMap::new(),
            tag_index: HashMap::new(),
            sections: Vec::new(),
        }
    }

    /// Locale this index was built for.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Entity kind of the collection.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// All entities in loader order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by slug.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&Entity> {
        self.slug_index.get(slug).map(|&idx| &self.entities[idx])
    }

    /// Sections in display order, each with its entities in loader order.
    ///
    /// Empty sections are omitted.
    #[must_use]
    pub fn by_section(&self) -> Vec<Section<'_>> {
        self.sections
            .iter()
            .map(|s| Section {
                name: &s.name,
                entities: s.members.iter().map(|&idx| &self.entities[idx]).collect(),
            })
            .collect()
    }

    /// Entities carrying `tag` (exact match), in collection order.
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.tag_index
            .get(tag)
            .map(|members| members.iter().map(|&idx| &self.entities[idx]).collect())
            .unwrap_or_default()
    }

    /// Featured entities in collection order. `limit == 0` returns all of them.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Entity> {
        let featured = self.entities.iter().filter(|e| e.featured);
        if limit == 0 {
            featured.collect()
        } else {
            featured.take(limit).collect()
        }
    }

    /// Entities by publish date, newest first. `limit == 0` returns all.
    ///
    /// Undated entities come last; ties keep collection order.
    #[must_use]
    pub fn latest(&self, limit: usize) -> Vec<&Entity> {
        let mut sorted: Vec<&Entity> = self.entities.iter().collect();
        // Option orders None before Some, so reversing puts undated last
        sorted.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        if limit > 0 {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Distinct categories in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for category in self.entities.iter().filter_map(|e| e.category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Walk sections in order and return the first entity with `slug`.
    pub(crate) fn find_in_sections(&self, slug: &str) -> Option<&Entity> {
        self.sections
            .iter()
            .flat_map(|s| s.members.iter())
            .map(|&idx| &self.entities[idx])
            .find(|e| e.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(slug: &str, section: &str) -> Entity {
        Entity::new(EntityKind::Doc, "en", slug, slug).with_section(section)
    }

    fn server(slug: &str) -> Entity {
        Entity::new(EntityKind::Server, "en", slug, slug)
    }

    fn slugs(entities: &[&Entity]) -> Vec<String> {
        entities.iter().map(|e| e.slug.clone()).collect()
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|&n| n.to_owned()).collect()
    }

    #[test]
    fn test_by_slug_returns_every_entity() {
        let entities = vec![server("a"), server("b"), server("c")];
        let index = LocaleIndex::build("en", EntityKind::Server, entities.clone(), &[]).unwrap();

        for entity in &entities {
            assert_eq!(index.by_slug(&entity.slug), Some(entity));
        }
        assert_eq!(index.len(), 3);
        assert!(index.by_slug("missing").is_none());
    }

    #[test]
    fn test_entities_keep_loader_order() {
        let index = LocaleIndex::build(
            "en",
            EntityKind::Server,
            vec![server("z"), server("a"), server("m")],
            &[],
        )
        .unwrap();

        let slugs: Vec<_> = index.entities().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_slug_fails_build() {
        let mut a = server("home");
        a.source = PathBuf::from("servers/en/a.md");
        let mut b = server("home");
        b.source = PathBuf::from("servers/en/b.md");

        let err = LocaleIndex::build("en", EntityKind::Server, vec![a, b], &[]).unwrap_err();

        let IndexError::DuplicateSlug {
            slug,
            first,
            second,
            ..
        } = &err;
        assert_eq!(slug, "home");
        assert_eq!(first, &PathBuf::from("servers/en/a.md"));
        assert_eq!(second, &PathBuf::from("servers/en/b.md"));
        assert_eq!(
            err.to_string(),
            "Duplicate slug `home` in servers/en: servers/en/a.md and servers/en/b.md"
        );
    }

    #[test]
    fn test_by_section_follows_configured_order() {
        let entities = vec![
            doc("api", "reference"),
            doc("intro", "getting-started"),
            doc("cli", "reference"),
            doc("quickstart", "getting-started"),
        ];
        let index = LocaleIndex::build(
            "en",
            EntityKind::Doc,
            entities,
            &order(&["getting-started", "reference"]),
        )
        .unwrap();

        let sections = index.by_section();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "getting-started");
        assert_eq!(slugs(&sections[0].entities), vec!["intro", "quickstart"]);
        assert_eq!(sections[1].name, "reference");
        assert_eq!(slugs(&sections[1].entities), vec!["api", "cli"]);
    }

    #[test]
    fn test_by_section_unconfigured_sections_follow_in_appearance_order() {
        let entities = vec![
            doc("faq", "misc"),
            doc("intro", "getting-started"),
            doc("blog-howto", "extras"),
        ];
        let index = LocaleIndex::build(
            "en",
            EntityKind::Doc,
            entities,
            &order(&["getting-started", "empty"]),
        )
        .unwrap();

        let names: Vec<_> = index.by_section().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["getting-started", "misc", "extras"]);
    }

    #[test]
    fn test_by_tag_is_exact_and_ordered() {
        let entities = vec![
            server("a").with_tags(["git"]),
            server("b").with_tags(["Git"]),
            server("c").with_tags(["db", "git"]),
        ];
        let index = LocaleIndex::build("en", EntityKind::Server, entities, &[]).unwrap();

        assert_eq!(slugs(&index.by_tag("git")), vec!["a", "c"]);
        assert_eq!(slugs(&index.by_tag("Git")), vec!["b"]);
        assert!(index.by_tag("none").is_empty());
    }

    #[test]
    fn test_featured_with_limit() {
        let entities = vec![
            server("a").with_featured(true),
            server("b"),
            server("c").with_featured(true),
            server("d").with_featured(true),
        ];
        let index = LocaleIndex::build("en", EntityKind::Server, entities, &[]).unwrap();

        assert_eq!(slugs(&index.featured(0)), vec!["a", "c", "d"]);
        assert_eq!(slugs(&index.featured(2)), vec!["a", "c"]);
    }

    #[test]
    fn test_latest_orders_by_date_desc_undated_last() {
        let day = |d| Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap();
        let entities = vec![
            Entity::new(EntityKind::Blog, "en", "undated", "U"),
            Entity::new(EntityKind::Blog, "en", "old", "O").with_publish_date(day(1)),
            Entity::new(EntityKind::Blog, "en", "new", "N").with_publish_date(day(20)),
            Entity::new(EntityKind::Blog, "en", "also-old", "A").with_publish_date(day(1)),
        ];
        let index = LocaleIndex::build("en", EntityKind::Blog, entities, &[]).unwrap();

        assert_eq!(
            slugs(&index.latest(0)),
            vec!["new", "old", "also-old", "undated"]
        );
        assert_eq!(slugs(&index.latest(2)), vec!["new", "old"]);
    }

    #[test]
    fn test_categories_distinct_in_appearance_order() {
        let entities = vec![
            Entity::new(EntityKind::Blog, "en", "a", "A").with_category("release"),
            Entity::new(EntityKind::Blog, "en", "b", "B"),
            Entity::new(EntityKind::Blog, "en", "c", "C").with_category("tutorial"),
            Entity::new(EntityKind::Blog, "en", "d", "D").with_category("release"),
        ];
        let index = LocaleIndex::build("en", EntityKind::Blog, entities, &[]).unwrap();

        assert_eq!(index.categories(), vec!["release", "tutorial"]);
    }

    #[test]
    fn test_non_doc_index_has_no_sections() {
        let entities = vec![
            Entity::new(EntityKind::Blog, "en", "launch", "Launch").with_section("news"),
            Entity::new(EntityKind::Blog, "en", "update", "Update"),
        ];

        let index = LocaleIndex::build("en", EntityKind::Blog, entities, &order(&["news"])).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.by_section().is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = LocaleIndex::empty("fr", EntityKind::Doc);

        assert!(index.is_empty());
        assert_eq!(index.locale(), "fr");
        assert!(index.by_section().is_empty());
        assert!(index.featured(0).is_empty());
    }
}

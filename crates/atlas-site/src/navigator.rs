//! Prev/next navigation between documents.

use atlas_content::Entity;

use crate::index::LocaleIndex;

/// Resolved neighbours of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Siblings<'a> {
    /// Previous document, if declared and resolvable.
    pub prev: Option<&'a Entity>,
    /// Next document, if declared and resolvable.
    pub next: Option<&'a Entity>,
}

/// Resolve the declared `prev`/`next` references of the document `slug`.
///
/// The source document and each reference are located by scanning sections in
/// display order; the first match wins, so a reference may cross sections.
/// A missing source, an absent reference and a reference that matches nothing
/// all yield `None` for that side.
#[must_use]
pub fn resolve_siblings<'a>(index: &'a LocaleIndex, slug: &str) -> Siblings<'a> {
    let Some(source) = index.find_in_sections(slug) else {
        tracing::debug!(slug, locale = index.locale(), "Document not found for sibling lookup");
        return Siblings::default();
    };

    let resolve = |side: &str, target: Option<&str>| {
        let target = target?;
        let found = index.find_in_sections(target);
        if found.is_none() {
            tracing::debug!(slug, side, reference = target, "Unresolved sibling reference");
        }
        found
    };

    Siblings {
        prev: resolve("prev", source.prev.as_deref()),
        next: resolve("next", source.next.as_deref()),
    }
}

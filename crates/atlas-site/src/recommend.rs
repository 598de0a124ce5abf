//! Related-item recommendation with tiered fallback.
//!
//! Candidates are drawn in three tiers until `max_count` is reached:
//! 1. other entities sharing at least one tag with the source
//! 2. featured entities
//! 3. the rest, uniformly shuffled
//!
//! The first two tiers keep collection order. The source itself (compared by
//! slug) is never returned, and no entity is returned twice.

use std::collections::HashSet;

use atlas_content::Entity;
use rand::seq::SliceRandom;

/// Default number of related items shown on a detail page.
pub const DEFAULT_RELATED_COUNT: usize = 20;

/// Pick up to `max_count` entities related to `source`.
///
/// Randomness only affects the last tier; pass a seeded RNG for
/// reproducible output.
pub fn recommend<'a, R>(
    all: &'a [Entity],
    source: &Entity,
    max_count: usize,
    rng: &mut R,
) -> Vec<&'a Entity>
where
    R: rand::Rng + ?Sized,
{
    if max_count == 0 {
        return Vec::new();
    }

    let mut selected: Vec<&'a Entity> = Vec::with_capacity(max_count);
    let mut taken: HashSet<&str> = HashSet::new();
    taken.insert(source.slug.as_str());

    let mut take = |entity: &'a Entity, selected: &mut Vec<&'a Entity>| {
        if selected.len() < max_count && taken.insert(entity.slug.as_str()) {
            selected.push(entity);
        }
    };

    for entity in all.iter().filter(|e| e.shares_tag_with(source)) {
        take(entity, &mut selected);
    }

    for entity in all.iter().filter(|e| e.featured) {
        take(entity, &mut selected);
    }

    if selected.len() < max_count {
        let mut rest: Vec<&'a Entity> = all.iter().collect();
        rest.shuffle(rng);
        for entity in rest {
            take(entity, &mut selected);
        }
    }

    selected
}

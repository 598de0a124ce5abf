//! Tag and keyword filtering over entity lists.

use atlas_content::Entity;

/// URL query parameter carrying the tag filter.
pub const TAG_PARAM: &str = "tags";
/// URL query parameter carrying the keyword filter.
pub const KEYWORD_PARAM: &str = "q";

/// Tag and keyword criteria, combined with logical AND.
///
/// Blank values mean "no filter". Other values are kept as given, with the
/// keyword lower-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    tag: Option<String>,
    keyword: Option<String>,
}

impl Filter {
    /// Build a filter, treating empty or whitespace-only values as absent.
    #[must_use]
    pub fn new(tag: Option<&str>, keyword: Option<&str>) -> Self {
        Self {
            tag: non_blank(tag).map(str::to_owned),
            keyword: non_blank(keyword).map(str::to_lowercase),
        }
    }

    /// Build a filter from URL query pairs (`tags=<tag>`, `q=<keyword>`).
    ///
    /// The first occurrence of each parameter wins; other keys are ignored.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut tag = None;
        let mut keyword = None;
        for (key, value) in pairs {
            match key.as_ref() {
                TAG_PARAM if tag.is_none() => tag = Some(value.as_ref().to_owned()),
                KEYWORD_PARAM if keyword.is_none() => keyword = Some(value.as_ref().to_owned()),
                _ => {}
            }
        }
        Self::new(tag.as_deref(), keyword.as_deref())
    }

    /// Active tag filter.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Active keyword filter, lower-cased.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Whether neither criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.keyword.is_none()
    }

    /// Whether `entity` passes both criteria.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        let tag_match = self.tag.as_deref().is_none_or(|tag| entity.has_tag(tag));
        let keyword_match = self.keyword.as_deref().is_none_or(|keyword| {
            [&entity.title, &entity.summary, &entity.description]
                .iter()
                .any(|field| field.to_lowercase().contains(keyword))
        });
        tag_match && keyword_match
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Entities passing `filter`, in input order.
pub fn filter<'a, I>(entities: I, filter: &Filter) -> Vec<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    entities.into_iter().filter(|e| filter.matches(e)).collect()
}

/// Union of all tags, deduplicated, in first-appearance order.
pub fn tags_used<'a, I>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut tags: Vec<String> = Vec::new();
    for entity in entities {
        for tag in &entity.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

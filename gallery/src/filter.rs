use crate::types::Item;
use serde::Deserialize;
use serde::Serialize;

/// Active constraints on the visible item list. The action layer keeps the
/// two fields mutually exclusive; `filter_and_sort` ANDs them if both are set.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
}

impl ItemFilter {
    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            author: None,
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            tag: None,
            author: Some(author.into()),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        let tag_ok = match self.tag.as_deref() {
            Some(tag) if !tag.is_empty() => item.has_tag(tag),
            _ => true,
        };
        let author_ok = match self.author.as_deref() {
            Some(author) if !author.is_empty() => item.author.as_deref() == Some(author),
            _ => true,
        };
        tag_ok && author_ok
    }

    pub fn is_empty(&self) -> bool {
        self.tag.as_deref().is_none_or(str::is_empty)
            && self.author.as_deref().is_none_or(str::is_empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    DateAsc,
    #[default]
    DateDesc,
    Favorites,
    /// Any unrecognized mode; keeps the collection's order.
    Unsorted(String),
}

impl SortMode {
    pub fn as_str(&self) -> &str {
        match self {
            SortMode::DateAsc => "dateAsc",
            SortMode::DateDesc => "dateDesc",
            SortMode::Favorites => "fav",
            SortMode::Unsorted(raw) => raw,
        }
    }
}

impl From<&str> for SortMode {
    fn from(s: &str) -> Self {
        match s {
            "dateAsc" => SortMode::DateAsc,
            "dateDesc" => SortMode::DateDesc,
            "fav" => SortMode::Favorites,
            other => SortMode::Unsorted(other.to_string()),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtered, ordered view over `items`. The input is left untouched and the
/// sort is stable, so equal keys keep their collection order.
pub fn filter_and_sort<'a>(items: &'a [Item], filter: &ItemFilter, sort: &SortMode) -> Vec<&'a Item> {
    let mut out: Vec<&Item> = items.iter().filter(|i| filter.matches(i)).collect();
    match sort {
        SortMode::DateAsc => out.sort_by(|a, b| a.used_at().cmp(&b.used_at())),
        SortMode::DateDesc => out.sort_by(|a, b| b.used_at().cmp(&a.used_at())),
        SortMode::Favorites => out.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| b.used_at().cmp(&a.used_at()))
        }),
        SortMode::Unsorted(_) => {}
    }
    out
}

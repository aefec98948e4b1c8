//! Entries for the tag/author picker.

use crate::meta::TagMetaIndex;
use crate::ordering::compare_names;
use crate::types::Category;
use crate::types::Item;
use crate::usage::tag_last_used;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectorDomain {
    #[default]
    Tag,
    Author,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectorSort {
    #[default]
    Priority,
    Name,
    Recent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorEntry<'a> {
    pub name: String,
    pub priority: f64,
    pub category: Option<&'a Category>,
    /// Last usage timestamp; only tracked for tags.
    pub recent: Option<String>,
}

/// Distinct tag names in first-appearance order.
pub fn distinct_tags(items: &[Item]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in items.iter().flat_map(|i| i.tags.iter()) {
        if seen.insert(tag.as_str()) {
            out.push(tag.clone());
        }
    }
    out
}

/// Distinct non-empty authors in first-appearance order.
pub fn distinct_authors(items: &[Item]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for author in items.iter().filter_map(|i| i.author.as_deref()) {
        if !author.is_empty() && seen.insert(author) {
            out.push(author.to_string());
        }
    }
    out
}

/// Build the picker rows for `domain`, keeping names that contain `search`
/// (case-insensitive). Sorting is stable so ties keep first-appearance order.
pub fn build_selector_list<'a>(
    items: &[Item],
    index: &'a TagMetaIndex,
    domain: SelectorDomain,
    search: &str,
    sort: SelectorSort,
) -> Vec<SelectorEntry<'a>> {
    let mut list: Vec<SelectorEntry<'a>> = match domain {
        SelectorDomain::Tag => {
            let last = tag_last_used(items);
            distinct_tags(items)
                .into_iter()
                .map(|name| {
                    let meta = index.resolve(&name);
                    let recent = last.get(&name).cloned();
                    SelectorEntry {
                        name,
                        priority: meta.priority,
                        category: meta.category,
                        recent,
                    }
                })
                .collect()
        }
        SelectorDomain::Author => distinct_authors(items)
            .into_iter()
            .map(|name| SelectorEntry {
                name,
                priority: 0.0,
                category: None,
                recent: None,
            })
            .collect(),
    };

    let q = search.trim().to_lowercase();
    if !q.is_empty() {
        list.retain(|e| e.name.to_lowercase().contains(&q));
    }

    match sort {
        SelectorSort::Priority => list.sort_by(|a, b| b.priority.total_cmp(&a.priority)),
        SelectorSort::Name => list.sort_by(|a, b| compare_names(&a.name, &b.name)),
        // Entries without recency data compare equal and keep their order.
        SelectorSort::Recent => list.sort_by(|a, b| match (&a.recent, &b.recent) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
    }
    list
}

/// Single-select picker state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    pub domain: SelectorDomain,
    pub search: String,
    pub sort: SelectorSort,
    pub selected: Option<String>,
}

impl Selector {
    pub fn open(domain: SelectorDomain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    pub fn set_domain(&mut self, domain: SelectorDomain) {
        self.domain = domain;
        self.selected = None;
    }

    /// Replaces any earlier pick.
    pub fn pick(&mut self, name: impl Into<String>) {
        self.selected = Some(name.into());
    }

    pub fn entries<'a>(&self, items: &[Item], index: &'a TagMetaIndex) -> Vec<SelectorEntry<'a>> {
        build_selector_list(items, index, self.domain, &self.search, self.sort)
    }
}

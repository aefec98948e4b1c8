//! Render-ready projection of [`AppState`].

use crate::selector::SelectorDomain;
use crate::selector::SelectorSort;
use crate::state::AppState;
use crate::types::Item;
use crate::types::ItemState;
use crate::types::compact_number;
use serde::Serialize;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TagChip {
    pub name: String,
    /// Category color; `None` renders with the neutral default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(serialize_with = "compact_number")]
    pub priority: f64,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemCard {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub favorite: bool,
    pub state: ItemState,
    pub created_at: String,
    pub tags: Vec<TagChip>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PickerView {
    pub domain: SelectorDomain,
    pub search: String,
    pub sort: SelectorSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    pub entries: Vec<TagChip>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_filter: Option<String>,
    pub sort: String,
    /// Sidebar tags, most relevant first.
    pub recent_tags: Vec<TagChip>,
    /// Tag list in alphabetical order.
    pub all_tags: Vec<TagChip>,
    pub items: Vec<ItemCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing: Option<ItemCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picker: Option<PickerView>,
}

impl AppState {
    pub fn tag_chip(&self, name: &str) -> TagChip {
        let meta = self.resolve_tag_meta(name);
        TagChip {
            name: name.to_string(),
            color: meta.category.map(|c| c.color.clone()),
            category: meta.category.map(|c| c.name.clone()),
            priority: meta.priority,
            active: self.filter.tag.as_deref() == Some(name),
        }
    }

    pub fn item_card(&self, item: &Item) -> ItemCard {
        ItemCard {
            id: item.id,
            author: item.author.clone(),
            url: item.url.clone(),
            favorite: item.favorite,
            state: item.state,
            created_at: item.used_at().into_owned(),
            tags: item.tags.iter().map(|t| self.tag_chip(t)).collect(),
        }
    }

    pub fn view(&self) -> GalleryView {
        let picker = self.selector.as_ref().map(|sel| PickerView {
            domain: sel.domain,
            search: sel.search.clone(),
            sort: sel.sort,
            selected: sel.selected.clone(),
            entries: self
                .selector_entries()
                .into_iter()
                .map(|e| TagChip {
                    active: sel.selected.as_deref() == Some(e.name.as_str()),
                    color: e.category.map(|c| c.color.clone()),
                    category: e.category.map(|c| c.name.clone()),
                    priority: e.priority,
                    name: e.name,
                })
                .collect(),
        });
        GalleryView {
            tag_filter: self.filter.tag.clone(),
            author_filter: self.filter.author.clone(),
            sort: self.sort.to_string(),
            recent_tags: self
                .tag_recency_order()
                .iter()
                .map(|t| self.tag_chip(t))
                .collect(),
            all_tags: self
                .tag_alphabetical_order()
                .iter()
                .map(|t| self.tag_chip(t))
                .collect(),
            items: self
                .visible_items()
                .into_iter()
                .map(|i| self.item_card(i))
                .collect(),
            editing: self.editing.as_ref().map(|e| self.item_card(&e.draft)),
            picker,
        }
    }
}

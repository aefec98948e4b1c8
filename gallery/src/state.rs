//! Application state and the pure transitions applied to it.
//!
//! Every UI event becomes an [`Action`]. [`AppState::apply`] mutates the
//! in-memory collections and returns the store writes the change implies;
//! the caller decides whether to persist them (see `session`).

use crate::filter::ItemFilter;
use crate::filter::SortMode;
use crate::filter::filter_and_sort;
use crate::meta::TagMeta;
use crate::meta::TagMetaIndex;
use crate::ordering::alphabetical_order;
use crate::ordering::recency_order;
use crate::selector::Selector;
use crate::selector::SelectorDomain;
use crate::selector::SelectorEntry;
use crate::selector::SelectorSort;
use crate::types::Category;
use crate::types::Item;
use crate::types::ItemState;
use crate::types::Record;
use crate::types::RecordKind;
use crate::types::TagCategoryAssignment;
use crate::types::parse_tag_list;
use chrono::DateTime;
use chrono::Utc;

/// Input for importing one image.
#[derive(Clone, Debug)]
pub struct NewItem {
    pub image: String,
    pub url: String,
    pub author: String,
    /// Comma separated.
    pub tags: String,
    pub now: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub enum Action {
    ImportItem(NewItem),
    /// Selecting the active tag again clears it. Clears the author filter.
    ToggleTagFilter(String),
    /// Clears the tag filter and closes the open item.
    FilterByAuthor(String),
    ClearFilters,
    SetSort(SortMode),
    ToggleFavorite(i64),
    SetState(i64, ItemState),
    DeleteItem(i64),

    OpenItem(i64),
    CloseItem,
    DraftAddTag(String),
    DraftRemoveTag(String),
    DraftSetUrl(String),
    DraftSetAuthor(String),
    DraftSetState(ItemState),
    DraftReplaceImage(String),
    CancelEdit,
    SaveEdit,

    PutCategory(Category),
    DeleteCategory(String),
    AssignTag(TagCategoryAssignment),
    UnassignTag(String),

    OpenSelector(SelectorDomain),
    SetSelectorDomain(SelectorDomain),
    SetSelectorSearch(String),
    SetSelectorSort(SelectorSort),
    SelectorPick(String),
    SelectorConfirm,
    SelectorCancel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreWrite {
    Put(Record),
    Delete(RecordKind, String),
}

/// Working copy of an item being edited. Changes reach the collection only
/// through `SaveEdit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    pub draft: Item,
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    items: Vec<Item>,
    categories: Vec<Category>,
    assignments: Vec<TagCategoryAssignment>,
    index: TagMetaIndex,
    pub filter: ItemFilter,
    pub sort: SortMode,
    pub editing: Option<EditSession>,
    pub selector: Option<Selector>,
}

impl AppState {
    pub fn new(
        items: Vec<Item>,
        categories: Vec<Category>,
        assignments: Vec<TagCategoryAssignment>,
    ) -> Self {
        let index = TagMetaIndex::build(&categories, &assignments);
        Self {
            items,
            categories,
            assignments,
            index,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn assignments(&self) -> &[TagCategoryAssignment] {
        &self.assignments
    }

    pub fn index(&self) -> &TagMetaIndex {
        &self.index
    }

    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.rebuild_index();
    }

    pub fn set_assignments(&mut self, assignments: Vec<TagCategoryAssignment>) {
        self.assignments = assignments;
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = TagMetaIndex::build(&self.categories, &self.assignments);
    }

    pub fn resolve_tag_meta(&self, tag: &str) -> TagMeta<'_> {
        self.index.resolve(tag)
    }

    pub fn tag_recency_order(&self) -> Vec<String> {
        recency_order(&self.items, &self.index)
    }

    pub fn tag_alphabetical_order(&self) -> Vec<String> {
        alphabetical_order(&self.items, &self.index)
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        filter_and_sort(&self.items, &self.filter, &self.sort)
    }

    pub fn selector_entries(&self) -> Vec<SelectorEntry<'_>> {
        match &self.selector {
            Some(sel) => sel.entries(&self.items, &self.index),
            None => Vec::new(),
        }
    }

    pub fn apply(&mut self, action: Action) -> Vec<StoreWrite> {
        match action {
            Action::ImportItem(new) => self.import_item(new),
            Action::ToggleTagFilter(tag) => {
                self.filter.tag = if self.filter.tag.as_deref() == Some(tag.as_str()) {
                    None
                } else {
                    Some(tag)
                };
                self.filter.author = None;
                Vec::new()
            }
            Action::FilterByAuthor(author) => {
                if !author.is_empty() {
                    self.filter = ItemFilter::by_author(author);
                    self.editing = None;
                }
                Vec::new()
            }
            Action::ClearFilters => {
                self.filter = ItemFilter::default();
                Vec::new()
            }
            Action::SetSort(sort) => {
                self.sort = sort;
                Vec::new()
            }
            Action::ToggleFavorite(id) => self.update_item(id, |item| item.favorite = !item.favorite),
            Action::SetState(id, state) => {
                if let Some(edit) = self.editing.as_mut()
                    && edit.draft.id == id
                {
                    edit.draft.state = state;
                }
                self.update_item(id, |item| item.state = state)
            }
            Action::DeleteItem(id) => {
                let before = self.items.len();
                self.items.retain(|i| i.id != id);
                if self.items.len() == before {
                    return Vec::new();
                }
                if self.editing.as_ref().is_some_and(|e| e.draft.id == id) {
                    self.editing = None;
                    self.selector = None;
                }
                vec![StoreWrite::Delete(RecordKind::Items, id.to_string())]
            }

            Action::OpenItem(id) => {
                self.editing = self.item(id).cloned().map(|draft| EditSession { draft });
                Vec::new()
            }
            Action::CloseItem => {
                self.editing = None;
                self.selector = None;
                Vec::new()
            }
            Action::DraftAddTag(tag) => self.edit_draft(|d| {
                d.add_tag(&tag);
            }),
            Action::DraftRemoveTag(tag) => self.edit_draft(|d| {
                d.remove_tag(&tag);
            }),
            Action::DraftSetUrl(url) => self.edit_draft(|d| d.url = non_empty(url)),
            Action::DraftSetAuthor(author) => self.edit_draft(|d| d.author = non_empty(author)),
            Action::DraftSetState(state) => self.edit_draft(|d| d.state = state),
            Action::DraftReplaceImage(image) => self.edit_draft(|d| d.image = image),
            Action::CancelEdit => {
                if let Some(id) = self.editing.as_ref().map(|e| e.draft.id) {
                    self.editing = self.item(id).cloned().map(|draft| EditSession { draft });
                }
                Vec::new()
            }
            Action::SaveEdit => self.save_edit(),

            Action::PutCategory(category) => {
                match self.categories.iter_mut().find(|c| c.id == category.id) {
                    Some(slot) => *slot = category.clone(),
                    None => self.categories.push(category.clone()),
                }
                self.rebuild_index();
                vec![StoreWrite::Put(Record::Categories(category))]
            }
            Action::DeleteCategory(id) => {
                self.categories.retain(|c| c.id != id);
                self.rebuild_index();
                vec![StoreWrite::Delete(RecordKind::Categories, id)]
            }
            Action::AssignTag(assignment) => {
                match self.assignments.iter_mut().find(|a| a.tag == assignment.tag) {
                    Some(slot) => *slot = assignment.clone(),
                    None => self.assignments.push(assignment.clone()),
                }
                self.rebuild_index();
                vec![StoreWrite::Put(Record::TagAssignments(assignment))]
            }
            Action::UnassignTag(tag) => {
                self.assignments.retain(|a| a.tag != tag);
                self.rebuild_index();
                vec![StoreWrite::Delete(RecordKind::TagAssignments, tag)]
            }

            Action::OpenSelector(domain) => {
                self.selector = Some(Selector::open(domain));
                Vec::new()
            }
            Action::SetSelectorDomain(domain) => self.edit_selector(|s| s.set_domain(domain)),
            Action::SetSelectorSearch(search) => self.edit_selector(|s| s.search = search),
            Action::SetSelectorSort(sort) => self.edit_selector(|s| s.sort = sort),
            Action::SelectorPick(name) => self.edit_selector(|s| s.pick(name)),
            Action::SelectorConfirm => {
                let Some(sel) = self.selector.take() else {
                    return Vec::new();
                };
                if let (Some(edit), Some(picked)) = (self.editing.as_mut(), sel.selected) {
                    match sel.domain {
                        SelectorDomain::Tag => {
                            edit.draft.add_tag(&picked);
                        }
                        SelectorDomain::Author => edit.draft.author = Some(picked),
                    }
                }
                Vec::new()
            }
            Action::SelectorCancel => {
                self.selector = None;
                Vec::new()
            }
        }
    }

    fn import_item(&mut self, new: NewItem) -> Vec<StoreWrite> {
        let millis = new.now.timestamp_millis();
        let next_free = self
            .items
            .iter()
            .map(|i| i.id.saturating_add(1))
            .max()
            .unwrap_or(millis);
        let mut id = millis.max(next_free);
        // Only reachable once the largest id is i64::MAX.
        while self.item(id).is_some() {
            id = id.saturating_sub(1);
        }
        let item = Item {
            id,
            image: new.image,
            url: non_empty(new.url),
            author: non_empty(new.author),
            state: ItemState::Unset,
            tags: parse_tag_list(&new.tags),
            favorite: false,
            created_at: Some(new.now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        };
        tracing::debug!("importing item {} with {} tags", item.id, item.tags.len());
        self.items.insert(0, item.clone());
        vec![StoreWrite::Put(Record::Items(item))]
    }

    fn update_item<F>(&mut self, id: i64, f: F) -> Vec<StoreWrite>
    where
        F: FnOnce(&mut Item),
    {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Vec::new();
        };
        f(item);
        vec![StoreWrite::Put(Record::Items(item.clone()))]
    }

    fn edit_draft<F>(&mut self, f: F) -> Vec<StoreWrite>
    where
        F: FnOnce(&mut Item),
    {
        if let Some(edit) = self.editing.as_mut() {
            f(&mut edit.draft);
        }
        Vec::new()
    }

    fn edit_selector<F>(&mut self, f: F) -> Vec<StoreWrite>
    where
        F: FnOnce(&mut Selector),
    {
        if let Some(sel) = self.selector.as_mut() {
            f(sel);
        }
        Vec::new()
    }

    fn save_edit(&mut self) -> Vec<StoreWrite> {
        let Some(edit) = self.editing.as_ref() else {
            return Vec::new();
        };
        let draft = edit.draft.clone();
        let writes = self.update_item(draft.id, |item| {
            item.url = draft.url;
            item.author = draft.author;
            item.state = draft.state;
            item.tags = draft.tags;
            item.image = draft.image;
        });
        if !writes.is_empty() {
            self.editing = None;
            self.selector = None;
        }
        writes
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

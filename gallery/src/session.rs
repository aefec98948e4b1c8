use crate::state::Action;
use crate::state::AppState;
use crate::state::StoreWrite;
use crate::store::GalleryStore;
use crate::view::GalleryView;

/// State plus the store backing it. Actions are applied to a copy of the
/// state; the copy replaces the live state only once every store write it
/// produced has succeeded.
pub struct Gallery {
    store: Box<dyn GalleryStore>,
    state: AppState,
}

impl Gallery {
    /// Open with whatever the store currently holds.
    pub fn open(store: Box<dyn GalleryStore>) -> Self {
        let mut gallery = Self {
            store,
            state: AppState::default(),
        };
        gallery.reload();
        gallery
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &dyn GalleryStore {
        self.store.as_ref()
    }

    pub fn view(&self) -> GalleryView {
        self.state.view()
    }

    /// Re-read all three collections. A kind that fails to load keeps its
    /// previous contents. Returns whether every kind loaded.
    pub fn reload(&mut self) -> bool {
        let mut ok = true;
        match self.store.list_items() {
            Ok(items) => self.state.set_items(items),
            Err(e) => {
                tracing::warn!("gallery: failed to load items: {e:#}");
                ok = false;
            }
        }
        match self.store.list_categories() {
            Ok(categories) => self.state.set_categories(categories),
            Err(e) => {
                tracing::warn!("gallery: failed to load categories: {e:#}");
                ok = false;
            }
        }
        match self.store.list_assignments() {
            Ok(assignments) => self.state.set_assignments(assignments),
            Err(e) => {
                tracing::warn!("gallery: failed to load tag categories: {e:#}");
                ok = false;
            }
        }
        ok
    }

    /// Apply `action`. Returns `false` when a store write failed, in which
    /// case the in-memory state is left exactly as it was.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mut next = self.state.clone();
        let writes = next.apply(action);
        for write in &writes {
            let res = match write {
                StoreWrite::Put(record) => self.store.put(record),
                StoreWrite::Delete(kind, key) => self.store.delete(*kind, key),
            };
            if let Err(e) = res {
                tracing::warn!("gallery: store write failed: {e:#}");
                return false;
            }
        }
        tracing::debug!("gallery: committed action with {} writes", writes.len());
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NewItem;
    use crate::store::jsonl::JsonlGalleryStore;
    use crate::types::Category;
    use crate::types::Item;
    use crate::types::TagCategoryAssignment;
    use chrono::Utc;

    struct BrokenStore;

    impl GalleryStore for BrokenStore {
        fn list_items(&self) -> anyhow::Result<Vec<Item>> {
            anyhow::bail!("offline")
        }
        fn put_item(&self, _item: &Item) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
        fn delete_item(&self, _id: i64) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
        fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
            Ok(Vec::new())
        }
        fn put_category(&self, _category: &Category) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
        fn delete_category(&self, _id: &str) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
        fn list_assignments(&self) -> anyhow::Result<Vec<TagCategoryAssignment>> {
            Ok(Vec::new())
        }
        fn put_assignment(&self, _assignment: &TagCategoryAssignment) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
        fn delete_assignment(&self, _tag: &str) -> anyhow::Result<()> {
            anyhow::bail!("offline")
        }
    }

    fn import(tags: &str) -> Action {
        Action::ImportItem(NewItem {
            image: "data:image/png;base64,AA==".to_string(),
            url: String::new(),
            author: "ann".to_string(),
            tags: tags.to_string(),
            now: Utc::now(),
        })
    }

    #[test]
    fn failed_write_keeps_prior_state() {
        let mut gallery = Gallery::open(Box::new(BrokenStore));
        assert!(gallery.state().items().is_empty());
        assert!(!gallery.dispatch(import("a")));
        assert!(gallery.state().items().is_empty());

        // Actions without writes still go through.
        assert!(gallery.dispatch(Action::ToggleTagFilter("a".to_string())));
        assert_eq!(gallery.state().filter.tag.as_deref(), Some("a"));
    }

    #[test]
    fn committed_actions_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::open(Box::new(JsonlGalleryStore::new(dir.path())));
        assert!(gallery.dispatch(import("x, y")));
        let id = gallery.state().items()[0].id;
        assert!(gallery.dispatch(Action::ToggleFavorite(id)));
        assert!(gallery.dispatch(Action::AssignTag(TagCategoryAssignment {
            tag: "y".to_string(),
            category_id: None,
            priority: 4.0,
        })));

        let reopened = Gallery::open(Box::new(JsonlGalleryStore::new(dir.path())));
        let item = reopened.state().item(id).unwrap();
        assert!(item.favorite);
        assert_eq!(item.tags, vec!["x", "y"]);
        assert_eq!(reopened.state().tag_recency_order(), vec!["y", "x"]);
    }
}

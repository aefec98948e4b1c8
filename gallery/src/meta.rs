//! Tag → (category, priority) lookup built from category and assignment
//! records.

use crate::types::Category;
use crate::types::TagCategoryAssignment;
use std::collections::HashMap;

/// Resolved metadata for one tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TagMeta<'a> {
    pub category: Option<&'a Category>,
    pub priority: f64,
}

#[derive(Clone, Debug)]
struct Assigned {
    category_id: Option<String>,
    priority: f64,
}

/// Rebuilt from scratch whenever categories or assignments change.
#[derive(Clone, Debug, Default)]
pub struct TagMetaIndex {
    categories: HashMap<String, Category>,
    assignments: HashMap<String, Assigned>,
}

impl TagMetaIndex {
    pub fn build(categories: &[Category], assignments: &[TagCategoryAssignment]) -> Self {
        let categories = categories
            .iter()
            .map(|c| (c.id.clone(), c.clone()))
            .collect();
        let mut by_tag = HashMap::with_capacity(assignments.len());
        for a in assignments {
            by_tag.insert(
                a.tag.clone(),
                Assigned {
                    category_id: a.category_id.clone().filter(|id| !id.is_empty()),
                    priority: a.priority,
                },
            );
        }
        Self {
            categories,
            assignments: by_tag,
        }
    }

    /// Unassigned tags and dangling category references degrade to
    /// `{ category: None, priority: 0 }` / `category: None`.
    pub fn resolve(&self, tag: &str) -> TagMeta<'_> {
        let Some(a) = self.assignments.get(tag) else {
            return TagMeta {
                category: None,
                priority: 0.0,
            };
        };
        TagMeta {
            category: a
                .category_id
                .as_deref()
                .and_then(|id| self.categories.get(id)),
            priority: a.priority,
        }
    }

    pub fn priority(&self, tag: &str) -> f64 {
        self.assignments.get(tag).map_or(0.0, |a| a.priority)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: format!("cat-{id}"),
            color: "#336699".to_string(),
        }
    }

    fn assign(tag: &str, category_id: Option<&str>, priority: f64) -> TagCategoryAssignment {
        TagCategoryAssignment {
            tag: tag.to_string(),
            category_id: category_id.map(str::to_string),
            priority,
        }
    }

    #[test]
    fn unassigned_tag_resolves_to_defaults() {
        let idx = TagMetaIndex::build(&[cat("c")], &[]);
        let meta = idx.resolve("x");
        assert_eq!(meta.category, None);
        assert_eq!(meta.priority, 0.0);
    }

    #[test]
    fn assignment_resolves_category_and_priority() {
        let cats = [cat("c")];
        let before = TagMetaIndex::build(&cats, &[]);
        assert_eq!(before.resolve("x").priority, 0.0);

        let after = TagMetaIndex::build(&cats, &[assign("x", Some("c"), 5.0)]);
        let meta = after.resolve("x");
        assert_eq!(meta.category.map(|c| c.id.as_str()), Some("c"));
        assert_eq!(meta.priority, 5.0);
    }

    #[test]
    fn dangling_category_is_soft_none() {
        let idx = TagMetaIndex::build(&[], &[assign("x", Some("gone"), 2.0)]);
        let meta = idx.resolve("x");
        assert!(meta.category.is_none());
        assert_eq!(meta.priority, 2.0);
    }

    #[test]
    fn empty_category_id_means_none() {
        let idx = TagMetaIndex::build(&[cat("")], &[assign("x", Some(""), 1.0)]);
        assert!(idx.resolve("x").category.is_none());
    }

    #[test]
    fn later_assignment_for_same_tag_wins() {
        let idx = TagMetaIndex::build(&[], &[assign("x", None, 1.0), assign("x", None, 9.0)]);
        assert_eq!(idx.priority("x"), 9.0);
    }
}

//! Tag palette orderings. Both views cover exactly the tags that appear on
//! at least one item; assignments for unused tags are ignored here.

use crate::meta::TagMetaIndex;
use crate::types::Item;
use crate::usage::tag_last_used;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// Lowercased with diacritics stripped: "É" and "e" share a key.
fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collating name order: base letters first ("é" sorts between "e" and
/// "f"), then accents, then case with the lowercase form first. Total for
/// distinct names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Priority desc, then most recent use desc, then name.
pub fn recency_order(items: &[Item], index: &TagMetaIndex) -> Vec<String> {
    let last = tag_last_used(items);
    let mut tags: Vec<(f64, &str, &str)> = last
        .iter()
        .map(|(tag, when)| (index.priority(tag), tag.as_str(), when.as_str()))
        .collect();
    tags.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| b.2.cmp(a.2))
            .then_with(|| compare_names(a.1, b.1))
    });
    tags.into_iter().map(|(_, tag, _)| tag.to_string()).collect()
}

/// Priority desc, then name. Usage time plays no part.
pub fn alphabetical_order(items: &[Item], index: &TagMetaIndex) -> Vec<String> {
    let last = tag_last_used(items);
    let mut tags: Vec<(f64, &str)> = last
        .keys()
        .map(|tag| (index.priority(tag), tag.as_str()))
        .collect();
    tags.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| compare_names(a.1, b.1)));
    tags.into_iter().map(|(_, tag)| tag.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagCategoryAssignment;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn item(id: i64, created_at: &str, tags: &[&str]) -> Item {
        Item {
            id,
            image: String::new(),
            url: None,
            author: None,
            state: Default::default(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favorite: false,
            created_at: Some(created_at.to_string()),
        }
    }

    fn prio(tag: &str, priority: f64) -> TagCategoryAssignment {
        TagCategoryAssignment {
            tag: tag.to_string(),
            category_id: None,
            priority,
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item(1, "2024-01-01", &["old", "shared"]),
            item(2, "2024-03-01", &["new", "shared"]),
            item(3, "2024-02-01", &["mid", "Beta", "alpha"]),
        ]
    }

    #[test]
    fn recency_view_orders_by_last_use_then_name() {
        let idx = TagMetaIndex::build(&[], &[]);
        assert_eq!(
            recency_order(&sample(), &idx),
            vec!["new", "shared", "alpha", "Beta", "mid", "old"]
        );
    }

    #[test]
    fn alphabetical_view_ignores_recency() {
        let idx = TagMetaIndex::build(&[], &[]);
        assert_eq!(
            alphabetical_order(&sample(), &idx),
            vec!["alpha", "Beta", "mid", "new", "old", "shared"]
        );
    }

    #[test]
    fn priority_dominates_both_views() {
        let idx = TagMetaIndex::build(&[], &[prio("old", 10.0), prio("mid", -1.0)]);
        let recent = recency_order(&sample(), &idx);
        let alpha = alphabetical_order(&sample(), &idx);
        assert_eq!(recent.first().map(String::as_str), Some("old"));
        assert_eq!(recent.last().map(String::as_str), Some("mid"));
        assert_eq!(alpha.first().map(String::as_str), Some("old"));
        assert_eq!(alpha.last().map(String::as_str), Some("mid"));
    }

    #[test]
    fn views_cover_used_tags_exactly_once() {
        let idx = TagMetaIndex::build(&[], &[prio("unused", 99.0)]);
        let items = sample();
        let expected: BTreeSet<String> = items.iter().flat_map(|i| i.tags.clone()).collect();
        for view in [recency_order(&items, &idx), alphabetical_order(&items, &idx)] {
            let set: BTreeSet<String> = view.iter().cloned().collect();
            assert_eq!(set.len(), view.len());
            assert_eq!(set, expected);
        }
    }

    #[test]
    fn output_is_deterministic_regardless_of_input_order() {
        let idx = TagMetaIndex::build(&[], &[prio("b", 1.0), prio("a", 1.0)]);
        let mut items = vec![
            item(1, "2024-01-01", &["a", "b", "c"]),
            item(2, "2024-01-01", &["d", "C"]),
        ];
        let first = recency_order(&items, &idx);
        items.reverse();
        assert_eq!(recency_order(&items, &idx), first);
        assert_eq!(first, vec!["a", "b", "c", "C", "d"]);
    }

    #[test]
    fn name_comparison_is_total() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("A", "a"), Ordering::Greater);
        assert_eq!(compare_names("x", "x"), Ordering::Equal);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut names = vec!["zebra", "f", "été", "Eve", "ete", "Été"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["ete", "été", "Été", "Eve", "f", "zebra"]);
    }

    #[test]
    fn fractional_priorities_are_distinct() {
        let idx = TagMetaIndex::build(&[], &[prio("old", 1.0), prio("mid", 1.5)]);
        let alpha = alphabetical_order(&sample(), &idx);
        assert_eq!(&alpha[..2], &["mid".to_string(), "old".to_string()]);
    }
}

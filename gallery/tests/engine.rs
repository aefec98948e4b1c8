use artshelf_gallery::AppState;
use artshelf_gallery::ItemFilter;
use artshelf_gallery::SortMode;
use artshelf_gallery::TagMetaIndex;
use artshelf_gallery::alphabetical_order;
use artshelf_gallery::filter_and_sort;
use artshelf_gallery::recency_order;
use artshelf_gallery::types::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn item(id: i64, created_at: &str, tags: &[&str], author: &str, favorite: bool) -> Item {
    Item {
        id,
        image: String::new(),
        url: None,
        author: Some(author.to_string()).filter(|a| !a.is_empty()),
        state: ItemState::Unset,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        favorite,
        created_at: Some(created_at.to_string()).filter(|c| !c.is_empty()),
    }
}

fn assign(tag: &str, category_id: Option<&str>, priority: f64) -> TagCategoryAssignment {
    TagCategoryAssignment {
        tag: tag.to_string(),
        category_id: category_id.map(str::to_string),
        priority,
    }
}

fn gallery() -> Vec<Item> {
    vec![
        item(1, "2024-01-05T00:00:00.000Z", &["sky", "Sea", "sun"], "bob", false),
        item(2, "2024-02-01T00:00:00.000Z", &["sea", "sky"], "ann", true),
        item(3, "", &["moon"], "", false),
        item(4, "2024-03-01T00:00:00.000Z", &["sun", "dune"], "bob", true),
    ]
}

#[test]
fn views_cover_exactly_the_used_tags() {
    let items = gallery();
    let index = TagMetaIndex::build(&[], &[assign("unused", None, 99.0), assign("moon", None, 1.0)]);
    let used: HashSet<&str> = items.iter().flat_map(|i| i.tags.iter().map(String::as_str)).collect();

    for order in [recency_order(&items, &index), alphabetical_order(&items, &index)] {
        assert_eq!(order.len(), used.len());
        let seen: HashSet<&str> = order.iter().map(String::as_str).collect();
        assert_eq!(seen, used);
    }
}

#[test]
fn priority_dominates_both_views() {
    let items = gallery();
    let index = TagMetaIndex::build(&[], &[assign("moon", None, 3.0), assign("Sea", None, 2.0)]);
    let recent = recency_order(&items, &index);
    let alpha = alphabetical_order(&items, &index);
    assert_eq!(&recent[..2], &["moon".to_string(), "Sea".to_string()]);
    assert_eq!(&alpha[..2], &["moon".to_string(), "Sea".to_string()]);
    // Remaining tags: recency first, then name.
    assert_eq!(&recent[2..], &["dune", "sun", "sea", "sky"]);
    assert_eq!(&alpha[2..], &["dune", "sea", "sky", "sun"]);
}

#[test]
fn views_are_deterministic_under_input_permutation() {
    let mut items = gallery();
    let index = TagMetaIndex::default();
    let recent = recency_order(&items, &index);
    let alpha = alphabetical_order(&items, &index);
    items.reverse();
    assert_eq!(recency_order(&items, &index), recent);
    assert_eq!(alphabetical_order(&items, &index), alpha);
}

#[test]
fn favorite_sort_scenario() {
    let items = vec![
        item(1, "2024-01-01", &[], "", false),
        item(2, "2024-01-02", &[], "", true),
        item(3, "2024-01-03", &[], "", true),
    ];
    let out: Vec<i64> = filter_and_sort(&items, &ItemFilter::default(), &SortMode::Favorites)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(out, vec![3, 2, 1]);
}

#[test]
fn date_ascending_scenario() {
    let items = vec![
        item(1, "2024-03-01", &[], "", false),
        item(2, "2024-01-01", &[], "", false),
        item(3, "2024-02-01", &[], "", false),
    ];
    let out: Vec<&str> = filter_and_sort(&items, &ItemFilter::default(), &SortMode::from("dateAsc"))
        .iter()
        .filter_map(|i| i.created_at.as_deref())
        .collect();
    assert_eq!(out, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
}

#[test]
fn tag_metadata_default_then_assigned() {
    let c = Category {
        id: "C".to_string(),
        name: "Sky things".to_string(),
        color: "#88f".to_string(),
    };
    let mut state = AppState::new(gallery(), vec![c.clone()], Vec::new());
    let meta = state.resolve_tag_meta("x");
    assert_eq!((meta.category, meta.priority), (None, 0.0));

    state.set_assignments(vec![assign("x", Some("C"), 5.0)]);
    let meta = state.resolve_tag_meta("x");
    assert_eq!(meta.category, Some(&c));
    assert_eq!(meta.priority, 5.0);
}

#[test]
fn combined_filters_and_together() {
    let items = gallery();
    let filter = ItemFilter {
        tag: Some("sun".to_string()),
        author: Some("bob".to_string()),
    };
    let once = filter_and_sort(&items, &filter, &SortMode::DateDesc);
    assert_eq!(once.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4, 1]);

    let filter = ItemFilter {
        tag: Some("sea".to_string()),
        author: Some("bob".to_string()),
    };
    assert!(filter_and_sort(&items, &filter, &SortMode::DateDesc).is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let items = gallery();
    let filter = ItemFilter::by_tag("sky");
    for sort in ["dateAsc", "dateDesc", "fav", "shuffle"] {
        let sort = SortMode::from(sort);
        let once: Vec<Item> = filter_and_sort(&items, &filter, &sort).into_iter().cloned().collect();
        let twice: Vec<i64> = filter_and_sort(&once, &filter, &sort).iter().map(|i| i.id).collect();
        assert_eq!(twice, once.iter().map(|i| i.id).collect::<Vec<_>>());
    }
}

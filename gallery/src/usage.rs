use crate::types::Item;
use std::collections::HashMap;

/// Most recent usage timestamp per tag. Tags carried by no item are absent.
///
/// Timestamps compare as strings; RFC3339 values in a single offset sort
/// chronologically that way.
pub fn tag_last_used(items: &[Item]) -> HashMap<String, String> {
    let mut last: HashMap<String, String> = HashMap::new();
    for item in items {
        let when = item.used_at();
        for tag in &item.tags {
            let seen = last.entry(tag.clone()).or_default();
            if seen.as_str() < when.as_ref() {
                *seen = when.to_string();
            }
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, created_at: Option<&str>, tags: &[&str]) -> Item {
        Item {
            id,
            image: String::new(),
            url: None,
            author: None,
            state: Default::default(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favorite: false,
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn keeps_latest_timestamp_per_tag() {
        let items = vec![
            item(1, Some("2024-02-01T00:00:00.000Z"), &["a", "b"]),
            item(2, Some("2024-03-01T00:00:00.000Z"), &["a"]),
            item(3, Some("2024-01-01T00:00:00.000Z"), &["a", "c"]),
        ];
        let last = tag_last_used(&items);
        assert_eq!(last.len(), 3);
        assert_eq!(last["a"], "2024-03-01T00:00:00.000Z");
        assert_eq!(last["b"], "2024-02-01T00:00:00.000Z");
        assert_eq!(last["c"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn missing_created_at_uses_id() {
        let items = vec![item(1704067200000, None, &["x"])];
        assert_eq!(tag_last_used(&items)["x"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn no_items_no_tags() {
        assert!(tag_last_used(&[]).is_empty());
    }
}

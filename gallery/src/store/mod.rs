use crate::types::Category;
use crate::types::Item;
use crate::types::Record;
use crate::types::RecordKind;
use crate::types::TagCategoryAssignment;

/// Durable keyed storage for the three record kinds. Items are keyed by id,
/// categories by id, assignments by tag name. `put_*` upserts.
pub trait GalleryStore: Send + Sync {
    fn list_items(&self) -> anyhow::Result<Vec<Item>>;
    fn put_item(&self, item: &Item) -> anyhow::Result<()>;
    fn delete_item(&self, id: i64) -> anyhow::Result<()>;

    fn list_categories(&self) -> anyhow::Result<Vec<Category>>;
    fn put_category(&self, category: &Category) -> anyhow::Result<()>;
    fn delete_category(&self, id: &str) -> anyhow::Result<()>;

    fn list_assignments(&self) -> anyhow::Result<Vec<TagCategoryAssignment>>;
    fn put_assignment(&self, assignment: &TagCategoryAssignment) -> anyhow::Result<()>;
    fn delete_assignment(&self, tag: &str) -> anyhow::Result<()>;

    fn list(&self, kind: RecordKind) -> anyhow::Result<Vec<Record>> {
        Ok(match kind {
            RecordKind::Items => self.list_items()?.into_iter().map(Record::Items).collect(),
            RecordKind::Categories => self
                .list_categories()?
                .into_iter()
                .map(Record::Categories)
                .collect(),
            RecordKind::TagAssignments => self
                .list_assignments()?
                .into_iter()
                .map(Record::TagAssignments)
                .collect(),
        })
    }

    fn put(&self, record: &Record) -> anyhow::Result<()> {
        match record {
            Record::Items(item) => self.put_item(item),
            Record::Categories(category) => self.put_category(category),
            Record::TagAssignments(assignment) => self.put_assignment(assignment),
        }
    }

    fn delete(&self, kind: RecordKind, key: &str) -> anyhow::Result<()> {
        match kind {
            RecordKind::Items => {
                let Ok(id) = key.parse::<i64>() else {
                    anyhow::bail!("invalid item id: {key}");
                };
                self.delete_item(id)
            }
            RecordKind::Categories => self.delete_category(key),
            RecordKind::TagAssignments => self.delete_assignment(key),
        }
    }

    /// Write every record as one `{"kind":…,"record":…}` line.
    fn export(&self, out: &mut dyn std::io::Write) -> anyhow::Result<()> {
        for kind in RecordKind::ALL {
            for record in self.list(kind)? {
                let line = serde_json::to_string(&record)?;
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Upsert every line of an export stream; returns the record count.
    fn import(&self, input: &mut dyn std::io::Read) -> anyhow::Result<usize> {
        let mut count = 0usize;
        for record in read_records(input)? {
            self.put(&record)?;
            count += 1;
        }
        Ok(count)
    }

    fn stats(&self) -> anyhow::Result<serde_json::Value> {
        let items = self.list_items()?;
        let favorites = items.iter().filter(|i| i.favorite).count();
        let tags = crate::selector::distinct_tags(&items).len();
        Ok(serde_json::json!({
            "items": items.len(),
            "favorites": favorites,
            "tags": tags,
            "categories": self.list_categories()?.len(),
            "tagAssignments": self.list_assignments()?.len(),
        }))
    }
}

pub(crate) fn read_records(input: &mut dyn std::io::Read) -> anyhow::Result<Vec<Record>> {
    let mut data = String::new();
    input.read_to_string(&mut data)?;
    let mut out = Vec::new();
    for (n, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("import line {}: {e}", n + 1))?;
        out.push(record);
    }
    Ok(out)
}

pub mod jsonl;
pub mod sqlite;

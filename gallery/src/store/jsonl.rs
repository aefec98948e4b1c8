use super::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::path::PathBuf;

pub const ITEMS_FILE: &str = "items.jsonl";
pub const CATEGORIES_FILE: &str = "categories.jsonl";
pub const TAG_CATEGORIES_FILE: &str = "tag_categories.jsonl";

/// One JSONL file per record kind inside `dir`. Every write rewrites the
/// affected file. Lines that fail to parse are skipped on read and written
/// back untouched.
#[derive(Debug, Clone)]
pub struct JsonlGalleryStore {
    dir: PathBuf,
}

impl JsonlGalleryStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(match kind {
            RecordKind::Items => ITEMS_FILE,
            RecordKind::Categories => CATEGORIES_FILE,
            RecordKind::TagAssignments => TAG_CATEGORIES_FILE,
        })
    }

    /// Replace the first record `same` accepts, or append `record`.
    fn upsert<T, F>(&self, kind: RecordKind, record: &T, same: F) -> anyhow::Result<()>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: Fn(&T) -> bool,
    {
        let path = self.path(kind);
        let mut lines: Vec<Line<T>> = read_lines(&path)?;
        let slot = lines.iter_mut().find_map(|line| match line {
            Line::Record(r) if same(r) => Some(r),
            _ => None,
        });
        match slot {
            Some(r) => *r = record.clone(),
            None => lines.push(Line::Record(record.clone())),
        }
        write_lines(&path, &lines)
    }

    fn remove<T, F>(&self, kind: RecordKind, hit: F) -> anyhow::Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let path = self.path(kind);
        let mut lines: Vec<Line<T>> = read_lines(&path)?;
        let before = lines.len();
        lines.retain(|line| !matches!(line, Line::Record(r) if hit(r)));
        if lines.len() == before {
            return Ok(());
        }
        write_lines(&path, &lines)
    }
}

enum Line<T> {
    Record(T),
    Unparsed(String),
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<Line<T>>> {
    let data = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut out = Vec::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => out.push(Line::Record(record)),
            Err(e) => {
                tracing::debug!("gallery: skipping bad line in {}: {e}", path.display());
                out.push(Line::Unparsed(line.to_string()));
            }
        }
    }
    Ok(out)
}

fn read_all<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    Ok(read_lines(path)?
        .into_iter()
        .filter_map(|line| match line {
            Line::Record(r) => Some(r),
            Line::Unparsed(_) => None,
        })
        .collect())
}

fn write_lines<T: Serialize>(path: &Path, lines: &[Line<T>]) -> anyhow::Result<()> {
    let mut out = String::new();
    for line in lines {
        match line {
            Line::Record(r) => out.push_str(&serde_json::to_string(r)?),
            Line::Unparsed(raw) => out.push_str(raw),
        }
        out.push('\n');
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, out)?;
    tracing::debug!("gallery: wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

impl GalleryStore for JsonlGalleryStore {
    fn list_items(&self) -> anyhow::Result<Vec<Item>> {
        read_all(&self.path(RecordKind::Items))
    }

    fn put_item(&self, item: &Item) -> anyhow::Result<()> {
        self.upsert(RecordKind::Items, item, |i: &Item| i.id == item.id)
    }

    fn delete_item(&self, id: i64) -> anyhow::Result<()> {
        self.remove(RecordKind::Items, |i: &Item| i.id == id)
    }

    fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        read_all(&self.path(RecordKind::Categories))
    }

    fn put_category(&self, category: &Category) -> anyhow::Result<()> {
        self.upsert(RecordKind::Categories, category, |c: &Category| {
            c.id == category.id
        })
    }

    fn delete_category(&self, id: &str) -> anyhow::Result<()> {
        self.remove(RecordKind::Categories, |c: &Category| c.id == id)
    }

    fn list_assignments(&self) -> anyhow::Result<Vec<TagCategoryAssignment>> {
        read_all(&self.path(RecordKind::TagAssignments))
    }

    fn put_assignment(&self, assignment: &TagCategoryAssignment) -> anyhow::Result<()> {
        self.upsert(
            RecordKind::TagAssignments,
            assignment,
            |a: &TagCategoryAssignment| a.tag == assignment.tag,
        )
    }

    fn delete_assignment(&self, tag: &str) -> anyhow::Result<()> {
        self.remove(
            RecordKind::TagAssignments,
            |a: &TagCategoryAssignment| a.tag == tag,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unparseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CATEGORIES_FILE),
            "{\"id\":\"a\",\"name\":\"A\",\"color\":\"red\"}\nnot json\n\n{\"id\":2}\n",
        )
        .unwrap();
        let store = JsonlGalleryStore::new(dir.path());
        let cats = store.list_categories().unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[1].id, "2");
    }

    #[test]
    fn rewrites_keep_unparseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ITEMS_FILE);
        let legacy = r#"{"id":"legacy-string-id","tags":["a"]}"#;
        std::fs::write(&path, format!("{{\"id\":1,\"image\":\"x\"}}\n{legacy}\n")).unwrap();
        let store = JsonlGalleryStore::new(dir.path());

        let mut item = store.list_items().unwrap().remove(0);
        item.id = 2;
        store.put_item(&item).unwrap();
        store.delete_item(1).unwrap();

        let ids: Vec<i64> = store.list_items().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);
        let written = serde_json::to_string(&item).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        assert_eq!(data.lines().collect::<Vec<_>>(), vec![legacy, written.as_str()]);
    }

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGalleryStore::new(dir.path().join("nested"));
        assert!(store.list_items().unwrap().is_empty());
        assert!(store.list_assignments().unwrap().is_empty());
    }
}

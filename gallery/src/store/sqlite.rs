use super::*;

#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use rusqlite::params;

#[cfg(feature = "sqlite")]
fn init_db(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            image TEXT NOT NULL,
            url TEXT,
            author TEXT,
            state TEXT NOT NULL,
            tags_json TEXT NOT NULL,
            favorite INTEGER NOT NULL,
            created_at TEXT
        );
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tag_categories (
            tag TEXT PRIMARY KEY,
            category_id TEXT,
            priority REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_items_author ON items(author);
        "#,
    )?;
    Ok(())
}

#[cfg(feature = "sqlite")]
fn open_conn(path: &std::path::Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

#[cfg(feature = "sqlite")]
fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    use rusqlite::types::Type;
    let state: String = row.get(4)?;
    let tags_s: String = row.get(5)?;
    let tags: Vec<String> = serde_json::from_str(&tags_s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Item {
        id: row.get(0)?,
        image: row.get(1)?,
        url: row.get(2)?,
        author: row.get(3)?,
        state: state.into(),
        tags,
        favorite: row.get::<_, i64>(6)? != 0,
        created_at: row.get(7)?,
    })
}

#[cfg(feature = "sqlite")]
const UPSERT_ITEM: &str = "INSERT INTO items (id, image, url, author, state, tags_json, favorite, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
     ON CONFLICT(id) DO UPDATE SET
        image=excluded.image,
        url=excluded.url,
        author=excluded.author,
        state=excluded.state,
        tags_json=excluded.tags_json,
        favorite=excluded.favorite,
        created_at=excluded.created_at";

#[cfg(feature = "sqlite")]
const UPSERT_CATEGORY: &str = "INSERT INTO categories (id, name, color) VALUES (?1, ?2, ?3)
     ON CONFLICT(id) DO UPDATE SET name=excluded.name, color=excluded.color";

#[cfg(feature = "sqlite")]
const UPSERT_ASSIGNMENT: &str = "INSERT INTO tag_categories (tag, category_id, priority) VALUES (?1, ?2, ?3)
     ON CONFLICT(tag) DO UPDATE SET category_id=excluded.category_id, priority=excluded.priority";

#[cfg(feature = "sqlite")]
fn put_record(conn: &Connection, record: &Record) -> anyhow::Result<()> {
    match record {
        Record::Items(item) => {
            conn.execute(
                UPSERT_ITEM,
                params![
                    item.id,
                    item.image,
                    item.url,
                    item.author,
                    item.state.as_str(),
                    serde_json::to_string(&item.tags)?,
                    i64::from(item.favorite),
                    item.created_at,
                ],
            )?;
        }
        Record::Categories(c) => {
            conn.execute(UPSERT_CATEGORY, params![c.id, c.name, c.color])?;
        }
        Record::TagAssignments(a) => {
            conn.execute(UPSERT_ASSIGNMENT, params![a.tag, a.category_id, a.priority])?;
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
#[derive(Debug, Clone)]
pub struct SqliteGalleryStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "sqlite")]
impl SqliteGalleryStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl GalleryStore for SqliteGalleryStore {
    fn list_items(&self) -> anyhow::Result<Vec<Item>> {
        let conn = open_conn(&self.path)?;
        let mut stmt = conn.prepare(
            "SELECT id, image, url, author, state, tags_json, favorite, created_at
             FROM items ORDER BY id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row_to_item(row)?);
        }
        Ok(out)
    }

    fn put_item(&self, item: &Item) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        put_record(&conn, &Record::Items(item.clone()))
    }

    fn delete_item(&self, id: i64) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute("DELETE FROM items WHERE id=?1", params![id])?;
        Ok(())
    }

    fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let conn = open_conn(&self.path)?;
        let mut stmt = conn.prepare("SELECT id, name, color FROM categories ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn put_category(&self, category: &Category) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute(
            UPSERT_CATEGORY,
            params![category.id, category.name, category.color],
        )?;
        Ok(())
    }

    fn delete_category(&self, id: &str) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
        Ok(())
    }

    fn list_assignments(&self) -> anyhow::Result<Vec<TagCategoryAssignment>> {
        let conn = open_conn(&self.path)?;
        let mut stmt =
            conn.prepare("SELECT tag, category_id, priority FROM tag_categories ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(TagCategoryAssignment {
                tag: row.get(0)?,
                category_id: row.get(1)?,
                priority: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn put_assignment(&self, assignment: &TagCategoryAssignment) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute(
            UPSERT_ASSIGNMENT,
            params![assignment.tag, assignment.category_id, assignment.priority],
        )?;
        Ok(())
    }

    fn delete_assignment(&self, tag: &str) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute("DELETE FROM tag_categories WHERE tag=?1", params![tag])?;
        Ok(())
    }

    fn import(&self, input: &mut dyn std::io::Read) -> anyhow::Result<usize> {
        let records = read_records(input)?;
        let mut conn = open_conn(&self.path)?;
        let tx = conn.transaction()?;
        for record in &records {
            put_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }
}

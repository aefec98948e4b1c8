/// Copy every record from a JSONL data directory into a SQLite database file.
///
/// - `jsonl_dir`: source directory (`items.jsonl`, `categories.jsonl`,
///   `tag_categories.jsonl`)
/// - `sqlite_path`: destination SQLite DB (created if missing)
///
/// Returns the count of imported records.
#[cfg(feature = "sqlite")]
pub fn migrate_jsonl_to_sqlite(
    jsonl_dir: &std::path::Path,
    sqlite_path: &std::path::Path,
) -> anyhow::Result<usize> {
    use crate::store::GalleryStore;
    use crate::store::jsonl::JsonlGalleryStore;
    use crate::store::sqlite::SqliteGalleryStore;

    let source = JsonlGalleryStore::new(jsonl_dir);
    let mut buf = Vec::new();
    source.export(&mut buf)?;

    if let Some(dir) = sqlite_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let dest = SqliteGalleryStore::new(sqlite_path);
    dest.import(&mut buf.as_slice())
}

#[cfg(not(feature = "sqlite"))]
pub fn migrate_jsonl_to_sqlite(
    _jsonl_dir: &std::path::Path,
    _sqlite_path: &std::path::Path,
) -> anyhow::Result<usize> {
    anyhow::bail!("sqlite backend not compiled; enable with `--features artshelf-gallery/sqlite`");
}

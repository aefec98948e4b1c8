use crate::store::GalleryStore;
use crate::store::jsonl::JsonlGalleryStore;

#[cfg(feature = "sqlite")]
use crate::store::sqlite::SqliteGalleryStore;

/// Backend selection for gallery persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Jsonl,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl Backend {
    /// Parse a backend name; `sqlite` falls back to JSONL when not compiled in.
    pub fn from_name(name: &str) -> Backend {
        match name {
            #[cfg(feature = "sqlite")]
            "sqlite" | "SQLITE" => Backend::Sqlite,
            "jsonl" | "JSONL" => Backend::Jsonl,
            other => {
                if !other.is_empty() {
                    tracing::warn!("unknown gallery backend {other:?}; using jsonl");
                }
                Backend::Jsonl
            }
        }
    }
}

/// Choose backend using env `ARTSHELF_BACKEND` if present: `sqlite` or `jsonl`.
/// Defaults to JSONL.
pub fn choose_backend_from_env() -> Backend {
    let v = std::env::var("ARTSHELF_BACKEND").unwrap_or_default();
    Backend::from_name(&v)
}

/// Directory holding gallery data for `root`: `<root>/.artshelf/`.
pub fn data_dir(root: &std::path::Path) -> std::path::PathBuf {
    root.join(".artshelf")
}

/// Build a store rooted at `<root>/.artshelf/`.
/// Paths can be overridden via env:
/// - `ARTSHELF_DATA_DIR` for the JSONL directory
/// - `ARTSHELF_DB` for the SQLite file path
pub fn open_store(
    root: &std::path::Path,
    backend: Option<Backend>,
) -> anyhow::Result<Box<dyn GalleryStore>> {
    let base = data_dir(root);
    let be = backend.unwrap_or_else(choose_backend_from_env);
    tracing::debug!("opening gallery store ({be:?}) under {}", base.display());
    Ok(match be {
        Backend::Jsonl => {
            let dir = std::env::var("ARTSHELF_DATA_DIR")
                .map(std::path::PathBuf::from)
                .unwrap_or(base);
            Box::new(JsonlGalleryStore::new(dir))
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            let path = std::env::var("ARTSHELF_DB")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|_| base.join("gallery.db"));
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            Box::new(SqliteGalleryStore::new(path))
        }
    })
}

pub mod database;
pub mod memory;
pub mod session;

pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use session::{SESSION_KEY, resolve_session_id};

use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value storage scoped to one running widget.
///
/// Stands in for the browser's per-tab `sessionStorage`; any backend works as
/// long as a value written with `set` is returned by later `get` calls.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Ensure the parent directory of a store file exists
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

// Key-value persistence store backed by SQLite
//
// One `kv(key, value)` table holds every buffer, note and progress set,
// addressed through the typed `StorageKey`. Reads and writes are
// synchronous; the store is only ever touched from the UI task, so a
// plain mutex around the connection is enough.
//
// Failure model: if the database cannot be opened or an operation fails,
// the store switches to an in-memory overlay instead of erroring out of
// the session. The first failure arms a one-shot notice that the
// controller surfaces to the view layer; work done while degraded
// survives the process but not a restart.

use crate::session::StorageKey;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Cheap-to-clone handle to the shared store
#[derive(Clone)]
pub struct KvStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    conn: Option<Connection>,
    /// Shadow map for writes that could not reach the database.
    /// Checked before the database on reads so degraded-mode writes stay
    /// visible for the rest of the session.
    overlay: HashMap<String, String>,
    degraded: bool,
    notice_pending: bool,
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl KvStore {
    /// Open (or create) the store at the given path.
    ///
    /// Never fails: an unopenable database yields a degraded in-memory
    /// store and arms the one-shot notice.
    pub fn open(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::error!("Could not create data directory {:?}: {}", parent, e);
                return Self::degraded_from_start();
            }
        }

        match Connection::open(path).and_then(|conn| {
            init_schema(&conn)?;
            Ok(conn)
        }) {
            Ok(conn) => {
                tracing::info!("Persistence store opened: {}", path.display());
                Self::from_parts(Some(conn), false)
            }
            Err(e) => {
                tracing::error!("Could not open persistence store {:?}: {}", path, e);
                Self::degraded_from_start()
            }
        }
    }

    /// Private in-process store. Used by tests and as the fallback when
    /// no database can be opened; exercises the same SQL path as `open`.
    pub fn in_memory() -> Self {
        match Connection::open_in_memory().and_then(|conn| {
            init_schema(&conn)?;
            Ok(conn)
        }) {
            Ok(conn) => Self::from_parts(Some(conn), false),
            Err(e) => {
                tracing::error!("Could not open in-memory store: {}", e);
                Self::from_parts(None, true)
            }
        }
    }

    fn from_parts(conn: Option<Connection>, degraded: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                conn,
                overlay: HashMap::new(),
                degraded,
                notice_pending: degraded,
            })),
        }
    }

    /// Keep the session alive on an in-process database: everything
    /// works, nothing survives a restart, and the one-shot notice is
    /// armed so the user learns about it.
    fn degraded_from_start() -> Self {
        let store = Self::in_memory();
        {
            let mut inner = store.inner.lock().unwrap();
            inner.degraded = true;
            inner.notice_pending = true;
        }
        store
    }

    /// Read a value. Returns `None` if the key was never written.
    pub fn get(&self, key: &StorageKey) -> Option<String> {
        let key = key.render();
        let mut inner = self.inner.lock().unwrap();

        // Overlay wins: it holds writes the database never saw
        if let Some(value) = inner.overlay.get(&key) {
            return Some(value.clone());
        }

        let Some(conn) = inner.conn.as_ref() else {
            return None;
        };

        let result = conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")
            .and_then(|mut stmt| {
                stmt.query_row(params![key], |row| row.get::<_, String>(0))
                    .optional()
            });

        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Store read failed for '{}': {}", key, e);
                inner.mark_degraded();
                None
            }
        }
    }

    /// Write a value, overwriting unconditionally. Idempotent.
    pub fn set(&self, key: &StorageKey, value: &str) {
        let key = key.render();
        let mut inner = self.inner.lock().unwrap();

        if let Some(conn) = inner.conn.as_ref() {
            let result = conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            );
            match result {
                Ok(_) => {
                    // A durable write supersedes any stale overlay entry
                    inner.overlay.remove(&key);
                    return;
                }
                Err(e) => {
                    tracing::error!("Store write failed for '{}': {}", key, e);
                    inner.mark_degraded();
                }
            }
        }

        inner.overlay.insert(key, value.to_string());
    }

    /// Whether the store has fallen back to in-memory operation
    pub fn is_degraded(&self) -> bool {
        self.inner.lock().unwrap().degraded
    }

    /// One-shot notice for the view layer: returns true exactly once
    /// after the store first degrades.
    pub fn take_degraded_notice(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        std::mem::take(&mut inner.notice_pending)
    }
}

impl StoreInner {
    fn mark_degraded(&mut self) {
        if !self.degraded {
            self.degraded = true;
            self.notice_pending = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Language, ProblemId};

    #[test]
    fn write_then_read_roundtrip() {
        let store = KvStore::in_memory();
        let key = StorageKey::Solution(ProblemId(42), Language::Python);

        assert_eq!(store.get(&key), None);
        store.set(&key, "print(1)");
        assert_eq!(store.get(&key).as_deref(), Some("print(1)"));
    }

    #[test]
    fn overwrite_is_unconditional() {
        let store = KvStore::in_memory();
        let key = StorageKey::Notes(ProblemId(5));

        store.set(&key, "first");
        store.set(&key, "second");
        assert_eq!(store.get(&key).as_deref(), Some("second"));
    }

    #[test]
    fn keys_do_not_collide_across_pairs() {
        let store = KvStore::in_memory();
        store.set(&StorageKey::Solution(ProblemId(1), Language::Python), "py");
        store.set(&StorageKey::Solution(ProblemId(1), Language::Java), "jv");
        store.set(&StorageKey::Solution(ProblemId(11), Language::Python), "other");

        assert_eq!(
            store
                .get(&StorageKey::Solution(ProblemId(1), Language::Python))
                .as_deref(),
            Some("py")
        );
        assert_eq!(
            store
                .get(&StorageKey::Solution(ProblemId(1), Language::Java))
                .as_deref(),
            Some("jv")
        );
    }

    #[test]
    fn degraded_store_keeps_working_in_memory() {
        let store = KvStore::degraded_from_start();
        let key = StorageKey::Solution(ProblemId(3), Language::Java);

        store.set(&key, "class Solution {}");
        assert_eq!(store.get(&key).as_deref(), Some("class Solution {}"));
        assert!(store.is_degraded());
    }

    #[test]
    fn degraded_notice_fires_once() {
        let store = KvStore::degraded_from_start();
        assert!(store.take_degraded_notice());
        assert!(!store.take_degraded_notice());
    }

    #[test]
    fn healthy_store_has_no_notice() {
        let store = KvStore::in_memory();
        assert!(!store.is_degraded());
        assert!(!store.take_degraded_notice());
    }
}

//! Single-value persisted stores with change notification.
//!
//! A store holds one JSON-serialisable value. Several processes may hold a
//! store over the same backing data; each can poll for writes made by the
//! others and forwards them to its subscribers. Writes are last-writer-wins
//! with no locking.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Database;
use crate::error::JornadaError;

/// A persisted single value.
pub trait KeyValueStore<T> {
    /// Read the current value, `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or decoded.
    fn get(&self) -> Result<Option<T>, JornadaError>;

    /// Replace the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or written.
    fn set(&mut self, value: &T) -> Result<(), JornadaError>;

    /// Receive every value written by another holder of the same store, as
    /// observed by [`KeyValueStore::poll_external`].
    fn subscribe(&mut self) -> Receiver<T>;

    /// Check for writes made elsewhere and notify subscribers.
    ///
    /// Returns `true` if an external change was observed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn poll_external(&mut self) -> Result<bool, JornadaError>;
}

fn notify<T: Clone>(subscribers: &mut Vec<Sender<T>>, value: &T) {
    subscribers.retain(|tx| tx.send(value.clone()).is_ok());
}

/// A store backed by one row of the `kv_store` table.
pub struct SqliteStore<T> {
    db: Rc<Database>,
    key: String,
    /// Raw JSON last read or written through this handle.
    last_seen: Option<String>,
    data_version: Option<i64>,
    subscribers: Vec<Sender<T>>,
    _value: PhantomData<T>,
}

impl<T> SqliteStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create a store for `key` in the given database.
    pub fn new(db: Rc<Database>, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
            last_seen: None,
            data_version: None,
            subscribers: Vec::new(),
            _value: PhantomData,
        }
    }

    fn read_raw(&self) -> Result<Option<String>, JornadaError> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| JornadaError::Database(format!("Failed to read '{}': {e}", self.key)))
    }
}

impl<T> KeyValueStore<T> for SqliteStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn get(&self) -> Result<Option<T>, JornadaError> {
        match self.read_raw()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, value: &T) -> Result<(), JornadaError> {
        let raw = serde_json::to_string(value)?;

        self.db
            .connection()
            .execute(
                r"INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                  ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                 updated_at = excluded.updated_at",
                params![self.key, raw, Utc::now().to_rfc3339()],
            )
            .map_err(|e| JornadaError::Database(format!("Failed to write '{}': {e}", self.key)))?;

        self.last_seen = Some(raw);
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn poll_external(&mut self) -> Result<bool, JornadaError> {
        let version = self.db.data_version()?;
        let first_poll = self.data_version.is_none();
        if self.data_version == Some(version) {
            return Ok(false);
        }
        self.data_version = Some(version);

        let raw = self.read_raw()?;
        if first_poll && self.last_seen.is_none() {
            // Establish a baseline without reporting it as a change.
            self.last_seen = raw;
            return Ok(false);
        }
        if raw == self.last_seen {
            // Another key in the same database changed.
            return Ok(false);
        }

        self.last_seen.clone_from(&raw);
        if let Some(raw) = raw {
            let value: T = serde_json::from_str(&raw)?;
            tracing::debug!(key = %self.key, "observed external write");
            notify(&mut self.subscribers, &value);
        }
        Ok(true)
    }
}

struct Shared<T> {
    value: Option<T>,
    version: u64,
    reject_writes: bool,
}

/// An in-process store.
///
/// Handles obtained through [`MemoryStore::handle`] share the value and see
/// each other's writes as external changes, the way separate processes do
/// with [`SqliteStore`].
pub struct MemoryStore<T> {
    shared: Rc<RefCell<Shared<T>>>,
    seen_version: u64,
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone> MemoryStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_shared(Rc::new(RefCell::new(Shared {
            value: None,
            version: 0,
            reject_writes: false,
        })))
    }

    /// Create a store already holding `value`.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        let store = Self::new();
        store.shared.borrow_mut().value = Some(value);
        store
    }

    fn from_shared(shared: Rc<RefCell<Shared<T>>>) -> Self {
        let seen_version = shared.borrow().version;
        Self {
            shared,
            seen_version,
            subscribers: Vec::new(),
        }
    }

    /// Another independent holder of the same value.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self::from_shared(Rc::clone(&self.shared))
    }

    /// Make every subsequent write fail, as a full or read-only store would.
    pub fn reject_writes(&self, reject: bool) {
        self.shared.borrow_mut().reject_writes = reject;
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> KeyValueStore<T> for MemoryStore<T> {
    fn get(&self) -> Result<Option<T>, JornadaError> {
        Ok(self.shared.borrow().value.clone())
    }

    fn set(&mut self, value: &T) -> Result<(), JornadaError> {
        let mut shared = self.shared.borrow_mut();
        if shared.reject_writes {
            return Err(JornadaError::Database("store rejected the write".to_string()));
        }
        shared.value = Some(value.clone());
        shared.version += 1;
        self.seen_version = shared.version;
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn poll_external(&mut self) -> Result<bool, JornadaError> {
        let (version, value) = {
            let shared = self.shared.borrow();
            (shared.version, shared.value.clone())
        };
        if version == self.seen_version {
            return Ok(false);
        }
        self.seen_version = version;
        if let Some(value) = value {
            notify(&mut self.subscribers, &value);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{EngineState, PlanConfig};

    fn sqlite_pair() -> (tempfile::TempDir, SqliteStore<PlanConfig>, SqliteStore<PlanConfig>) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("jornada.db");
        let first = SqliteStore::new(Rc::new(Database::open_at(&path).unwrap()), "config");
        let second = SqliteStore::new(Rc::new(Database::open_at(&path).unwrap()), "config");
        (temp_dir, first, second)
    }

    #[test]
    fn test_sqlite_get_empty() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        let store: SqliteStore<EngineState> = SqliteStore::new(db, "state");
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_sqlite_set_and_get() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        let mut store = SqliteStore::new(db, "state");

        let mut state = EngineState::default();
        state.work_item_ids = vec!["A".to_string()];
        store.set(&state).unwrap();
        store.set(&state).unwrap();

        assert_eq!(store.get().unwrap(), Some(state));
    }

    #[test]
    fn test_sqlite_keys_are_independent() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        let mut config_store = SqliteStore::new(Rc::clone(&db), "config");
        let state_store: SqliteStore<EngineState> = SqliteStore::new(db, "state");

        config_store.set(&PlanConfig::default()).unwrap();
        assert!(state_store.get().unwrap().is_none());
    }

    #[test]
    fn test_sqlite_corrupt_value_is_an_error() {
        let db = Rc::new(Database::open_in_memory().unwrap());
        db.connection()
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES ('config', 'nope', 'now')",
                [],
            )
            .unwrap();
        let store: SqliteStore<PlanConfig> = SqliteStore::new(db, "config");

        assert!(matches!(store.get(), Err(JornadaError::Json(_))));
    }

    #[test]
    fn test_sqlite_external_change_notifies() {
        let (_dir, mut watcher, mut writer) = sqlite_pair();
        let rx = watcher.subscribe();

        assert!(!watcher.poll_external().unwrap());

        let config = PlanConfig {
            focus_minutes: 50,
            ..PlanConfig::default()
        };
        writer.set(&config).unwrap();

        assert!(watcher.poll_external().unwrap());
        assert_eq!(rx.try_recv().unwrap(), config);
        assert!(!watcher.poll_external().unwrap());
    }

    #[test]
    fn test_sqlite_own_writes_are_not_external() {
        let (_dir, mut store, _other) = sqlite_pair();
        let rx = store.subscribe();

        store.poll_external().unwrap();
        store.set(&PlanConfig::default()).unwrap();

        assert!(!store.poll_external().unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_memory_handles_share_value() {
        let mut first = MemoryStore::new();
        let mut second = first.handle();
        let rx = second.subscribe();

        first.set(&7_u32).unwrap();
        assert_eq!(second.get().unwrap(), Some(7));
        assert!(second.poll_external().unwrap());
        assert_eq!(rx.try_recv().unwrap(), 7);

        // The writer does not see its own write as external.
        assert!(!first.poll_external().unwrap());
    }

    #[test]
    fn test_memory_reject_writes() {
        let mut store = MemoryStore::with_value(1_u32);
        store.reject_writes(true);

        assert!(store.set(&2).is_err());
        assert_eq!(store.get().unwrap(), Some(1));

        store.reject_writes(false);
        store.set(&2).unwrap();
        assert_eq!(store.get().unwrap(), Some(2));
    }
}

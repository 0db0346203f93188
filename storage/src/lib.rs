//! Key/value persistence port for the admin auth engine.
//!
//! The session layer treats persisted records as opaque bytes behind the
//! [`SessionStorage`] trait, so the backing store is injectable: tests and
//! ephemeral processes use [`MemoryStore`], long-lived processes use the
//! file-backed [`RedbStore`]. The engine performs at most one read at
//! startup and one write per login/logout, so neither adapter needs to be
//! clever about contention.

pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, TableDefinition};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub use error::{Result, StorageError};

const SESSION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("admin_kv");

/// The persistence port: a minimal byte-oriented key/value store.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Fetch the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// In-memory adapter. State lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

/// ReDB-backed adapter for durable storage across restarts.
pub struct RedbStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening session store database at: {:?}", path);
        let db = Database::create(&path)?;

        // Initialize the table so first reads see it
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SESSION_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for RedbStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        match table.get(key)? {
            Some(bytes) => {
                debug!("Storage hit: key={}", key);
                Ok(Some(bytes.value().to_vec()))
            }
            None => {
                debug!("Storage miss: key={}", key);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;

        debug!("Stored {} bytes under key={}", value.len(), key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            let removed = table.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;

        debug!("Deleted key={} (existed: {})", key, deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        assert!(store.get("missing").await.unwrap().is_none());

        store.put("session", b"payload").await.unwrap();
        assert_eq!(
            store.get("session").await.unwrap().unwrap(),
            b"payload".to_vec()
        );

        // Overwrite replaces
        store.put("session", b"other").await.unwrap();
        assert_eq!(
            store.get("session").await.unwrap().unwrap(),
            b"other".to_vec()
        );

        assert!(store.delete("session").await.unwrap());
        assert!(!store.delete("session").await.unwrap());
        assert!(store.get("session").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redb_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = RedbStore::open(dir.path().join("sessions.redb")).unwrap();

        assert!(store.get("admin_session").await.unwrap().is_none());

        store.put("admin_session", b"{\"x\":1}").await.unwrap();
        assert_eq!(
            store.get("admin_session").await.unwrap().unwrap(),
            b"{\"x\":1}".to_vec()
        );

        assert!(store.delete("admin_session").await.unwrap());
        assert!(store.get("admin_session").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redb_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sessions.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("admin_session", b"persisted").await.unwrap();
        }

        let reopened = RedbStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("admin_session").await.unwrap().unwrap(),
            b"persisted".to_vec()
        );
    }
}

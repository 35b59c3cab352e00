//! The persistence port and its native backends.
//!
//! The store writes its whole collection as one JSON blob under one key, so
//! a backend only has to offer whole-value reads and writes.

use crate::core::error::StorageError;
use std::collections::HashMap;

/// Key-value persistence for note snapshots.
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write is refused or the backend is unreachable.
    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).store(key, value)
    }
}

/// In-process storage; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates `key`, as if an earlier session had written it.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::Storage;
    use crate::core::error::StorageError;
    use rusqlite::{Connection, OptionalExtension};
    use std::path::Path;

    const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );";

    /// A single-table SQLite file standing in for browser local storage on native hosts.
    pub struct SqliteStorage {
        conn: Connection,
    }

    impl SqliteStorage {
        /// Creates (or reuses) the `kv` table in the database at `path`.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Database`] for any SQLite failure.
        pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
            let conn = Connection::open(path)?;
            conn.execute_batch(SCHEMA)?;
            Ok(Self { conn })
        }

        /// Opens an existing store, checking that it has the `kv` table.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::InvalidStore`] if the file is not a Jotpad
        /// store, or [`StorageError::Database`] for any SQLite failure.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
            let conn = Connection::open(path)?;

            let table_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'kv'",
                [],
                |row| row.get(0),
            )?;

            if table_count != 1 {
                return Err(StorageError::InvalidStore(
                    "Not a valid Jotpad store".to_string(),
                ));
            }

            Ok(Self { conn })
        }

        /// An in-memory database, handy for tests.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Database`] for any SQLite failure.
        pub fn in_memory() -> Result<Self, StorageError> {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(SCHEMA)?;
            Ok(Self { conn })
        }

        pub fn connection(&self) -> &Connection {
            &self.conn
        }
    }

    impl Storage for SqliteStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            let value = self
                .conn
                .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?;
            Ok(value)
        }

        fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::NamedTempFile;

        #[test]
        fn test_create_storage() {
            let temp = NamedTempFile::new().unwrap();
            let storage = SqliteStorage::create(temp.path()).unwrap();

            let tables: Vec<String> = storage
                .connection()
                .prepare("SELECT name FROM sqlite_master WHERE type='table'")
                .unwrap()
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<std::result::Result<_, _>>()
                .unwrap();

            assert!(tables.contains(&"kv".to_string()));
        }

        #[test]
        fn test_values_survive_reopen() {
            let temp = NamedTempFile::new().unwrap();
            {
                let mut storage = SqliteStorage::create(temp.path()).unwrap();
                storage.store("notes", "[]").unwrap();
                storage.store("notes", "[1]").unwrap();
            }

            let storage = SqliteStorage::open(temp.path()).unwrap();
            assert_eq!(storage.load("notes").unwrap().as_deref(), Some("[1]"));
            assert_eq!(storage.load("missing").unwrap(), None);
        }

        #[test]
        fn test_open_invalid_database() {
            let temp = NamedTempFile::new().unwrap();
            std::fs::write(temp.path(), "not a database").unwrap();

            let result = SqliteStorage::open(temp.path());
            assert!(result.is_err());
        }

        #[test]
        fn test_open_database_without_kv_table() {
            let temp = NamedTempFile::new().unwrap();
            {
                let conn = Connection::open(temp.path()).unwrap();
                conn.execute("CREATE TABLE other (id INTEGER PRIMARY KEY)", [])
                    .unwrap();
            }

            let result = SqliteStorage::open(temp.path());
            assert!(matches!(result, Err(StorageError::InvalidStore(_))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("k").unwrap(), None);
        storage.store("k", "v1").unwrap();
        storage.store("k", "v2").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.get("k"), Some("v2"));
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn Storage> = Box::new(MemoryStorage::new().with_entry("a", "1"));
        assert_eq!(storage.load("a").unwrap().as_deref(), Some("1"));
        storage.store("b", "2").unwrap();
        assert_eq!(storage.load("b").unwrap().as_deref(), Some("2"));
    }
}

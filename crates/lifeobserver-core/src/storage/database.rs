//! Embedded key/object store over SQLite.
//!
//! Each named collection is one table holding whole records as JSON text,
//! keyed either explicitly (the key is a field of the record) or
//! automatically (SQLite assigns a surrogate rowid on insert). Typed
//! repositories in [`super::repos`] sit on top of this and handle
//! (de)serialization.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde_json::Value;

use super::{data_dir, migrations};
use crate::error::StorageError;

/// The fixed set of named collections.
///
/// `moods`/`habits`/`tasks` are explicit-keyed by `id`, `appState` by
/// `key`; the remaining three are auto-keyed append logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Moods,
    Habits,
    Tasks,
    ChatHistory,
    AppState,
    PunchRecords,
    WorkTimeRecords,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Moods,
        Collection::Habits,
        Collection::Tasks,
        Collection::ChatHistory,
        Collection::AppState,
        Collection::PunchRecords,
        Collection::WorkTimeRecords,
    ];

    /// Collection name as it appears in the schema and in backup files.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Moods => "moods",
            Collection::Habits => "habits",
            Collection::Tasks => "tasks",
            Collection::ChatHistory => "chatHistory",
            Collection::AppState => "appState",
            Collection::PunchRecords => "punchRecords",
            Collection::WorkTimeRecords => "workTimeRecords",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.name() == name)
    }

    /// The record field an explicit key is read from, `None` for
    /// auto-keyed collections.
    pub fn key_field(self) -> Option<&'static str> {
        match self {
            Collection::Moods | Collection::Habits | Collection::Tasks => Some("id"),
            Collection::AppState => Some("key"),
            _ => None,
        }
    }
}

/// The effective key a `put` landed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    /// Surrogate key assigned by an auto-keyed collection.
    Auto(i64),
    /// Canonical string form of an explicit key.
    Explicit(String),
}

/// Extract the canonical key string from an explicit-keyed record.
///
/// Integer ids and string keys are both accepted; anything else (or a
/// missing field) is a [`StorageError::MissingKey`].
fn explicit_key(collection: Collection, record: &Value) -> Result<String, StorageError> {
    let field = collection
        .key_field()
        .expect("explicit_key called on auto-keyed collection");
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(StorageError::MissingKey {
            collection: collection.name(),
            key_field: field,
        }),
    }
}

/// SQLite-backed store for all application collections.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open the database at `~/.config/lifeobserver/lifeobserver.db`.
    ///
    /// Creates the file and any missing collection tables, then applies
    /// pending schema migrations.
    ///
    /// # Errors
    /// Returns [`StorageError::Unavailable`] if the database cannot be
    /// opened -- this is fatal to the application.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::Unavailable {
                path: PathBuf::from("~/.config"),
                message: e.to_string(),
            })?
            .join("lifeobserver.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::Unavailable {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        let db = Self {
            conn,
            path: path.to_path_buf(),
        };
        migrations::migrate(&db.conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Unavailable {
            path: PathBuf::from(":memory:"),
            message: source.to_string(),
        })?;
        let db = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        migrations::migrate(&db.conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a record, returning the effective key.
    ///
    /// For explicit-keyed collections the key is read from the record;
    /// for auto-keyed collections SQLite assigns the next surrogate key.
    pub fn put(&self, collection: Collection, record: &Value) -> Result<RecordKey, StorageError> {
        let text = record.to_string();
        let write = |source| StorageError::Write {
            collection: collection.name(),
            source,
        };
        match collection.key_field() {
            Some(_) => {
                let key = explicit_key(collection, record)?;
                self.conn
                    .execute(
                        &format!(
                            "INSERT OR REPLACE INTO \"{}\" (key, record) VALUES (?1, ?2)",
                            collection.name()
                        ),
                        params![key, text],
                    )
                    .map_err(write)?;
                tracing::debug!(collection = collection.name(), %key, "put");
                Ok(RecordKey::Explicit(key))
            }
            None => {
                self.conn
                    .execute(
                        &format!(
                            "INSERT INTO \"{}\" (record) VALUES (?1)",
                            collection.name()
                        ),
                        params![text],
                    )
                    .map_err(write)?;
                Ok(RecordKey::Auto(self.conn.last_insert_rowid()))
            }
        }
    }

    /// Fetch one record by key. Absence is `Ok(None)`, never an error.
    pub fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StorageError> {
        let sql = match collection.key_field() {
            Some(_) => format!(
                "SELECT record FROM \"{}\" WHERE key = ?1",
                collection.name()
            ),
            None => format!(
                "SELECT record FROM \"{}\" WHERE key = CAST(?1 AS INTEGER)",
                collection.name()
            ),
        };
        let result = self
            .conn
            .query_row(&sql, params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(text) => Ok(Some(parse_record(collection, &text)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(source) => Err(StorageError::Read {
                collection: collection.name(),
                source,
            }),
        }
    }

    /// Every record in the collection, in storage (insertion) order.
    ///
    /// Storage order is not sorted by any business key; callers sort.
    pub fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        let read = |source| StorageError::Read {
            collection: collection.name(),
            source,
        };
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT record FROM \"{}\" ORDER BY rowid",
                collection.name()
            ))
            .map_err(read)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(read)?;

        let mut records = Vec::new();
        for row in rows {
            let text = row.map_err(read)?;
            records.push(parse_record(collection, &text)?);
        }
        Ok(records)
    }

    /// Remove one record; no-op when the key is absent.
    pub fn delete(&self, collection: Collection, key: &str) -> Result<(), StorageError> {
        let sql = match collection.key_field() {
            Some(_) => format!("DELETE FROM \"{}\" WHERE key = ?1", collection.name()),
            None => format!(
                "DELETE FROM \"{}\" WHERE key = CAST(?1 AS INTEGER)",
                collection.name()
            ),
        };
        self.conn
            .execute(&sql, params![key])
            .map_err(|source| StorageError::Write {
                collection: collection.name(),
                source,
            })?;
        Ok(())
    }

    /// Remove every record in the collection.
    pub fn clear(&self, collection: Collection) -> Result<(), StorageError> {
        self.conn
            .execute(&format!("DELETE FROM \"{}\"", collection.name()), [])
            .map_err(|source| StorageError::Write {
                collection: collection.name(),
                source,
            })?;
        Ok(())
    }

    /// Atomically clear the collection and bulk-insert `records`.
    ///
    /// Runs inside a single SQLite transaction: either every record lands
    /// or the collection is left exactly as it was.
    pub fn replace_all(
        &self,
        collection: Collection,
        records: &[Value],
    ) -> Result<(), StorageError> {
        let write = |source| StorageError::Write {
            collection: collection.name(),
            source,
        };
        let tx = self.conn.unchecked_transaction().map_err(write)?;
        tx.execute(&format!("DELETE FROM \"{}\"", collection.name()), [])
            .map_err(write)?;
        for record in records {
            match collection.key_field() {
                Some(_) => {
                    let key = explicit_key(collection, record)?;
                    tx.execute(
                        &format!(
                            "INSERT OR REPLACE INTO \"{}\" (key, record) VALUES (?1, ?2)",
                            collection.name()
                        ),
                        params![key, record.to_string()],
                    )
                    .map_err(write)?;
                }
                None => {
                    tx.execute(
                        &format!(
                            "INSERT INTO \"{}\" (record) VALUES (?1)",
                            collection.name()
                        ),
                        params![record.to_string()],
                    )
                    .map_err(write)?;
                }
            }
        }
        tx.commit().map_err(write)?;
        tracing::debug!(
            collection = collection.name(),
            count = records.len(),
            "replace_all"
        );
        Ok(())
    }
}

fn parse_record(collection: Collection, text: &str) -> Result<Value, StorageError> {
    serde_json::from_str(text).map_err(|source| StorageError::Corrupt {
        collection: collection.name(),
        source,
    })
}

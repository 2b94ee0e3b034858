//! JSON backup export and import.
//!
//! The backup file is an object whose top-level keys are collection
//! names, each holding that collection's raw records. A subset of
//! collections is a valid backup; import only touches the collections
//! the file names. There is no schema-version field in the file (see
//! DESIGN.md).

use serde_json::{Map, Value};

use crate::error::{CoreError, StorageError};
use crate::storage::{Collection, Database};

/// Gather the named collections into a backup object.
pub fn export(db: &Database, collections: &[Collection]) -> Result<Value, StorageError> {
    let mut backup = Map::new();
    for collection in collections {
        backup.insert(
            collection.name().to_string(),
            Value::Array(db.get_all(*collection)?),
        );
    }
    Ok(Value::Object(backup))
}

/// Gather every collection.
pub fn export_all(db: &Database) -> Result<Value, StorageError> {
    export(db, &Collection::ALL)
}

/// What an import did, per top-level key.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Collection name and record count, in file order.
    pub imported: Vec<(String, usize)>,
    /// Top-level keys that matched no collection (or were not arrays).
    pub skipped: Vec<String>,
}

/// Replace each collection named in the backup with the file's records.
///
/// Each collection is swapped in one transaction; collections absent
/// from the file are left untouched. A file that is not a JSON object
/// fails before anything is written.
pub fn import(db: &Database, backup: &Value) -> Result<ImportSummary, CoreError> {
    let Some(object) = backup.as_object() else {
        return Err(CoreError::Custom(
            "backup file must be a JSON object keyed by collection name".into(),
        ));
    };

    let mut summary = ImportSummary::default();
    for (key, value) in object {
        match (Collection::from_name(key), value.as_array()) {
            (Some(collection), Some(records)) => {
                db.replace_all(collection, records)?;
                summary.imported.push((key.clone(), records.len()));
            }
            _ => {
                tracing::warn!(%key, "ignoring unknown backup key");
                summary.skipped.push(key.clone());
            }
        }
    }
    Ok(summary)
}

/// Wipe every collection. The caller owns the "are you sure" dance.
pub fn clear_all(db: &Database) -> Result<(), StorageError> {
    for collection in Collection::ALL {
        db.clear(collection)?;
    }
    Ok(())
}

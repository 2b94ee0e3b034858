//! Database schema migrations for lifeobserver.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version; each migration step runs exactly once per database file.

use rusqlite::{Connection, Result as SqliteResult};

use super::database::Collection;

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: declare every named collection.
///
/// Explicit-keyed collections store the key as text; auto-keyed
/// collections let SQLite assign an increasing surrogate key, which is
/// also the storage order `get_all` reports.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    for collection in Collection::ALL {
        let sql = match collection.key_field() {
            Some(_) => format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (
                    key    TEXT PRIMARY KEY,
                    record TEXT NOT NULL
                );",
                collection.name()
            ),
            None => format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (
                    key    INTEGER PRIMARY KEY AUTOINCREMENT,
                    record TEXT NOT NULL
                );",
                collection.name()
            ),
        };
        tx.execute_batch(&sql)?;
    }

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        // Every collection table exists.
        for collection in Collection::ALL {
            let count: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM \"{}\"", collection.name()),
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);
    }

    #[test]
    fn set_and_get_version() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        assert_eq!(get_schema_version(&conn), 1);
    }
}

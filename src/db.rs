use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "bookkeeper.db";

/// Opens the database file, creating it if needed. Each repository call
/// opens its own connection and drops it before returning.
pub fn get_connection(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

#[cfg(test)]
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_connection_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("books").join(DB_FILE);
        let conn = get_connection(&path).unwrap();
        assert!(path.exists());
        assert!(list_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_list_tables_skips_internal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join(DB_FILE)).unwrap();
        conn.execute_batch("CREATE TABLE b (pk INTEGER PRIMARY KEY AUTOINCREMENT); CREATE TABLE a (x INTEGER);")
            .unwrap();
        assert_eq!(list_tables(&conn).unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}

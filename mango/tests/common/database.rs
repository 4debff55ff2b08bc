//! Shared database test utilities.

use mango::Database;

/// Whether the target database has a table with this name.
#[allow(dead_code)]
pub fn has_table(db: &Database, table: &str) -> bool {
    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

/// Column names of a table, in declaration order.
#[allow(dead_code)]
pub fn columns(db: &Database, table: &str) -> Vec<String> {
    let mut stmt = db
        .connection()
        .prepare(&format!("PRAGMA table_info({table})"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// `(identity, applied)` for every ledger row, by identity.
#[allow(dead_code)]
pub fn ledger_rows(db: &Database) -> Vec<(String, bool)> {
    let mut stmt = db
        .connection()
        .prepare("SELECT identity, applied FROM mango_db_versions ORDER BY identity")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

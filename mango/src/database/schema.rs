//! SQL for the ledger table.
//!
//! The table name is configurable, so statements are built per table. Names
//! reaching these functions have already been validated as identifiers.

/// Default name of the ledger table.
pub const DEFAULT_TABLE: &str = "mango_db_versions";

/// Checks for a table by name.
pub const TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// Creates the ledger table.
///
/// `required_identities` holds a JSON array; `applied_at` an RFC 3339
/// timestamp.
pub fn create_table(table: &str) -> String {
    format!(
        r"
    CREATE TABLE IF NOT EXISTS {table} (
        identity TEXT PRIMARY KEY NOT NULL,
        required_identities TEXT NOT NULL DEFAULT '[]',
        query_up TEXT NOT NULL DEFAULT '',
        query_down TEXT NOT NULL DEFAULT '',
        applied INTEGER NOT NULL DEFAULT 0,
        applied_at TEXT,
        order_applied INTEGER
    )"
    )
}

/// Selects every record, in apply order then identity.
pub fn select_records(table: &str) -> String {
    format!(
        r"
    SELECT identity, required_identities, query_up, query_down, applied, applied_at, order_applied
    FROM {table}
    ORDER BY order_applied IS NULL, order_applied, identity"
    )
}

/// Inserts or replaces one record.
pub fn upsert_record(table: &str) -> String {
    format!(
        r"
    INSERT OR REPLACE INTO {table}
    (identity, required_identities, query_up, query_down, applied, applied_at, order_applied)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    )
}

//! Statement execution and ledger persistence for `SQLite`.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::error::{Error, Result};
use crate::gateway::{MigrationStore, StatementExecutor};
use crate::migration::Migration;

use super::connection::Database;
use super::schema;

/// Raw ledger columns, decoded into a [`Migration`] outside the row closure.
struct RecordRow {
    identity: String,
    required_identities: String,
    query_up: String,
    query_down: String,
    applied: bool,
    applied_at: Option<String>,
    order_applied: Option<i64>,
}

impl RecordRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            identity: row.get(0)?,
            required_identities: row.get(1)?,
            query_up: row.get(2)?,
            query_down: row.get(3)?,
            applied: row.get(4)?,
            applied_at: row.get(5)?,
            order_applied: row.get(6)?,
        })
    }

    fn into_migration(self) -> Result<Migration> {
        let required: Vec<String> = serde_json::from_str(&self.required_identities)?;

        let applied_at = match (self.applied, self.applied_at) {
            (false, _) => None,
            (true, Some(text)) => Some(parse_timestamp(&self.identity, &text)?),
            (true, None) => {
                log::warn!(
                    "ledger marks {} applied without a timestamp",
                    self.identity
                );
                Some(DateTime::<Utc>::UNIX_EPOCH)
            }
        };

        Migration::builder(self.identity)
            .required_identities(required)
            .up_body(self.query_up)
            .down_body(self.query_down)
            .applied_at(applied_at)
            .order_applied(self.order_applied)
            .build()
    }
}

fn parse_timestamp(identity: &str, text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Validation {
            field: format!("applied_at of {identity}"),
            message: format!("Invalid timestamp '{text}': {e}"),
        })
}

impl StatementExecutor for Database {
    fn execute(&mut self, statement: &str) -> Result<()> {
        self.conn.execute_batch(statement)?;
        Ok(())
    }
}

impl MigrationStore for Database {
    fn table_exists(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(schema::TABLE_EXISTS, [self.table()], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn create_table(&mut self) -> Result<()> {
        self.conn.execute_batch(&schema::create_table(self.table()))?;
        Ok(())
    }

    fn list_records(&self) -> Result<Vec<Migration>> {
        let mut stmt = self.conn.prepare(&schema::select_records(self.table()))?;
        let rows = stmt
            .query_map([], RecordRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RecordRow::into_migration).collect()
    }

    fn upsert_record(&mut self, migration: &Migration) -> Result<()> {
        let required = serde_json::to_string(migration.required_identities())?;
        let applied_at = migration.applied_at().map(|at| at.to_rfc3339());

        self.conn.execute(
            &schema::upsert_record(self.table()),
            params![
                migration.identity(),
                required,
                migration.up_body(),
                migration.down_body(),
                migration.is_applied(),
                applied_at,
                migration.order_applied(),
            ],
        )?;

        log::debug!(
            "recorded {} as {}",
            migration.identity(),
            if migration.is_applied() { "applied" } else { "reverted" }
        );
        Ok(())
    }
}

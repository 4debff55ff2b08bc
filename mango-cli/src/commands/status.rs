//! Status command implementation.
//!
//! This module implements the `status` command, which lists every migration
//! in dependency order with its applied state, followed by ledger records
//! whose source file is gone.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_session, GlobalOptions};
use clap::{Args, ValueEnum};
use mango::{Migration, WorkingSet};
use std::io::Write;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 5] = ["migration", "state", "applied_at", "order", "requires"];

/// Show the applied state of every migration.
#[derive(Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "MANGO_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Only list migrations that are not applied
    #[arg(long)]
    pub pending: bool,
}

/// Output format for the status command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

/// One line of status output.
struct StatusRow<'a> {
    migration: &'a Migration,
    state: &'static str,
}

impl StatusRow<'_> {
    fn applied_at(&self) -> String {
        self.migration
            .applied_at()
            .map(format_timestamp)
            .unwrap_or_default()
    }

    fn order(&self) -> String {
        self.migration
            .order_applied()
            .map(|order| order.to_string())
            .unwrap_or_default()
    }

    fn requires(&self) -> String {
        self.migration.required_identities().join(" ")
    }
}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;

        // Reading status never creates the ledger table.
        let options = config.run_options().with_dry_run(true);
        let session = open_session(global, &config, options)?;

        let mut rows = collect_rows(session.working_set());
        if self.pending {
            rows.retain(|row| row.state == "pending");
        }

        match self.format {
            OutputFormat::Table => format_as_table(&rows)?,
            OutputFormat::Json => format_as_json(&rows)?,
            OutputFormat::Csv => format_as_delimited(&rows, b',')?,
            OutputFormat::Tsv => format_as_delimited(&rows, b'\t')?,
        }

        Ok(())
    }
}

fn collect_rows(set: &WorkingSet) -> Vec<StatusRow<'_>> {
    let known = set
        .topological_order()
        .iter()
        .filter_map(|identity| set.get(identity))
        .map(|migration| StatusRow {
            migration,
            state: if migration.is_applied() {
                "applied"
            } else {
                "pending"
            },
        });

    let orphans = set.orphans().iter().map(|migration| StatusRow {
        migration,
        state: "orphaned",
    });

    known.chain(orphans).collect()
}

/// Format rows as a human-readable table.
fn format_as_table(rows: &[StatusRow<'_>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for row in rows {
        let or_dash = |s: String| if s.is_empty() { "-".to_string() } else { s };
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            row.migration.identity(),
            row.state,
            or_dash(row.applied_at()),
            or_dash(row.order()),
            or_dash(row.requires()),
        )?;
    }

    Ok(())
}

/// Format rows as JSON.
fn format_as_json(rows: &[StatusRow<'_>]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "migration": row.migration.identity(),
                "state": row.state,
                "applied_at": row.migration.applied_at().map(|ts| ts.to_rfc3339()),
                "order": row.migration.order_applied(),
                "requires": row.migration.required_identities(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    writeln!(handle)?;

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Format rows as delimited output (CSV or TSV).
fn format_as_delimited(rows: &[StatusRow<'_>], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                row.migration.identity().to_string(),
                row.state.to_string(),
                row.applied_at(),
                row.order(),
                row.requires(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;

    Ok(())
}

//! Configuration validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use mango::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::with_defaults()).unwrap();
///
/// let bad = Config { table: Some("drop table".into()), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate every field that is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref path) = config.database {
            if path.as_os_str().is_empty() {
                return Err(Error::Validation {
                    field: "database".into(),
                    message: "Cannot be empty".into(),
                });
            }
        }

        if let Some(ref path) = config.migrations_dir {
            if path.as_os_str().is_empty() {
                return Err(Error::Validation {
                    field: "migrations_dir".into(),
                    message: "Cannot be empty".into(),
                });
            }
        }

        if let Some(ref pattern) = config.file_pattern {
            Regex::new(pattern).map_err(|e| Error::Validation {
                field: "file_pattern".into(),
                message: format!("Invalid regular expression: {e}"),
            })?;
        }

        if let Some(ref table) = config.table {
            Self::validate_table_name(table)?;
        }

        if let Some(timeout) = config.busy_timeout_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "busy_timeout_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    /// The ledger table name is formatted into SQL, so it must be a plain
    /// identifier.
    fn validate_table_name(table: &str) -> Result<()> {
        static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
        let identifier = IDENTIFIER.get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("identifier pattern is valid")
        });

        if !identifier.is_match(table) {
            return Err(Error::Validation {
                field: "table".into(),
                message: format!(
                    "'{table}' is not a valid table name (letters, digits and underscores only)"
                ),
            });
        }
        Ok(())
    }
}

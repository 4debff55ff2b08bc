//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `MANGO_*` environment variables that
//! override configuration file values.

use std::env;
use std::path::PathBuf;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// | Variable | Field |
/// |---|---|
/// | `MANGO_DATABASE` | `database` |
/// | `MANGO_MIGRATIONS_DIR` | `migrations_dir` |
/// | `MANGO_FILE_PATTERN` | `file_pattern` |
/// | `MANGO_TABLE` | `table` |
/// | `MANGO_AUTO_APPLY_PREREQUISITES` | `auto_apply_prerequisites` |
/// | `MANGO_STRICT_ORPHANS` | `strict_orphans` |
/// | `MANGO_BUSY_TIMEOUT_SECONDS` | `busy_timeout_seconds` |
///
/// # Examples
///
/// ```no_run
/// use mango::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean or numeric variable cannot be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(path) = env::var("MANGO_DATABASE") {
            config.database = Some(PathBuf::from(path));
        }

        if let Ok(path) = env::var("MANGO_MIGRATIONS_DIR") {
            config.migrations_dir = Some(PathBuf::from(path));
        }

        if let Ok(pattern) = env::var("MANGO_FILE_PATTERN") {
            config.file_pattern = Some(pattern);
        }

        if let Ok(table) = env::var("MANGO_TABLE") {
            config.table = Some(table);
        }

        if let Ok(val) = env::var("MANGO_AUTO_APPLY_PREREQUISITES") {
            config.auto_apply_prerequisites =
                Some(Self::parse_bool("MANGO_AUTO_APPLY_PREREQUISITES", &val)?);
        }

        if let Ok(val) = env::var("MANGO_STRICT_ORPHANS") {
            config.strict_orphans = Some(Self::parse_bool("MANGO_STRICT_ORPHANS", &val)?);
        }

        if let Ok(seconds) = env::var("MANGO_BUSY_TIMEOUT_SECONDS") {
            config.busy_timeout_seconds =
                Some(seconds.trim().parse().map_err(|_| Error::Validation {
                    field: "MANGO_BUSY_TIMEOUT_SECONDS".into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "MANGO_DATABASE",
        "MANGO_MIGRATIONS_DIR",
        "MANGO_FILE_PATTERN",
        "MANGO_TABLE",
        "MANGO_AUTO_APPLY_PREREQUISITES",
        "MANGO_STRICT_ORPHANS",
        "MANGO_BUSY_TIMEOUT_SECONDS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_bool_variants() {
        for s in ["true", "TRUE", "1", "yes", "on", " On "] {
            assert!(EnvironmentConfig::parse_bool("test", s).unwrap());
        }
        for s in ["false", "FALSE", "0", "no", "off"] {
            assert!(!EnvironmentConfig::parse_bool("test", s).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        let result = EnvironmentConfig::parse_bool("test", "maybe");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        clear_env();
        env::set_var("MANGO_DATABASE", "/tmp/env.db");
        env::set_var("MANGO_TABLE", "schema_log");
        env::set_var("MANGO_STRICT_ORPHANS", "yes");
        env::set_var("MANGO_BUSY_TIMEOUT_SECONDS", "12");

        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_env();

        assert_eq!(config.database, Some(PathBuf::from("/tmp/env.db")));
        assert_eq!(config.table, Some("schema_log".to_string()));
        assert_eq!(config.strict_orphans, Some(true));
        assert_eq!(config.busy_timeout_seconds, Some(12));
        assert!(config.migrations_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_rejected() {
        clear_env();
        env::set_var("MANGO_BUSY_TIMEOUT_SECONDS", "soon");

        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_env();

        assert!(matches!(
            result,
            Err(Error::Validation { ref field, .. }) if field == "MANGO_BUSY_TIMEOUT_SECONDS"
        ));
    }

    #[test]
    #[serial]
    fn test_no_variables_leaves_config_untouched() {
        clear_env();
        let mut config = Config::with_defaults();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::with_defaults());
    }
}

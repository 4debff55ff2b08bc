//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use mango::config::{Config, ConfigMerger};
///
/// let low = Config { table: Some("low".to_string()), ..Default::default() };
/// let high = Config { table: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.table, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given lowest to highest precedence, over `base`.
    #[must_use]
    pub fn merge(base: Config, sources: &[ConfigSource]) -> Config {
        let mut result = base;
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.database.is_some() {
            target.database.clone_from(&source.database);
        }

        if source.migrations_dir.is_some() {
            target.migrations_dir.clone_from(&source.migrations_dir);
        }

        if source.file_pattern.is_some() {
            target.file_pattern.clone_from(&source.file_pattern);
        }

        if source.table.is_some() {
            target.table.clone_from(&source.table);
        }

        if source.auto_apply_prerequisites.is_some() {
            target.auto_apply_prerequisites = source.auto_apply_prerequisites;
        }

        if source.strict_orphans.is_some() {
            target.strict_orphans = source.strict_orphans;
        }

        if source.busy_timeout_seconds.is_some() {
            target.busy_timeout_seconds = source.busy_timeout_seconds;
        }
    }
}

//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::Config;
use proptest::prelude::*;
use std::path::PathBuf;

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of("[a-z]{1,10}\\.db"),
        prop::option::of("[a-z]{1,10}"),
        prop::option::of("[a-z_]{1,20}"),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..600),
    )
        .prop_map(|(database, dir, table, auto_apply, strict, timeout)| Config {
            database: database.map(PathBuf::from),
            migrations_dir: dir.map(PathBuf::from),
            table,
            auto_apply_prerequisites: auto_apply,
            strict_orphans: strict,
            busy_timeout_seconds: timeout,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Set fields in the higher source win; unset ones keep the lower value
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(merged.database, high.database.or(low.database));
        prop_assert_eq!(merged.migrations_dir, high.migrations_dir.or(low.migrations_dir));
        prop_assert_eq!(merged.table, high.table.or(low.table));
        prop_assert_eq!(
            merged.auto_apply_prerequisites,
            high.auto_apply_prerequisites.or(low.auto_apply_prerequisites)
        );
        prop_assert_eq!(merged.strict_orphans, high.strict_orphans.or(low.strict_orphans));
        prop_assert_eq!(
            merged.busy_timeout_seconds,
            high.busy_timeout_seconds.or(low.busy_timeout_seconds)
        );
    }

    // Merging a config into itself changes nothing
    #[test]
    fn merge_is_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Configs survive a YAML round trip through the file format
    #[test]
    fn yaml_round_trip(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}

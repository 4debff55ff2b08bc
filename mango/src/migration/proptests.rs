//! Property-based tests for the directive parser.

use super::parse;
use proptest::prelude::*;

// Body lines that can never be mistaken for a directive or a blank line.
fn body_line_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,;()_]{0,40}"
}

fn identity_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,4}_[a-z]{1,10}\\.sql"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    // Sources without directives land entirely in the up body
    #[test]
    fn no_directives_means_up_only(lines in prop::collection::vec(body_line_strategy(), 0..20)) {
        let source = lines.join("\n");
        let unit = parse(&source, "001_any.sql").unwrap();

        let expected: String = lines.iter().map(|l| format!("{l}\n")).collect();
        prop_assert_eq!(unit.up_body(), expected.as_str());
        prop_assert!(unit.down_body().is_empty());
        prop_assert!(unit.required_identities().is_empty());
    }

    // `requires` arguments accumulate in declaration order
    #[test]
    fn requires_preserves_order(
        groups in prop::collection::vec(prop::collection::vec(identity_strategy(), 1..4), 1..5)
    ) {
        let source: String = groups
            .iter()
            .map(|group| format!("--mango requires {}\n", group.join(" ")))
            .collect();
        let unit = parse(&source, "999_last.sql").unwrap();

        let expected: Vec<String> = groups.into_iter().flatten().collect();
        prop_assert_eq!(unit.required_identities(), expected.as_slice());
    }

    // Every body line ends up in exactly one body
    #[test]
    fn lines_are_partitioned(
        up in prop::collection::vec(body_line_strategy(), 0..10),
        down in prop::collection::vec(body_line_strategy(), 0..10)
    ) {
        let mut source = String::from("--mango down\n");
        for line in &down {
            source.push_str(line);
            source.push('\n');
        }
        source.push_str("--mango up\n");
        for line in &up {
            source.push_str(line);
            source.push('\n');
        }

        let unit = parse(&source, "001_any.sql").unwrap();
        prop_assert_eq!(unit.up_body().lines().count(), up.len());
        prop_assert_eq!(unit.down_body().lines().count(), down.len());
    }
}

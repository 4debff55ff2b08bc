//! Parser for the `--mango` directive language.
//!
//! A source is read line by line. Whitespace-only lines are dropped, lines
//! starting with the directive prefix are interpreted, and every other line
//! is appended (with a trailing newline) to the body selected by the
//! write-head. The write-head starts on the up body.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

use super::Migration;

/// The marker that introduces a directive line.
pub const DIRECTIVE_PREFIX: &str = "--mango";

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        let pattern = format!(r"^\s*{}(?:\s+|$)", regex::escape(DIRECTIVE_PREFIX));
        Regex::new(&pattern).expect("directive pattern is valid")
    })
}

/// Which body non-directive lines are appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteHead {
    Up,
    Down,
}

/// Parses migration source text into a unit.
///
/// The identity is `source_name`, used verbatim.
///
/// # Errors
///
/// Returns an error if:
/// - `source_name` is empty ([`Error::EmptyIdentity`])
/// - a directive names an unknown command ([`Error::InvalidDirective`])
/// - a `requires` directive has no identities ([`Error::MissingArgument`])
///
/// # Examples
///
/// ```
/// use mango::migration::parse;
///
/// let unit = parse("CREATE TABLE t(id int);\n", "001_init.sql").unwrap();
/// assert_eq!(unit.up_body(), "CREATE TABLE t(id int);\n");
/// assert!(unit.down_body().is_empty());
/// assert!(unit.required_identities().is_empty());
/// ```
pub fn parse(source_text: &str, source_name: &str) -> Result<Migration> {
    let mut migration = Migration::new(source_name)?;
    let mut head = WriteHead::Up;

    for (index, line) in source_text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(found) = directive_regex().find(line) {
            let mut args = line[found.end()..].split_whitespace();
            let command = args.next().unwrap_or_default();
            match command {
                "up" => head = WriteHead::Up,
                "down" => head = WriteHead::Down,
                "requires" => {
                    let mut any = false;
                    for identity in args {
                        migration.push_requirement(identity);
                        any = true;
                    }
                    if !any {
                        return Err(Error::MissingArgument {
                            source_name: source_name.to_string(),
                            line: index + 1,
                            directive: command.to_string(),
                        });
                    }
                }
                other => {
                    return Err(Error::InvalidDirective {
                        source_name: source_name.to_string(),
                        line: index + 1,
                        command: other.to_string(),
                    });
                }
            }
            continue;
        }

        match head {
            WriteHead::Up => migration.push_up_line(line),
            WriteHead::Down => migration.push_down_line(line),
        }
    }

    Ok(migration)
}

/// Reads and parses a migration file; its file name becomes the identity.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] if the file cannot be read, plus any
/// error [`parse`] returns.
pub fn parse_file(path: &Path) -> Result<Migration> {
    let source_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(Error::EmptyIdentity)?;

    let source_text = fs::read_to_string(path).map_err(|source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("parsing migration source {}", path.display());
    parse(&source_text, source_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_directives_goes_to_up_body() {
        let unit = parse("CREATE TABLE t(id int);\nINSERT INTO t VALUES (1);\n", "a.sql").unwrap();
        assert_eq!(unit.up_body(), "CREATE TABLE t(id int);\nINSERT INTO t VALUES (1);\n");
        assert!(unit.down_body().is_empty());
        assert!(unit.required_identities().is_empty());
    }

    #[test]
    fn test_up_and_down_sections() {
        let source = "\
--mango up
CREATE TABLE t(id int);
--mango down
DROP TABLE t;
";
        let unit = parse(source, "001_init.sql").unwrap();
        assert_eq!(unit.identity(), "001_init.sql");
        assert_eq!(unit.up_body(), "CREATE TABLE t(id int);\n");
        assert_eq!(unit.down_body(), "DROP TABLE t;\n");
    }

    #[test]
    fn test_switching_back_to_up_appends() {
        let source = "--mango up\nA;\n--mango down\nB;\n--mango up\nC;\n";
        let unit = parse(source, "x.sql").unwrap();
        assert_eq!(unit.up_body(), "A;\nC;\n");
        assert_eq!(unit.down_body(), "B;\n");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let unit = parse("\n   \nA;\n\t\n\nB;\n", "x.sql").unwrap();
        assert_eq!(unit.up_body(), "A;\nB;\n");
    }

    #[test]
    fn test_requires_preserves_order_across_lines() {
        let source = "--mango requires a b\n--mango requires c\n";
        let unit = parse(source, "x.sql").unwrap();
        assert_eq!(unit.required_identities(), ["a", "b", "c"]);
    }

    #[test]
    fn test_requires_allows_duplicates_in_source() {
        let unit = parse("--mango requires a a\n", "x.sql").unwrap();
        assert_eq!(unit.required_identities(), ["a", "a"]);
    }

    #[test]
    fn test_directive_may_be_indented() {
        let unit = parse("   --mango down\nDROP TABLE t;\n", "x.sql").unwrap();
        assert_eq!(unit.down_body(), "DROP TABLE t;\n");
        assert!(unit.up_body().is_empty());
    }

    #[test]
    fn test_requires_without_argument() {
        let err = parse("--mango up\n--mango requires\n", "x.sql").unwrap_err();
        match err {
            Error::MissingArgument {
                source_name,
                line,
                directive,
            } => {
                assert_eq!(source_name, "x.sql");
                assert_eq!(line, 2);
                assert_eq!(directive, "requires");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("--mango next 3\n", "x.sql").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDirective { ref command, line: 1, .. } if command == "next"
        ));
    }

    #[test]
    fn test_bare_prefix_is_invalid_directive() {
        let err = parse("--mango   \n", "x.sql").unwrap_err();
        assert!(matches!(err, Error::InvalidDirective { ref command, .. } if command.is_empty()));
    }

    #[test]
    fn test_lookalike_comments_are_body() {
        let source = "--mangoes are tasty\n-- mango up\n";
        let unit = parse(source, "x.sql").unwrap();
        assert_eq!(unit.up_body(), "--mangoes are tasty\n-- mango up\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let unit = parse("--mango up\r\nA;\r\n--mango down\r\nB;\r\n", "x.sql").unwrap();
        assert_eq!(unit.up_body(), "A;\n");
        assert_eq!(unit.down_body(), "B;\n");
    }

    #[test]
    fn test_empty_source_name() {
        assert!(matches!(parse("A;\n", ""), Err(Error::EmptyIdentity)));
    }

    #[test]
    fn test_parse_file_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("001_init.sql");
        std::fs::write(&path, "--mango up\nCREATE TABLE t(id int);\n").unwrap();

        let unit = parse_file(&path).unwrap();
        assert_eq!(unit.identity(), "001_init.sql");
        assert_eq!(unit.up_body(), "CREATE TABLE t(id int);\n");
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("404_gone.sql");
        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, Error::SourceRead { .. }));
        assert!(err.to_string().contains("404_gone.sql"));
    }
}

//! Migration units and their on-disk sources.
//!
//! A migration unit is one SQL file carrying an up body, a down body, and a
//! list of other units it requires. Units are written with an embedded
//! directive language:
//!
//! ```sql
//! --mango requires 001_init.sql
//! --mango up
//! ALTER TABLE t ADD COLUMN x int;
//! --mango down
//! ALTER TABLE t DROP COLUMN x;
//! ```
//!
//! # Examples
//!
//! ```
//! use mango::migration::parse;
//!
//! let source = "--mango requires 001_init.sql\n--mango up\nALTER TABLE t ADD COLUMN x int;\n";
//! let unit = parse(source, "002_add.sql").unwrap();
//! assert_eq!(unit.identity(), "002_add.sql");
//! assert_eq!(unit.required_identities(), ["001_init.sql"]);
//! assert_eq!(unit.up_body(), "ALTER TABLE t ADD COLUMN x int;\n");
//! ```

mod loader;
mod parser;
mod unit;

#[cfg(test)]
mod proptests;

use std::fmt;

pub use loader::{LoadReport, MigrationLoader, SourceFailure, DEFAULT_FILE_PATTERN};
pub use parser::{parse, parse_file, DIRECTIVE_PREFIX};
pub use unit::{Migration, MigrationBuilder};

/// The direction a migration body runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply the unit (its up body).
    Up,
    /// Revert the unit (its down body).
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::GeneratorError;

const DB_PREFIX: &str = "--db=";
const OUTPUT_PREFIX: &str = "--output=";

/// SQLite database schema to TypeScript type declarations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SQLite database to read the schema from, e.g. --db=/path/to/database.db
    #[arg(long, action = ArgAction::Append)]
    pub db: Vec<PathBuf>,

    /// Declaration file to write, e.g. --output=/path/to/output.d.ts
    #[arg(long, action = ArgAction::Append)]
    pub output: Vec<PathBuf>,
}

/// The two paths a run needs, both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub db: PathBuf,
    pub output: PathBuf,
}

fn is_recognized(arg: &OsString) -> bool {
    let Some(arg) = arg.to_str() else {
        return false;
    };

    let has_value = |prefix: &str| arg.strip_prefix(prefix).is_some_and(|v| !v.is_empty());
    has_value(DB_PREFIX)
        || has_value(OUTPUT_PREFIX)
        || matches!(arg, "-h" | "--help" | "-V" | "--version")
}

/// Keeps the program name, every `--db=VALUE` / `--output=VALUE` and the help
/// and version switches. Anything else on the command line is ignored.
pub fn recognized_args<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = argv.next().into_iter().collect();
    kept.extend(argv.filter(is_recognized));
    kept
}

impl Args {
    /// Parses the process arguments, skipping anything that is not ours.
    pub fn from_env() -> Self {
        Args::parse_from(recognized_args(std::env::args_os()))
    }

    /// The first occurrence of each flag wins.
    pub fn resolve(self) -> Result<Paths, GeneratorError> {
        let db = self
            .db
            .into_iter()
            .next()
            .ok_or(GeneratorError::MissingArgument {
                what: "a database path",
                example: "--db=/path/to/database.db",
            })?;
        let output = self
            .output
            .into_iter()
            .next()
            .ok_or(GeneratorError::MissingArgument {
                what: "an output path",
                example: "--output=/path/to/output.d.ts",
            })?;

        Ok(Paths { db, output })
    }
}

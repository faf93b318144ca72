use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("you did not specify {what}. E.g. {example}")]
    MissingArgument {
        what: &'static str,
        example: &'static str,
    },

    #[error("unknown type '{declared}' for column '{column}' in table '{table}'")]
    UnknownColumnType {
        table: String,
        column: String,
        declared: String,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("formatting generated source: {0}")]
    Format(#[from] FormatError),

    #[error("writing '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

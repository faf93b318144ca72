//! Generates TypeScript type declarations from a SQLite database schema.
//!
//! The pipeline is linear: make sure the demo tables exist, read the catalog,
//! turn every table into an object type, format the result and write it out.
//! Nothing is written unless every step succeeded.

pub mod cli;
pub mod error;
pub mod format;
pub mod schema;
pub mod typegen;

use rusqlite::Connection;
use tracing::info;

pub use cli::{Args, Paths};
pub use error::GeneratorError;

/// Bootstraps the demo schema on `conn` and returns the formatted declarations.
pub fn generate_source(conn: &Connection) -> Result<String, GeneratorError> {
    schema::ensure_demo_schema(conn)?;
    let tables = schema::introspect(conn)?;
    let declarations = typegen::synthesize(&tables);
    let source = typegen::render_source(&declarations);
    Ok(format::format(&source)?)
}

/// Runs the whole pipeline and writes the declarations to `paths.output`.
pub fn generate(paths: &Paths) -> Result<(), GeneratorError> {
    info!(db = %paths.db.display(), "opening database");
    let conn = Connection::open(&paths.db)?;
    let output = generate_source(&conn)?;

    std::fs::write(&paths.output, &output).map_err(|source| GeneratorError::FileWrite {
        path: paths.output.clone(),
        source,
    })?;
    info!(output = %paths.output.display(), bytes = output.len(), "wrote declarations");

    Ok(())
}

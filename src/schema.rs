use rusqlite::Connection;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::error::GeneratorError;

/// Demo tables every run makes sure exist before reading the catalog.
const DEMO_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS people (
    id integer PRIMARY KEY AUTOINCREMENT,
    first_name text NOT NULL,
    last_name text NOT NULL,
    is_child integer
);
CREATE TABLE IF NOT EXISTS items (
    id integer PRIMARY KEY AUTOINCREMENT,
    name text NOT NULL,
    owner integer,
    FOREIGN KEY(owner) REFERENCES people(id)
);
";

const SELECT_TABLES: &str = "
SELECT name
FROM sqlite_master
WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
";

const SELECT_COLUMNS: &str = "
SELECT name, type, \"notnull\", pk
FROM pragma_table_info(?1)
ORDER BY cid
";

const SELECT_FOREIGN_KEYS: &str = "
SELECT \"table\", \"from\", \"to\"
FROM pragma_foreign_key_list(?1)
ORDER BY id, seq
";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Float,
    Blob,
}

impl SqlType {
    /// Resolves a declared column type. Only the exact lowercase names are
    /// accepted.
    pub fn from_declared(declared: &str) -> Option<SqlType> {
        match declared {
            "text" => Some(SqlType::Text),
            "integer" => Some(SqlType::Integer),
            "float" => Some(SqlType::Float),
            "blob" => Some(SqlType::Blob),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub from: String,
    pub table: String,
    /// `None` when the constraint points at the parent's primary key implicitly.
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub primary_key: bool,
    pub foreign_key: Option<ForeignKey>,
}

pub type ColumnList = SmallVec<[Column; 16]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: ColumnList,
}

/// Creates the demo tables if they are missing. Running it again is a no-op.
pub fn ensure_demo_schema(conn: &Connection) -> Result<(), GeneratorError> {
    conn.execute_batch(DEMO_SCHEMA)?;
    Ok(())
}

/// Reads every user table with its columns and foreign keys, in catalog order.
pub fn introspect(conn: &Connection) -> Result<Vec<Table>, GeneratorError> {
    let names = table_names(conn)?;
    info!(count = names.len(), "discovered tables");

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let columns = read_columns(conn, &name)?;
        debug!(table = %name, columns = columns.len(), "read table");
        tables.push(Table { name, columns });
    }

    check_references(&tables);
    Ok(tables)
}

fn table_names(conn: &Connection) -> Result<Vec<String>, GeneratorError> {
    let mut stmt = conn.prepare(SELECT_TABLES)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn read_foreign_keys(
    conn: &Connection,
    table: &str,
) -> Result<FxHashMap<String, ForeignKey>, GeneratorError> {
    let mut stmt = conn.prepare(SELECT_FOREIGN_KEYS)?;
    let rows = stmt.query_map([table], |row| {
        Ok(ForeignKey {
            table: row.get(0)?,
            from: row.get(1)?,
            to: row.get(2)?,
        })
    })?;

    let mut by_column = FxHashMap::default();
    for fk in rows {
        let fk = fk?;
        // first constraint on a column wins
        by_column.entry(fk.from.clone()).or_insert(fk);
    }

    Ok(by_column)
}

fn read_columns(conn: &Connection, table: &str) -> Result<ColumnList, GeneratorError> {
    let mut foreign_keys = read_foreign_keys(conn, table)?;

    let mut stmt = conn.prepare(SELECT_COLUMNS)?;
    let rows = stmt.query_map([table], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            row.get::<_, bool>(2)?,
            row.get::<_, i64>(3)? > 0,
        ))
    })?;

    let mut columns = ColumnList::new();
    for row in rows {
        let (name, declared, not_null, primary_key) = row?;
        let sql_type =
            SqlType::from_declared(&declared).ok_or_else(|| GeneratorError::UnknownColumnType {
                table: table.to_string(),
                column: name.clone(),
                declared: declared.clone(),
            })?;
        let foreign_key = foreign_keys.remove(&name);

        debug!(
            table,
            column = %name,
            ?sql_type,
            not_null,
            primary_key,
            references = foreign_key.as_ref().map(|fk| fk.table.as_str()),
            "read column"
        );

        columns.push(Column {
            name,
            sql_type,
            not_null,
            primary_key,
            foreign_key,
        });
    }

    Ok(columns)
}

fn check_references(tables: &[Table]) {
    for table in tables {
        for column in &table.columns {
            let Some(fk) = &column.foreign_key else {
                continue;
            };

            if !tables.iter().any(|t| t.name == fk.table) {
                warn!(
                    table = %table.name,
                    column = %column.name,
                    references = %fk.table,
                    "foreign key references a table that does not exist"
                );
            }
        }
    }
}

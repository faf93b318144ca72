use std::fs;
use std::path::Path;

use rusqlite::Connection;
use sqlite_typegen::{generate, GeneratorError, Paths};
use tempfile::tempdir;

const DEMO_OUTPUT: &str = "\
type people = {
  id?: BigInt;
  first_name: string;
  last_name: string;
  is_child?: BigInt;
};

type items = { id?: BigInt; name: string; owner?: people };

type Tables = { people: people; items: items };
";

fn paths(dir: &Path) -> Paths {
    Paths {
        db: dir.join("app.db"),
        output: dir.join("types.d.ts"),
    }
}

fn prepare(db: &Path, sql: &str) {
    let conn = Connection::open(db).unwrap();
    conn.execute_batch(sql).unwrap();
}

#[test]
fn fresh_database_gets_demo_types() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    generate(&paths).unwrap();

    assert!(paths.db.exists());
    assert_eq!(fs::read_to_string(&paths.output).unwrap(), DEMO_OUTPUT);
}

#[test]
fn runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    generate(&paths).unwrap();
    let first = fs::read(&paths.output).unwrap();
    generate(&paths).unwrap();
    let second = fs::read(&paths.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn existing_output_is_overwritten() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    fs::write(&paths.output, "stale").unwrap();

    generate(&paths).unwrap();

    assert_eq!(fs::read_to_string(&paths.output).unwrap(), DEMO_OUTPUT);
}

#[test]
fn user_tables_keep_discovery_order() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    prepare(
        &paths.db,
        "CREATE TABLE notes (
            id integer PRIMARY KEY,
            body text NOT NULL,
            score float,
            attachment blob,
            author integer NOT NULL REFERENCES people(id)
        );",
    );

    generate(&paths).unwrap();

    let out = fs::read_to_string(&paths.output).unwrap();
    assert_eq!(
        out,
        "\
type notes = {
  id?: BigInt;
  body: string;
  score?: number;
  attachment?: Blob;
  author: people;
};

type people = {
  id?: BigInt;
  first_name: string;
  last_name: string;
  is_child?: BigInt;
};

type items = { id?: BigInt; name: string; owner?: people };

type Tables = { notes: notes; people: people; items: items };
"
    );
}

#[test]
fn unknown_column_type_writes_nothing() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    prepare(&paths.db, "CREATE TABLE settings (key text NOT NULL, value json);");

    let err = generate(&paths).unwrap_err();

    assert!(matches!(err, GeneratorError::UnknownColumnType { ref declared, .. } if declared == "json"));
    assert!(!paths.output.exists());
}

#[test]
fn uppercase_column_type_is_unknown() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    prepare(&paths.db, "CREATE TABLE counters (hits INTEGER NOT NULL, label Text);");

    let err = generate(&paths).unwrap_err();

    match err {
        GeneratorError::UnknownColumnType {
            table,
            column,
            declared,
        } => {
            assert_eq!(table, "counters");
            assert_eq!(column, "hits");
            assert_eq!(declared, "INTEGER");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!paths.output.exists());
}

#[test]
fn unformattable_name_writes_nothing() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    prepare(&paths.db, "CREATE TABLE \"my table\" (id integer);");

    let err = generate(&paths).unwrap_err();

    assert!(matches!(err, GeneratorError::Format(_)));
    assert!(!paths.output.exists());
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempdir().unwrap();
    let paths = Paths {
        db: dir.path().join("app.db"),
        output: dir.path().join("missing").join("types.d.ts"),
    };

    let err = generate(&paths).unwrap_err();

    match err {
        GeneratorError::FileWrite { path, .. } => assert_eq!(path, paths.output),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_database_is_a_database_error() {
    let dir = tempdir().unwrap();
    let paths = Paths {
        // a directory cannot be opened as a database file
        db: dir.path().to_path_buf(),
        output: dir.path().join("types.d.ts"),
    };

    let err = generate(&paths).unwrap_err();

    assert!(matches!(err, GeneratorError::Database(_)));
    assert!(!paths.output.exists());
}

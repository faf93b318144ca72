use crate::schema::{Column, SqlType, Table};

/// Name of the declaration mapping every table name to its type.
pub const TABLES_TYPE: &str = "Tables";

impl SqlType {
    pub fn ts_type(self) -> &'static str {
        match self {
            SqlType::Text => "string",
            SqlType::Integer => "BigInt",
            SqlType::Float => "number",
            SqlType::Blob => "Blob",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub fields: Vec<Field>,
}

/// A column pointing at another table is typed as that table, so the relation
/// reads as an embedded object rather than the raw key.
pub fn field_type(column: &Column) -> &str {
    match &column.foreign_key {
        Some(fk) => fk.table.as_str(),
        None => column.sql_type.ts_type(),
    }
}

pub fn column_field(column: &Column) -> Field {
    Field {
        name: column.name.clone(),
        ty: field_type(column).to_string(),
        optional: !column.not_null,
    }
}

pub fn table_declaration(table: &Table) -> TypeDeclaration {
    TypeDeclaration {
        name: table.name.clone(),
        fields: table.columns.iter().map(column_field).collect(),
    }
}

pub fn tables_declaration(tables: &[Table]) -> TypeDeclaration {
    TypeDeclaration {
        name: TABLES_TYPE.to_string(),
        fields: tables
            .iter()
            .map(|table| Field {
                name: table.name.clone(),
                ty: table.name.clone(),
                optional: false,
            })
            .collect(),
    }
}

/// One declaration per table in discovery order, then the `Tables` aggregate.
pub fn synthesize(tables: &[Table]) -> Vec<TypeDeclaration> {
    let mut declarations: Vec<_> = tables.iter().map(table_declaration).collect();
    declarations.push(tables_declaration(tables));
    declarations
}

fn optional(optional: bool) -> &'static str {
    if optional {
        return "?";
    }

    ""
}

/// Unformatted source text; the formatter takes care of layout.
pub fn render_source(declarations: &[TypeDeclaration]) -> String {
    declarations
        .iter()
        .map(|decl| {
            let props: Vec<String> = decl
                .fields
                .iter()
                .map(|f| format!("{}{}: {}", f.name, optional(f.optional), f.ty))
                .collect();
            format!("type {} = {{ {} }};", decl.name, props.join(","))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnList, ForeignKey};

    fn col(name: &str, sql_type: SqlType, not_null: bool) -> Column {
        Column {
            name: name.to_string(),
            sql_type,
            not_null,
            primary_key: false,
            foreign_key: None,
        }
    }

    fn table(name: &str, columns: Vec<Column>) -> Table {
        Table {
            name: name.to_string(),
            columns: ColumnList::from_vec(columns),
        }
    }

    #[test]
    fn maps_every_sql_type() {
        assert_eq!(SqlType::Text.ts_type(), "string");
        assert_eq!(SqlType::Integer.ts_type(), "BigInt");
        assert_eq!(SqlType::Float.ts_type(), "number");
        assert_eq!(SqlType::Blob.ts_type(), "Blob");
    }

    #[test]
    fn nullability_decides_optional() {
        let required = column_field(&col("name", SqlType::Text, true));
        let nullable = column_field(&col("nick", SqlType::Text, false));
        assert!(!required.optional);
        assert!(nullable.optional);
    }

    #[test]
    fn foreign_key_overrides_sql_type() {
        for sql_type in [SqlType::Integer, SqlType::Text, SqlType::Blob] {
            let mut owner = col("owner", sql_type, false);
            owner.foreign_key = Some(ForeignKey {
                from: "owner".to_string(),
                table: "people".to_string(),
                to: Some("id".to_string()),
            });
            assert_eq!(field_type(&owner), "people");
        }
    }

    #[test]
    fn aggregate_lists_tables_in_order() {
        let tables = [
            table("zebras", vec![col("id", SqlType::Integer, true)]),
            table("apples", vec![col("id", SqlType::Integer, true)]),
        ];
        let decls = synthesize(&tables);
        assert_eq!(decls.len(), 3);
        let aggregate = decls.last().unwrap();
        assert_eq!(aggregate.name, "Tables");
        let entries: Vec<_> = aggregate
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.as_str(), f.optional))
            .collect();
        assert_eq!(
            entries,
            [("zebras", "zebras", false), ("apples", "apples", false)]
        );
    }

    #[test]
    fn empty_schema_still_has_aggregate() {
        let decls = synthesize(&[]);
        assert_eq!(decls.len(), 1);
        assert!(decls[0].fields.is_empty());
        assert_eq!(render_source(&decls), "type Tables = {  };");
    }

    #[test]
    fn renders_raw_source() {
        let tables = [table(
            "notes",
            vec![
                col("id", SqlType::Integer, false),
                col("body", SqlType::Text, true),
                col("score", SqlType::Float, false),
            ],
        )];
        assert_eq!(
            render_source(&synthesize(&tables)),
            "type notes = { id?: BigInt,body: string,score?: number };\n\n\
             type Tables = { notes: notes };"
        );
    }
}

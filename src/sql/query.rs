use tracing::debug;

use super::statement::{SqlValue, Statement};
use super::tables::{ACTOR_ID, ACTOR_NAME, ACTORS};
use crate::error::SchemaError;
use crate::models::TableSchema;

/// How an insert treats a row that violates a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Plain insert. A violation fails the statement.
    AllowDuplicates,
    /// Insert-or-ignore. A violation silently drops the row.
    IgnoreDuplicates,
}

/// `CREATE table <name>(<col> <type> <attrs...>, ...)` in declaration order.
pub fn create_table(schema: &TableSchema) -> Statement {
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|col| {
            let mut column = format!("{} {}", col.name, col.column_type);
            if !col.attributes.is_empty() {
                column.push(' ');
                column.push_str(&col.attributes.join(" "));
            }
            column
        })
        .collect();

    let statement = Statement::raw(format!("CREATE table {}({})", schema.name, columns.join(", ")));
    debug!("Generated table creation SQL query: '{}'", statement);
    statement
}

/// One composite unique index over every column flagged `unique`, if any.
pub fn unique_index(schema: &TableSchema) -> Option<Statement> {
    let unique_columns: Vec<&str> =
        schema.columns.iter().filter(|c| c.unique).map(|c| c.name.as_str()).collect();
    if unique_columns.is_empty() {
        return None;
    }

    let statement = Statement::raw(format!(
        "CREATE UNIQUE INDEX {name}_index ON {name} ({})",
        unique_columns.join(", "),
        name = schema.name
    ));
    debug!("Generated index creation SQL query: '{}'", statement);
    Some(statement)
}

/// Insert `values` into the table described by `schema`.
///
/// Columns appear in the order of `values`. Keys are sanitized before they are
/// checked against the schema.
///
/// # Errors
///
/// Returns [`SchemaError`] if a key is not a declared column.
pub fn insert(
    schema: &TableSchema,
    values: &[(&str, SqlValue)],
    mode: InsertMode,
) -> Result<Statement, SchemaError> {
    let mut columns = Vec::with_capacity(values.len());
    for (key, _) in values {
        let column = sanitize(key);
        if !schema.has_column(&column) {
            return Err(SchemaError { table: schema.name.clone(), column });
        }
        columns.push(column);
    }

    let verb = match mode {
        InsertMode::AllowDuplicates => "INSERT",
        InsertMode::IgnoreDuplicates => "INSERT or IGNORE",
    };
    let prefix = format!("{} into {} ({})", verb, schema.name, columns.join(", "));

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let literals: Vec<String> = values.iter().map(|(_, value)| quote(value)).collect();
    let params: Vec<SqlValue> = values.iter().map(|(_, value)| value.clone()).collect();

    let statement = Statement::with_params(
        format!("{} VALUES ({})", prefix, placeholders.join(", ")),
        params,
        format!("{} VALUES ({})", prefix, literals.join(", ")),
    );
    debug!("Generated table insertion SQL query: '{}'", statement);
    Ok(statement)
}

/// Look up the identifier of the actor called `actor_name`.
pub fn lookup_actor_id(actor_name: &str) -> Statement {
    let select = format!("SELECT {} FROM {} WHERE {}=", ACTOR_ID, ACTORS, ACTOR_NAME);
    let statement = Statement::with_params(
        format!("{}?1", select),
        vec![SqlValue::from(actor_name)],
        format!("{}'{}'", select, sanitize(actor_name)),
    );
    debug!("Generated actor ID lookup SQL query: '{}'", statement);
    statement
}

/// Strip single quotes. Only used for rendered statements; executed statements bind values.
pub fn sanitize(text: &str) -> String {
    text.replace('\'', "")
}

fn quote(value: &SqlValue) -> String {
    format!("'{}'", sanitize(&value.to_string()))
}

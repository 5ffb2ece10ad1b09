/// Statement Building Module
///
/// Composes parameterized insert/select/update/delete statements from a
/// reflected table schema, row data, and conditions. Filter values are
/// bound as `?` placeholders with a parallel parameter vector, never
/// interpolated into the SQL text.
use crate::core::{ReflectqlError, Result};
use crate::db::condition::Filters;
use crate::db::quote_ident;
use crate::db::schema::TableSchema;
use crate::value::{RowData, Value};
use tracing::debug;

/// A built statement ready for execution: SQL text plus bound parameters
/// in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Builds an insert statement from row data.
///
/// Keys absent from the table schema are silently dropped — inserts are
/// permissive against superset mappings, so callers may pass extra fields
/// safely. A row that is empty after filtering builds an all-default row.
pub fn build_insert(schema: &TableSchema, row: &RowData) -> Statement {
    let mut columns = Vec::new();
    let mut params = Vec::new();

    for (name, value) in row.iter() {
        if schema.contains(name) {
            columns.push(quote_ident(name));
            params.push(value.clone());
        } else {
            debug!(
                table = %schema.name,
                column = name,
                "dropping insert column absent from table schema"
            );
        }
    }

    if columns.is_empty() {
        return Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&schema.name)),
            params,
        };
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&schema.name),
            columns.join(", "),
            placeholders
        ),
        params,
    }
}

/// Builds a select over the requested columns, restricted by the
/// AND-conjunction of `filters`.
///
/// # Errors
///
/// Returns `ReflectqlError::Query` when no columns are requested and
/// `ReflectqlError::Schema` when a requested or filtered column does not
/// exist.
pub fn build_select(schema: &TableSchema, columns: &[&str], filters: &Filters) -> Result<Statement> {
    if columns.is_empty() {
        return Err(ReflectqlError::Query(
            "select requires at least one column".to_string(),
        ));
    }
    for column in columns {
        if !schema.contains(column) {
            return Err(ReflectqlError::Schema(format!(
                "no such column '{}' in table '{}'",
                column, schema.name
            )));
        }
    }

    let predicate = filters.render(schema)?;
    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {} FROM {}", column_list, quote_ident(&schema.name));
    if let Some(clause) = &predicate.clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }

    Ok(Statement {
        sql,
        params: predicate.params,
    })
}

/// Builds an unconditioned select returning every row and every column in
/// schema order. Row order is store-native and not deterministic.
pub fn build_select_all(schema: &TableSchema) -> Statement {
    let column_list = schema
        .column_names()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ");
    Statement {
        sql: format!("SELECT {} FROM {}", column_list, quote_ident(&schema.name)),
        params: Vec::new(),
    }
}

/// Builds an update restricted by the AND-conjunction of `filters`.
///
/// Empty filters update every row in the table — documented behavior,
/// not guarded against. Unlike insert, unknown data columns are an error:
/// the update path validates rather than drops.
///
/// # Errors
///
/// Returns `ReflectqlError::Schema` for unknown data or filter columns
/// and `ReflectqlError::Query` when there is nothing to set.
pub fn build_update(schema: &TableSchema, row: &RowData, filters: &Filters) -> Result<Statement> {
    for (name, _) in row.iter() {
        if !schema.contains(name) {
            return Err(ReflectqlError::Schema(format!(
                "no such column '{}' in table '{}'",
                name, schema.name
            )));
        }
    }
    if row.is_empty() {
        return Err(ReflectqlError::Query(
            "update requires at least one column to set".to_string(),
        ));
    }

    let assignments = row
        .iter()
        .map(|(name, _)| format!("{} = ?", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut params: Vec<Value> = row.iter().map(|(_, value)| value.clone()).collect();

    let predicate = filters.render(schema)?;
    let mut sql = format!(
        "UPDATE {} SET {}",
        quote_ident(&schema.name),
        assignments
    );
    if let Some(clause) = &predicate.clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
    params.extend(predicate.params);

    Ok(Statement { sql, params })
}

/// Builds a delete restricted by the AND-conjunction of `filters`.
///
/// Empty filters delete every row in the table, mirroring update.
pub fn build_delete(schema: &TableSchema, filters: &Filters) -> Result<Statement> {
    let predicate = filters.render(schema)?;
    let mut sql = format!("DELETE FROM {}", quote_ident(&schema.name));
    if let Some(clause) = &predicate.clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }

    Ok(Statement {
        sql,
        params: predicate.params,
    })
}

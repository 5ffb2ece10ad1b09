/// Schema Reflection Module
///
/// This module discovers table column sets from the live store instead of
/// a compiled schema definition. A table must reflect successfully before
/// any statement referencing it is built; reflection failure is terminal
/// for that call. Reflected schemas are cached per table name for the
/// lifetime of the connection — the store's schema is treated as
/// immutable while the engine is open.
use crate::core::{ReflectqlError, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// A reflected column with its driver-reported metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared type name (e.g., "INTEGER", "TEXT", "REAL", "BLOB")
    pub type_name: String,
    /// Whether the column rejects NULL values
    pub notnull: bool,
    /// Whether this column is part of the primary key
    pub pk: bool,
    /// Default value expression (if any)
    pub dflt_value: Option<String>,
}

impl ColumnDef {
    /// Creates a ColumnDef from a PRAGMA table_info result row
    fn from_pragma_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(ColumnDef {
            name: row.get(1)?,
            type_name: row.get(2)?,
            notnull: row.get(3)?,
            pk: row.get(5)?,
            dflt_value: row.get(4)?,
        })
    }
}

/// The ordered column set reflected for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Columns in store-declared order
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Reflects a table by introspecting the live store.
    fn from_database(conn: &Connection, table_name: &str) -> Result<Self> {
        let escaped = table_name.replace('\'', "''");
        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", escaped))?;
        let columns = stmt
            .query_map([], |row| ColumnDef::from_pragma_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(ReflectqlError::Schema(format!(
                "no such table: {}",
                table_name
            )));
        }

        Ok(TableSchema {
            name: table_name.to_string(),
            columns,
        })
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    pub fn column(&self, column: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Reflects and caches table schemas for the lifetime of the connection.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    cache: Mutex<HashMap<String, TableSchema>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        SchemaCatalog::default()
    }

    /// Returns the schema for `table_name`, reflecting it from the store
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `ReflectqlError::Schema` when the table does not exist.
    /// Never retried.
    pub fn table(&self, conn: &Connection, table_name: &str) -> Result<TableSchema> {
        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(schema) = cache.get(table_name) {
                return Ok(schema.clone());
            }
        }

        let schema = TableSchema::from_database(conn, table_name)?;
        debug!(
            table = table_name,
            columns = schema.columns.len(),
            "reflected table schema"
        );
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table_name.to_string(), schema.clone());
        Ok(schema)
    }

    /// Drops every cached schema. Called on engine close.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_schema(conn: &Connection) {
        conn.execute_batch(
            "
            CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                age INTEGER DEFAULT 18
            );
        ",
        )
        .unwrap();
    }

    #[test]
    fn test_table_reflection() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn);

        let catalog = SchemaCatalog::new();
        let schema = catalog.table(&conn, "users").unwrap();

        assert_eq!(schema.name, "users");
        assert_eq!(schema.columns.len(), 4);

        let id_col = &schema.columns[0];
        assert_eq!(id_col.name, "id");
        assert_eq!(id_col.type_name, "INTEGER");
        assert!(id_col.pk);

        let name_col = &schema.columns[1];
        assert_eq!(name_col.name, "name");
        assert!(name_col.notnull);
        assert!(!name_col.pk);

        let age_col = schema.column("age").unwrap();
        assert_eq!(age_col.dflt_value.as_deref(), Some("18"));
    }

    #[test]
    fn test_unknown_table_is_schema_error() {
        let conn = Connection::open_in_memory().unwrap();
        let catalog = SchemaCatalog::new();

        match catalog.table(&conn, "missing") {
            Err(ReflectqlError::Schema(msg)) => assert!(msg.contains("missing")),
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_reflection_is_cached() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn);

        let catalog = SchemaCatalog::new();
        let first = catalog.table(&conn, "users").unwrap();

        // Dropping the table does not invalidate the cache; schema is
        // immutable for the connection lifetime.
        conn.execute_batch("DROP TABLE users").unwrap();
        let second = catalog.table(&conn, "users").unwrap();
        assert_eq!(first, second);

        catalog.clear();
        assert!(catalog.table(&conn, "users").is_err());
    }

    #[test]
    fn test_contains_and_column_names() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_schema(&conn);

        let catalog = SchemaCatalog::new();
        let schema = catalog.table(&conn, "users").unwrap();

        assert!(schema.contains("email"));
        assert!(!schema.contains("missing"));
        let names: Vec<&str> = schema.column_names().collect();
        assert_eq!(names, vec!["id", "name", "email", "age"]);
    }
}

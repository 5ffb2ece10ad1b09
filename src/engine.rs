/// Engine Module
///
/// The public CRUD surface. An `Engine` owns one live connection and a
/// schema catalog; every operation reflects the table, builds a
/// parameterized statement, and executes it under a single lock
/// acquisition. Operations are synchronous and run to completion on the
/// caller's thread.
use crate::config::Config;
use crate::core::Result;
use crate::db::builder;
use crate::db::condition::Filters;
use crate::db::connection::{ConnectionManager, EngineOptions};
use crate::db::executor::{self, WriteMode, WriteReport};
use crate::db::schema::{SchemaCatalog, TableSchema};
use crate::value::{QueryResult, Row, RowData};

/// A reflection-driven data access engine over a single connection.
#[derive(Debug)]
pub struct Engine {
    manager: ConnectionManager,
    catalog: SchemaCatalog,
}

impl Engine {
    /// Opens an engine with default options.
    pub fn open(target: &str) -> Result<Self> {
        Engine::open_with(target, EngineOptions::default())
    }

    /// Opens an engine with explicit connection options.
    pub fn open_with(target: &str, options: EngineOptions) -> Result<Self> {
        Ok(Engine {
            manager: ConnectionManager::open(target, options)?,
            catalog: SchemaCatalog::new(),
        })
    }

    /// Opens an engine from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Engine::open_with(&config.database.target, config.engine_options())
    }

    /// Inserts a row and returns the generated row id.
    ///
    /// Keys absent from the table schema are silently dropped; a row that
    /// is empty after filtering inserts an all-default row.
    pub fn insert(&self, table: &str, row: &RowData) -> Result<i64> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_insert(&schema, row);
            executor::execute_write(conn, &stmt, WriteMode::Autocommit)?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Selects the requested columns from the first row matching the
    /// filters, or `None` when no row matches.
    pub fn select_one(
        &self,
        table: &str,
        columns: &[&str],
        filters: &Filters,
    ) -> Result<Option<Row>> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_select(&schema, columns, filters)?;
            executor::fetch_one(conn, &stmt)
        })
    }

    /// Selects the requested columns from every row matching the filters.
    pub fn select_many(
        &self,
        table: &str,
        columns: &[&str],
        filters: &Filters,
    ) -> Result<Vec<Row>> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_select(&schema, columns, filters)?;
            executor::fetch_all(conn, &stmt)
        })
    }

    /// Returns every row and every column of a table, in store-native
    /// order. Order is not deterministic absent an ordering clause.
    pub fn select_all(&self, table: &str) -> Result<Vec<Row>> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_select_all(&schema);
            executor::fetch_all(conn, &stmt)
        })
    }

    /// Updates rows matching the filters. Empty filters update every row
    /// in the table.
    ///
    /// In `WriteMode::Atomic` the statement runs inside an exclusive
    /// transaction; failures roll back and are logged rather than
    /// raised, and the returned report carries `committed: false`.
    pub fn update(
        &self,
        table: &str,
        row: &RowData,
        filters: &Filters,
        mode: WriteMode,
    ) -> Result<WriteReport> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_update(&schema, row, filters)?;
            executor::execute_write(conn, &stmt, mode)
        })
    }

    /// Deletes rows matching the filters and returns the number removed.
    /// Empty filters delete every row in the table.
    pub fn delete(&self, table: &str, filters: &Filters) -> Result<usize> {
        self.manager.with_conn(|conn| {
            let schema = self.catalog.table(conn, table)?;
            let stmt = builder::build_delete(&schema, filters)?;
            let report = executor::execute_write(conn, &stmt, WriteMode::Autocommit)?;
            Ok(report.rows_affected)
        })
    }

    /// Executes arbitrary SQL text verbatim. See
    /// [`ConnectionManager::raw_query`] for the result contract.
    pub fn raw_query(&self, sql: &str) -> Result<Option<QueryResult>> {
        self.manager.raw_query(sql)
    }

    /// Returns the reflected schema for a table.
    pub fn schema(&self, table: &str) -> Result<TableSchema> {
        self.manager
            .with_conn(|conn| self.catalog.table(conn, table))
    }

    /// Closes the engine, dropping the schema cache and releasing the
    /// connection. Idempotent.
    pub fn close(&self) -> Result<()> {
        self.catalog.clear();
        self.manager.close()
    }

    pub fn is_open(&self) -> bool {
        self.manager.is_open()
    }
}

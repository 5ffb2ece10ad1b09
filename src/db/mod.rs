/// Database Module
///
/// This module provides the reflection-driven data access layer,
/// organized into focused submodules for separation of concerns.
///
/// ## Architecture
///
/// The layer is split into five concerns:
/// - **Connection Management** (`connection.rs`): the single live
///   connection, dialect tuning, raw-SQL passthrough, close/teardown
/// - **Schema Reflection** (`schema.rs`): cached discovery of table
///   column sets from the live store
/// - **Conditions** (`condition.rs`): equality-conjunction predicates
/// - **Statement Building** (`builder.rs`): parameterized CRUD statements
/// - **Execution** (`executor.rs`): fetch paths and the dual-mode
///   (autocommit/atomic) write path
///
/// ## Error Handling
///
/// All operations use the standardized `ReflectqlError` type for
/// consistent error propagation.
pub mod builder;
pub mod condition;
pub mod connection;
pub mod executor;
pub mod schema;

/// Double-quotes an identifier for safe embedding in generated SQL.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reflectql Error Module
///
/// This module defines the error types for the reflectql engine.
/// It provides structured error handling with proper error propagation
/// across the connection, schema, and execution layers.
use thiserror::Error;

/// Unified error type for the reflectql engine.
///
/// The first four variants form the engine's error taxonomy:
/// - `Connection`: the target is malformed, unreachable, names a dialect
///   without a linked driver, or the engine has been closed.
/// - `Schema`: a referenced table or column does not exist. Never retried.
/// - `Integrity`: a constraint violation on insert/update. Raised on the
///   autocommit path; on the atomic path it is rolled back and logged
///   instead of raised.
/// - `Transaction`: a failure of the transaction boundary itself.
///
/// The remaining variants cover malformed operation requests, store-native
/// driver errors, and the configuration layer.
#[derive(Error, Debug)]
pub enum ReflectqlError {
    /// Connection could not be established or has been closed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Referenced table or column does not exist
    #[error("Schema error: {0}")]
    Schema(String),

    /// Constraint violation on a write
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Transaction lifecycle failures (begin/commit/rollback)
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Malformed operation requests (empty SQL text, empty update set, ...)
    #[error("Query error: {0}")]
    Query(String),

    /// Store-native errors from the underlying driver
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use ReflectqlError as the error type.
pub type Result<T> = std::result::Result<T, ReflectqlError>;

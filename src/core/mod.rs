pub mod error;

pub use error::{ReflectqlError, Result};

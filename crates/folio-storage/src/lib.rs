//! Folio Storage Layer
//!
//! Key/value string stores that hold in-progress session records.
//! A store is scoped to one browser tab (or one desktop process); it is
//! never shared across tabs, and it offers no transactions.

mod backend;
mod database;
mod error;
mod memory;
mod migrations;

pub use backend::SessionStorage;
pub use database::SqliteStorage;
pub use error::StorageError;
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

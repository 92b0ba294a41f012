//! Folio Core
//!
//! Application-level state for the PDF toolkit front-end: configuration,
//! the tool catalogue, and the workspace that keeps the in-progress draft
//! in sync with session storage.

mod config;
mod error;
mod tool;
mod workspace;

pub use config::{Config, StorageConfig};
pub use error::CoreError;
pub use tool::Tool;
pub use workspace::Workspace;

// Re-export session and storage components
pub use folio_session::{
    Clock, FileDescriptor, ManualClock, SessionConfig, SessionManager, SessionOptions,
    SessionRecord, SessionState, SystemClock,
};
pub use folio_storage::{MemoryStorage, SessionStorage, SqliteStorage, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

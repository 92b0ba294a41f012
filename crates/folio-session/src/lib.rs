//! Folio Session Management
//!
//! - A session is a snapshot of in-progress work: selected files, the chosen
//!   tool and its options
//! - Sessions live in tab-scoped storage and expire after a time window
//! - Expired sessions are discarded lazily on restore, and by a periodic sweep
//! - Storage failures never escape the manager; they degrade to "no session"

mod clock;
mod config;
mod error;
mod manager;
mod record;
mod state;
mod sweep;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfirmPrompt, RestoredCallback, SessionCallback, SessionConfig, DEFAULT_EXPIRATION,
    DEFAULT_SESSION_KEY, DEFAULT_SWEEP_INTERVAL,
};
pub use error::SessionError;
pub use manager::{SessionManager, CLEAR_WARNING};
pub use record::{FileDescriptor, SessionOptions, SessionRecord};
pub use state::SessionState;

pub type Result<T> = std::result::Result<T, SessionError>;

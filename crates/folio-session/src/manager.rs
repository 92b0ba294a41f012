//! Session Manager
//!
//! Persists in-progress work under a single storage key, restores it on
//! startup and discards it once it ages past the expiration window.
//! Every public operation absorbs storage and parsing failures.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use folio_storage::SessionStorage;

use crate::clock::{duration_millis, Clock, SystemClock};
use crate::config::SessionConfig;
use crate::record::SessionRecord;
use crate::state::SessionState;
use crate::sweep::SweepTask;
use crate::Result;

/// Message passed to the confirmation prompt before clearing
pub const CLEAR_WARNING: &str =
    "This will discard your selected files and settings. Do you want to continue?";

/// Result of reading the stored record
enum Lookup {
    Missing,
    /// Absent for the caller: unreadable, or expired but not deletable
    Unusable,
    /// Expired and removed from storage
    Discarded,
    Valid(SessionRecord),
}

pub(crate) struct Inner {
    storage: Arc<dyn SessionStorage>,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    /// Set once the user has accepted the clear warning
    warning_confirmed: Mutex<bool>,
    /// Serializes read-check-delete cycles against saves and clears
    op_lock: Mutex<()>,
}

pub struct SessionManager {
    inner: Arc<Inner>,
    sweep: Option<SweepTask>,
    /// Record found at construction, until claimed
    restored: Mutex<Option<SessionRecord>>,
}

impl SessionManager {
    pub fn new<S>(storage: S, config: SessionConfig) -> Self
    where
        S: SessionStorage + 'static,
    {
        Self::with_clock(storage, config, Arc::new(SystemClock))
    }

    /// Create a manager with an explicit time source.
    ///
    /// Attempts one restore; a valid record is handed to `on_session_restored`.
    /// When called inside a Tokio runtime, also starts the periodic sweep;
    /// otherwise callers drive it with [`SessionManager::sweep_expired`].
    pub fn with_clock<S>(storage: S, config: SessionConfig, clock: Arc<dyn Clock>) -> Self
    where
        S: SessionStorage + 'static,
    {
        let sweep_interval = config.sweep_interval;
        let inner = Arc::new(Inner {
            storage: Arc::new(storage),
            config,
            clock,
            warning_confirmed: Mutex::new(false),
            op_lock: Mutex::new(()),
        });

        let restored = inner.restore_session();
        if let Some(record) = &restored {
            tracing::info!(
                session_key = %inner.session_key(),
                operation = %record.operation,
                file_count = record.files.len(),
                "Restored session"
            );
            if let Some(callback) = &inner.config.on_session_restored {
                callback(record);
            }
        }

        let sweep = match tokio::runtime::Handle::try_current() {
            Ok(_) if sweep_interval.is_zero() => {
                tracing::warn!(
                    session_key = %inner.session_key(),
                    "Sweep interval is zero; periodic sweep disabled"
                );
                None
            }
            Ok(runtime) => Some(SweepTask::spawn(
                &runtime,
                Arc::downgrade(&inner),
                sweep_interval,
            )),
            Err(_) => {
                tracing::debug!(
                    session_key = %inner.session_key(),
                    "No async runtime; periodic sweep not started"
                );
                None
            }
        };

        Self {
            inner,
            sweep,
            restored: Mutex::new(restored),
        }
    }

    /// The record restored at construction, without reading storage again.
    /// Yields it once; later calls return `None`.
    pub fn take_restored(&self) -> Option<SessionRecord> {
        self.restored.lock().take()
    }

    /// Persist `record`, stamping it with the current time.
    ///
    /// Returns `false` if the write failed; the failure is logged.
    pub fn save(&self, record: &SessionRecord) -> bool {
        self.inner.save(record)
    }

    /// Load the stored record. Missing, corrupt and expired records all
    /// yield `None`; an expired one is also deleted.
    pub fn restore_session(&self) -> Option<SessionRecord> {
        self.inner.restore_session()
    }

    /// Delete the stored record.
    ///
    /// With `show_warning`, asks for confirmation first (only until the user
    /// has confirmed once on this manager). Returns `false` if the user
    /// declined or the delete failed.
    pub fn clear_session(&self, show_warning: bool) -> bool {
        self.inner.clear_session(show_warning)
    }

    /// Whether a record saved at `timestamp` is past `expiration`
    /// (or the configured expiration time). Touches no storage.
    pub fn is_session_expired(&self, timestamp: i64, expiration: Option<Duration>) -> bool {
        self.inner.is_session_expired(timestamp, expiration)
    }

    /// Run one sweep now. Returns `true` if an expired record was discarded.
    pub fn sweep_expired(&self) -> bool {
        self.inner.sweep_expired()
    }

    /// Current lifecycle state, read without side effects
    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn session_key(&self) -> &str {
        self.inner.session_key()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Whether the background sweep task is alive
    pub fn is_sweeping(&self) -> bool {
        self.sweep.as_ref().is_some_and(SweepTask::is_running)
    }

    /// Stop the sweep and release the manager
    pub fn dispose(self) {
        tracing::debug!(session_key = %self.session_key(), "Disposing session manager");
    }
}

impl Inner {
    pub(crate) fn session_key(&self) -> &str {
        &self.config.session_key
    }

    fn save(&self, record: &SessionRecord) -> bool {
        let _guard = self.op_lock.lock();

        match self.write_record(record) {
            Ok(saved_at) => {
                tracing::debug!(
                    session_key = %self.session_key(),
                    operation = %record.operation,
                    file_count = record.files.len(),
                    saved_at,
                    "Saved session"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    session_key = %self.session_key(),
                    error = %e,
                    "Failed to save session"
                );
                false
            }
        }
    }

    fn write_record(&self, record: &SessionRecord) -> Result<i64> {
        let mut stamped = record.clone();
        stamped.saved_at = self.clock.now_millis();

        let json = serde_json::to_string(&stamped)?;
        self.storage.set(self.session_key(), &json)?;

        Ok(stamped.saved_at)
    }

    fn read_record(&self) -> Result<Option<SessionRecord>> {
        match self.storage.get(self.session_key())? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn restore_session(&self) -> Option<SessionRecord> {
        match self.lookup() {
            Lookup::Valid(record) => Some(record),
            Lookup::Discarded => {
                self.notify_expired();
                None
            }
            Lookup::Missing | Lookup::Unusable => None,
        }
    }

    pub(crate) fn sweep_expired(&self) -> bool {
        match self.lookup() {
            Lookup::Discarded => {
                self.notify_expired();
                true
            }
            _ => false,
        }
    }

    /// Read the stored record and delete it if expired.
    ///
    /// Callbacks are not fired here: the operation lock is held.
    fn lookup(&self) -> Lookup {
        let _guard = self.op_lock.lock();

        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => return Lookup::Missing,
            Err(e) => {
                tracing::warn!(
                    session_key = %self.session_key(),
                    error = %e,
                    "Failed to read stored session; treating as absent"
                );
                return Lookup::Unusable;
            }
        };

        if !self.is_session_expired(record.saved_at, None) {
            return Lookup::Valid(record);
        }

        let age_ms = self.clock.now_millis().saturating_sub(record.saved_at);
        match self.storage.remove(self.session_key()) {
            Ok(()) => {
                tracing::info!(
                    session_key = %self.session_key(),
                    age_ms,
                    "Discarded expired session"
                );
                Lookup::Discarded
            }
            Err(e) => {
                // Still unusable; the next restore or sweep retries the delete
                tracing::error!(
                    session_key = %self.session_key(),
                    error = %e,
                    "Failed to delete expired session"
                );
                Lookup::Unusable
            }
        }
    }

    fn state(&self) -> SessionState {
        let _guard = self.op_lock.lock();

        match self.read_record() {
            Ok(Some(record)) if self.is_session_expired(record.saved_at, None) => {
                SessionState::Expired
            }
            Ok(Some(_)) => SessionState::Active,
            Ok(None) => SessionState::Empty,
            Err(e) => {
                tracing::debug!(
                    session_key = %self.session_key(),
                    error = %e,
                    "Unreadable session reported as empty"
                );
                SessionState::Empty
            }
        }
    }

    fn clear_session(&self, show_warning: bool) -> bool {
        if show_warning && !self.confirm_clear() {
            tracing::info!(session_key = %self.session_key(), "Session clear declined");
            return false;
        }

        let removed = {
            let _guard = self.op_lock.lock();
            self.storage.remove(self.session_key())
        };

        match removed {
            Ok(()) => {
                tracing::info!(session_key = %self.session_key(), "Cleared session");
                if let Some(callback) = &self.config.on_session_cleared {
                    callback();
                }
                true
            }
            Err(e) => {
                tracing::error!(
                    session_key = %self.session_key(),
                    error = %e,
                    "Failed to clear session"
                );
                false
            }
        }
    }

    fn confirm_clear(&self) -> bool {
        if *self.warning_confirmed.lock() {
            return true;
        }

        let accepted = match &self.config.confirm {
            Some(prompt) => prompt(CLEAR_WARNING),
            None => {
                tracing::warn!(
                    session_key = %self.session_key(),
                    "No confirmation prompt configured; declining clear"
                );
                false
            }
        };

        if accepted {
            *self.warning_confirmed.lock() = true;
        }
        accepted
    }

    fn is_session_expired(&self, timestamp: i64, expiration: Option<Duration>) -> bool {
        let window = duration_millis(expiration.unwrap_or(self.config.expiration_time));
        self.clock.now_millis().saturating_sub(timestamp) > window
    }

    fn notify_expired(&self) {
        if let Some(callback) = &self.config.on_session_expired {
            callback();
        }
    }
}

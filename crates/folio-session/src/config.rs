//! Session manager configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::record::SessionRecord;

pub const DEFAULT_SESSION_KEY: &str = "pdf-tools-session";
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub type RestoredCallback = Arc<dyn Fn(&SessionRecord) + Send + Sync>;
pub type SessionCallback = Arc<dyn Fn() + Send + Sync>;
/// Asks the user to confirm a destructive action; `true` means proceed
pub type ConfirmPrompt = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct SessionConfig {
    /// Storage key; distinct keys are fully independent sessions
    pub session_key: String,
    /// Maximum age of a record before it is discarded
    pub expiration_time: Duration,
    /// How often the background sweep looks for an expired record
    pub sweep_interval: Duration,
    pub(crate) on_session_restored: Option<RestoredCallback>,
    pub(crate) on_session_expired: Option<SessionCallback>,
    pub(crate) on_session_cleared: Option<SessionCallback>,
    pub(crate) confirm: Option<ConfirmPrompt>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            expiration_time: DEFAULT_EXPIRATION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            on_session_restored: None,
            on_session_expired: None,
            on_session_cleared: None,
            confirm: None,
        }
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_expiration_time(mut self, expiration: Duration) -> Self {
        self.expiration_time = expiration;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Called once, at construction, when a valid record is found
    pub fn on_session_restored<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionRecord) + Send + Sync + 'static,
    {
        self.on_session_restored = Some(Arc::new(f));
        self
    }

    /// Called whenever an expired record is found and discarded
    pub fn on_session_expired<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_session_expired = Some(Arc::new(f));
        self
    }

    /// Called after every successful clear, including clearing an empty session
    pub fn on_session_cleared<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_session_cleared = Some(Arc::new(f));
        self
    }

    pub fn with_confirm<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.confirm = Some(Arc::new(f));
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_key", &self.session_key)
            .field("expiration_time", &self.expiration_time)
            .field("sweep_interval", &self.sweep_interval)
            .field("on_session_restored", &self.on_session_restored.is_some())
            .field("on_session_expired", &self.on_session_expired.is_some())
            .field("on_session_cleared", &self.on_session_cleared.is_some())
            .field("confirm", &self.confirm.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.session_key, "pdf-tools-session");
        assert_eq!(config.expiration_time, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert!(config.on_session_restored.is_none());
        assert!(config.confirm.is_none());
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_session_key("split-tool")
            .with_expiration_time(Duration::from_secs(5))
            .on_session_cleared(|| {})
            .with_confirm(|_| true);

        assert_eq!(config.session_key, "split-tool");
        assert_eq!(config.expiration_time, Duration::from_secs(5));
        assert!(config.on_session_cleared.is_some());
        assert!(format!("{:?}", config).contains("split-tool"));
    }
}

//! Session lifecycle states
//!
//! ```text
//! Empty ──save──▶ Active ──time passes──▶ Expired
//!   ▲               │ ▲                      │
//!   │               └─┘ save                 │
//!   └──── clear / restore / sweep ◀──────────┘
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No record stored under the key
    Empty,
    /// A record exists and is within the expiration window
    Active,
    /// A record exists but is older than the expiration window
    Expired,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Active => "active",
            SessionState::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Active.to_string(), "active");
        assert_eq!(
            serde_json::to_string(&SessionState::Empty).unwrap(),
            r#""empty""#
        );
        assert_eq!(SessionState::Expired.to_string(), "expired");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth access token supplied by the auth layer.
///
/// Refresh is not handled here; an expired token simply produces
/// authorization failures at the fetch boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// The signed-in user, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

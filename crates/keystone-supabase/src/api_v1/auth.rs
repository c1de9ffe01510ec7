use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_builder_methods;

/// Email/password pair used for both sign-in and sign-up.
#[derive(Debug, Serialize, Clone)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
    /// User metadata stored on sign-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PasswordCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            data: None,
        }
    }
}

impl_builder_methods!(PasswordCredentials, data: Value);

/// Tokens handed out by the auth server after a successful sign-in.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp, seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl Session {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// `true` once `now` is at or past the expiry. Sessions without an
    /// expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| now >= expiry)
    }
}

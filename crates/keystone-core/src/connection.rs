//! Description of the backend a client handle is bound to.
//!
//! A [`ConnectionInfo`] is produced once by a provider's builder and never
//! changes afterwards.  The session flags are forwarded to the backend's own
//! auth machinery; Keystone does not manage sessions itself.
use serde::{Deserialize, Serialize};

/// How the backend's auth layer should treat user sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Refresh access tokens before they expire.
    pub auto_refresh_token: bool,
    /// Keep the session across process restarts.
    pub persist_session: bool,
    /// Pick up a session from the URL fragment after an auth redirect.
    pub detect_session_in_url: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
            detect_session_in_url: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    base_url: String,
    public_key: String,
    schema: String,
    session: SessionOptions,
}

impl ConnectionInfo {
    /// Trailing slashes on `base_url` are dropped so endpoint paths can be
    /// appended verbatim.
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
        schema: impl Into<String>,
        session: SessionOptions,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            public_key: public_key.into(),
            schema: schema.into(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn session(&self) -> SessionOptions {
        self.session
    }
}

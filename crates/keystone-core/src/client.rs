//! Shared, read-only handle around a single concrete [`Backend`].
//!
//! Build the backend once during application bootstrap, wrap it in a
//! [`KeystoneClient`] and hand clones to whatever needs it.  Clones share the
//! same allocation, so every component talks to the very same configured
//! connection.
//!
//! ```rust
//! use keystone_core::{Backend, ConnectionInfo, KeystoneClient, RawError, SessionOptions};
//!
//! struct Fixed(ConnectionInfo);
//!
//! impl Backend for Fixed {
//!     fn connection(&self) -> &ConnectionInfo {
//!         &self.0
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let info = ConnectionInfo::new("https://demo.example", "anon", "public", SessionOptions::default());
//! let client = KeystoneClient::new(Fixed(info));
//!
//! let envelope = client
//!     .call(|_| async { Err::<(), _>(RawError::message("Invalid login credentials")) })
//!     .await;
//! assert_eq!(envelope.error(), Some("Invalid email or password"));
//! # }
//! ```
use std::{future::Future, sync::Arc};

use crate::{
    backend::Backend, connection::ConnectionInfo, envelope::Envelope, normalize::RawError,
};

/// A client bound to a single backend.
#[derive(Debug)]
pub struct KeystoneClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for KeystoneClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> KeystoneClient<B>
where
    B: Backend,
{
    /// Create a new client that delegates all calls to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Access the underlying backend (e.g. for provider-specific calls).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn connection(&self) -> &ConnectionInfo {
        self.backend.connection()
    }

    /// `true` if both handles point at the same backend instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }

    /// Run one backend call and fold its outcome into an [`Envelope`].
    ///
    /// Errors are normalized, never returned.
    pub async fn call<'a, T, E, F, Fut>(&'a self, f: F) -> Envelope<T>
    where
        F: FnOnce(&'a B) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<RawError>,
    {
        Envelope::from_result(f(&self.backend).await)
    }
}

impl<B> AsRef<B> for KeystoneClient<B> {
    fn as_ref(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use crate::{connection::SessionOptions, normalize::FALLBACK_MESSAGE};

    use super::*;

    struct FakeBackend {
        connection: ConnectionInfo,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                connection: ConnectionInfo::new(
                    "https://demo.example",
                    "anon-key",
                    "public",
                    SessionOptions::default(),
                ),
            }
        }

        async fn lookup(&self, id: u32) -> Result<String, RawError> {
            match id {
                1 => Ok("ada".to_owned()),
                2 => Err(RawError::message(
                    "JSON object requested, multiple (or no) rows returned",
                )
                .with_code("PGRST116")),
                _ => Err(RawError::Empty),
            }
        }
    }

    impl Backend for FakeBackend {
        fn connection(&self) -> &ConnectionInfo {
            &self.connection
        }
    }

    #[test]
    fn clones_share_the_same_backend() {
        let client = KeystoneClient::new(FakeBackend::new());
        let shared = client.clone();
        assert!(client.ptr_eq(&shared));
        assert_eq!(shared.connection().base_url(), "https://demo.example");

        let other = KeystoneClient::new(FakeBackend::new());
        assert!(!client.ptr_eq(&other));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeystoneClient<FakeBackend>>();
    }

    #[tokio::test]
    async fn call_wraps_success() {
        let client = KeystoneClient::new(FakeBackend::new());
        let envelope = client.call(|backend| backend.lookup(1)).await;
        assert_eq!(envelope, Envelope::Success(Some("ada".to_owned())));
    }

    #[tokio::test]
    async fn call_normalizes_failures() {
        let client = KeystoneClient::new(FakeBackend::new());

        let envelope = client.call(|backend| backend.lookup(2)).await;
        assert_eq!(envelope.error(), Some("The requested record was not found"));
        assert_eq!(envelope.code(), Some("PGRST116"));

        let envelope = client.call(|backend| backend.lookup(9)).await;
        assert_eq!(envelope.error(), Some(FALLBACK_MESSAGE));
    }
}

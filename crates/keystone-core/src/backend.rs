use crate::connection::ConnectionInfo;

/// A **backend** is a configured connection to one concrete service
/// (Supabase, …).
///
/// The trait is intentionally minimal: the generic [`KeystoneClient`] only
/// needs to know where the backend points.  Everything call-specific lives on
/// the provider type itself and is reached through
/// [`KeystoneClient::call`].
///
/// [`KeystoneClient`]: crate::client::KeystoneClient
/// [`KeystoneClient::call`]: crate::client::KeystoneClient::call
pub trait Backend: Send + Sync {
    /// Connection settings fixed when the backend was built.
    fn connection(&self) -> &ConnectionInfo;
}

//! Backend-agnostic building blocks for Keystone.
//!
//! * [`connection`] – what a configured client handle points at.
//! * [`backend`] – the trait provider crates implement.
//! * [`client`] – the shared, read-only handle application code passes around.
//! * [`envelope`] / [`normalize`] – the uniform success/failure shape every
//!   call result is folded into.
pub mod backend;
pub mod client;
pub mod connection;
pub mod envelope;
pub mod error;
pub mod normalize;

pub use backend::Backend;
pub use client::KeystoneClient;
pub use connection::{ConnectionInfo, SessionOptions};
pub use envelope::{Envelope, Failure};
pub use normalize::{FALLBACK_MESSAGE, RawError, normalize_error, wrap_response};

//! # `keystone` – The umbrella crate
//!
//! One dependency line for the whole workspace:
//!
//! | Crate                   | What it provides                                                        |
//! |-------------------------|-------------------------------------------------------------------------|
//! | **`keystone-core`**     | `Backend` trait, shared `KeystoneClient`, `Envelope`, error normalizer  |
//! | **`keystone-supabase`** | Environment-driven builder and HTTP client for Supabase *(optional)*    |
//!
//! The `supabase` Cargo feature is on by default; turn it off to stay
//! backend-agnostic.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use keystone::{KeystoneClient, supabase::SupabaseClientBuilder};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct Profile { id: u32, name: String }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Fails fast if SUPABASE_URL or SUPABASE_ANON_KEY is missing.
//!     let client = KeystoneClient::new(SupabaseClientBuilder::new_from_env().build()?);
//!
//!     let envelope = client
//!         .call(|backend| backend.select::<Profile>("profiles", "id,name"))
//!         .await;
//!
//!     match envelope.into_result() {
//!         Ok(rows) => println!("{rows:?}"),
//!         Err(failure) => eprintln!("{failure}"),
//!     }
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/keystone/latest")]

pub use keystone_core::*;

#[cfg(feature = "supabase")]
pub use keystone_supabase as supabase;

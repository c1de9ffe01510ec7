mod builder;
mod client;

pub use builder::{ANON_KEY_ENV, DEFAULT_SCHEMA, SupabaseClientBuilder, URL_ENV};
pub use client::SupabaseClient;
pub mod api_v1;
pub mod error;

mod auth;
mod common;
mod rest;

pub use auth::*;
pub use common::*;
pub use rest::*;

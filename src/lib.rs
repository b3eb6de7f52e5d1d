//! Username/password authentication with signed session tokens.
//!
//! This facade crate re-exports the turnstile crates for convenient access.
//!
//! ## Crate Organization
//!
//! - [`core`] — Ids, constants, settings, logging
//! - [`auth`] — Hashing, tokens, the auth core, and the gate
//! - [`database`] — PostgreSQL credential store
//! - [`server`] — HTTP boundary
//! - [`client`] — Session cache and HTTP client

pub use turnstile_core as core;
pub use turnstile_auth as auth;
#[cfg(feature = "database")]
pub use turnstile_database as database;
#[cfg(feature = "server")]
pub use turnstile_server as server;
#[cfg(feature = "client")]
pub use turnstile_client as client;

pub use turnstile_core::ID;
pub use turnstile_core::Settings;

//! Client side of turnstile.
//!
//! A reactive cache of the last issued token and user, persisted locally,
//! plus an HTTP client that keeps the cache in step with the server.
//!
//! - [`Session`] — Observable `{token, user}` cell
//! - [`Storage`] — Key/value persistence behind the session
//! - [`Api`] — Calls to the `/auth` routes
mod api;
mod error;
mod session;
mod storage;

pub use api::*;
pub use error::*;
pub use session::*;
pub use storage::*;

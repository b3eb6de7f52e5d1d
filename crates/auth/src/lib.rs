//! Authentication core: credentials, bearer tokens, and the authorization gate.
//!
//! JWT-based sessions with Argon2 password hashing. Tokens are stateless;
//! nothing about a session is stored server-side.
//!
//! ## Accounts
//!
//! - [`Account`] — Registered user, without its password hash
//! - [`UserInfo`] — Sanitized outward view of an account
//! - [`Role`] — Opaque authorization tag carried in tokens
//!
//! ## Security
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`password`] — Argon2 hashing and verification
//!
//! ## Orchestration
//!
//! - [`Authority`] — Registration, login, update, delete, and the gate
//! - [`Store`] — Credential store seam, with [`Memory`] as the in-process backend
mod account;
mod authority;
mod claims;
mod crypto;
mod dto;
mod error;
mod memory;
pub mod password;
mod role;
mod store;

pub use account::*;
pub use authority::*;
pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use memory::*;
pub use role::*;
pub use store::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;

//! PostgreSQL credential store.
//!
//! Accounts live in one table with a unique email index. Every store call
//! borrows a connection from a bounded pool and returns it when the call
//! finishes, on success or failure.
//!
//! ## Connectivity
//!
//! - [`connect()`] — Opens the pool described by [`turnstile_core::Database`]
//! - [`options()`] — Connection options from a URL or from discrete parts
//!
//! ## Storage
//!
//! - [`Schema`] — Table metadata and DDL generation
//! - [`Postgres`] — [`turnstile_auth::Store`] over the pool
mod postgres;
mod schema;

pub use postgres::*;
pub use schema::*;

use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::str::FromStr;
use turnstile_core::Database;

/// `DB_URL` is parsed as given. Otherwise each part is set verbatim,
/// so credentials never need URL escaping.
pub fn options(database: &Database) -> Result<PgConnectOptions, sqlx::Error> {
    match database.url {
        Some(ref url) => PgConnectOptions::from_str(url),
        None => {
            let options = PgConnectOptions::new()
                .host(&database.host)
                .port(database.port)
                .username(&database.user)
                .database(&database.name);
            match database.password.is_empty() {
                true => Ok(options),
                false => Ok(options.password(&database.password)),
            }
        }
    }
}

/// Opens a pool of at most `database.capacity` connections.
/// Callers beyond capacity wait for a connection to be released.
pub async fn connect(database: &Database) -> Result<PgPool, sqlx::Error> {
    let options = options(database).inspect_err(|e| log::error!("database settings rejected: {}", e))?;
    log::info!(
        "connecting to database {} on {}:{}",
        options.get_database().unwrap_or_default(),
        options.get_host(),
        options.get_port()
    );
    PgPoolOptions::new()
        .max_connections(database.capacity)
        .connect_with(options)
        .await
        .inspect(|_| log::info!("database pool ready ({} connections)", database.capacity))
        .inspect_err(|e| log::error!("database connection failed: {}", e))
}

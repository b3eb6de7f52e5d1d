//! Core identifiers, constants, and configuration for turnstile.
//!
//! Everything here is shared by the store, the auth core, the HTTP server
//! and the client, so it carries no web or database dependencies.
mod config;

pub use config::*;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;
use std::str::FromStr;

/// Typed wrapper over a time-ordered uuid::Uuid.
/// The marker keeps account ids from being mixed with any other id.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

/// Fresh server-assigned id.
impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> FromStr for ID<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self::from)
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SESSION TOKENS
// ============================================================================
/// Default lifetime of an issued bearer token.
pub const TOKEN_LIFETIME: std::time::Duration = std::time::Duration::from_secs(2 * 60 * 60);
/// Longest configurable token lifetime (one year).
pub const MAX_TOKEN_LIFETIME: std::time::Duration = std::time::Duration::from_secs(365 * 24 * 60 * 60);
/// Scheme prefix expected in the Authorization header.
pub const BEARER: &str = "Bearer ";

// ============================================================================
// ACCOUNTS
// ============================================================================
/// Role assigned when registration does not name one.
pub const DEFAULT_ROLE: &str = "user";

// ============================================================================
// PASSWORD HASHING
// Argon2id cost parameters. Fixed for the lifetime of stored hashes;
// raising them only affects hashes written afterwards.
// ============================================================================
/// Memory cost in KiB.
pub const HASH_MEMORY_KIB: u32 = 19 * 1024;
/// Number of passes over memory.
pub const HASH_ITERATIONS: u32 = 2;
/// Degree of parallelism.
pub const HASH_LANES: u32 = 1;

// ============================================================================
// CREDENTIAL STORE
// ============================================================================
/// Upper bound on simultaneously open store connections.
pub const POOL_CAPACITY: u32 = 10;
/// Table holding accounts.
#[rustfmt::skip]
pub const USERS: &str = "users";

// ============================================================================
// HTTP SERVER
// ============================================================================
/// Port bound when PORT is unset.
pub const DEFAULT_PORT: u16 = 3500;
/// Host bound when HOST is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Browser origin allowed when CORS_ORIGIN is unset.
pub const DEFAULT_ORIGIN: &str = "http://localhost:4200";
/// Largest accepted JSON or form request body, in bytes.
pub const BODY_LIMIT: usize = 16 * 1024;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> std::io::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ID::<Marker>::default(), ID::<Marker>::default());
    }

    #[test]
    fn ids_parse_from_display() {
        let id = ID::<Marker>::default();
        assert_eq!(id.to_string().parse::<ID<Marker>>().unwrap(), id);
        assert!("not-a-uuid".parse::<ID<Marker>>().is_err());
    }

    #[test]
    fn ids_serialize_as_bare_uuid() {
        let id = ID::<Marker>::default();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        assert_eq!(serde_json::from_str::<ID<Marker>>(&json).unwrap(), id);
    }
}

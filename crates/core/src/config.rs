use super::*;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub secret: String,
    pub lifetime: Duration,
    pub origin: String,
    pub database: Database,
}

/// Connection parameters for the credential store.
/// `url` wins over the individual parts when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub capacity: u32,
}

impl Settings {
    /// Reads the process environment, after loading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let lifetime = match lookup("TOKEN_EXPIRATION") {
            None => TOKEN_LIFETIME,
            Some(s) => parse_duration(&s)
                .filter(|d| !d.is_zero())
                .filter(|d| *d <= MAX_TOKEN_LIFETIME)
                .ok_or(ConfigError::Invalid("TOKEN_EXPIRATION", s))?,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            secret,
            lifetime,
            database: Database {
                url: lookup("DB_URL"),
                host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parsed(&lookup, "DB_PORT")?.unwrap_or(5432),
                user: lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                name: lookup("DB_NAME").unwrap_or_else(|| "turnstile".to_string()),
                capacity: parsed::<_, u32>(&lookup, "DB_POOL")?
                    .filter(|n| *n > 0)
                    .unwrap_or(POOL_CAPACITY),
            },
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|s| s.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key, s)))
        .transpose()
}

/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (at, unit) = s.char_indices().last()?;
    let value: u64 = s[..at].parse().ok()?;
    let scale = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return None,
    };
    value.checked_mul(scale).map(Duration::from_secs)
}

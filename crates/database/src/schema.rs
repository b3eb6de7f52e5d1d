use turnstile_auth::Account;
use turnstile_core::USERS;

/// Table metadata for PostgreSQL tables.
/// Describes structure only; no I/O happens here.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Note: hashword is a database-only field, not part of the Account domain type.
impl Schema for Account {
    fn name() -> &'static str {
        USERS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            USERS,
            " (
                id          UUID PRIMARY KEY,
                username    VARCHAR(255) NOT NULL,
                email       VARCHAR(255) UNIQUE NOT NULL,
                hashword    TEXT NOT NULL,
                role        VARCHAR(64) NOT NULL DEFAULT 'user'
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_users_username ON ",
            USERS,
            " (username);"
        )
    }
}

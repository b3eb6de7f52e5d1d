use super::*;
use turnstile_auth::Account;
use turnstile_auth::Role;
use turnstile_auth::Store;
use turnstile_auth::StoreError;
use turnstile_core::ID;
use turnstile_core::USERS;
use turnstile_core::Unique;

type Row = (uuid::Uuid, String, String, String, String);

/// Credential store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct Postgres {
    pool: PgPool,
}

impl Postgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the accounts table and its indices if missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        log::info!("ensuring {} table", Account::name());
        sqlx::query(Account::creates())
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        sqlx::query(Account::indices())
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// The unique email index is the only constraint that maps to a conflict.
fn classify(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict,
        e => StoreError::Backend(e.to_string()),
    }
}

fn hydrate((id, username, email, hashword, role): Row) -> (Account, String) {
    (
        Account::new(ID::from(id), username, email, Role::from(role)),
        hashword,
    )
}

#[async_trait::async_trait]
impl Store for Postgres {
    async fn create(&self, account: &Account, hashword: &str) -> Result<(), StoreError> {
        sqlx::query(const_format::concatcp!(
            "INSERT INTO ",
            USERS,
            " (id, username, email, hashword, role) VALUES ($1, $2, $3, $4, $5)"
        ))
        .bind(account.id().inner())
        .bind(account.username())
        .bind(account.email())
        .bind(hashword)
        .bind(account.role().as_str())
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(classify)
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, StoreError> {
        sqlx::query_as::<_, Row>(const_format::concatcp!(
            "SELECT id, username, email, hashword, role FROM ",
            USERS,
            " WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map(|opt| opt.map(hydrate))
        .map_err(classify)
    }

    async fn fetch(&self, id: ID<Account>) -> Result<Option<(Account, String)>, StoreError> {
        sqlx::query_as::<_, Row>(const_format::concatcp!(
            "SELECT id, username, email, hashword, role FROM ",
            USERS,
            " WHERE id = $1"
        ))
        .bind(id.inner())
        .fetch_optional(&self.pool)
        .await
        .map(|opt| opt.map(hydrate))
        .map_err(classify)
    }

    async fn update(&self, account: &Account, hashword: &str) -> Result<bool, StoreError> {
        sqlx::query(const_format::concatcp!(
            "UPDATE ",
            USERS,
            " SET username = $2, email = $3, hashword = $4, role = $5 WHERE id = $1"
        ))
        .bind(account.id().inner())
        .bind(account.username())
        .bind(account.email())
        .bind(hashword)
        .bind(account.role().as_str())
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected() > 0)
        .map_err(classify)
    }

    async fn delete(&self, id: ID<Account>) -> Result<bool, StoreError> {
        sqlx::query(const_format::concatcp!("DELETE FROM ", USERS, " WHERE id = $1"))
            .bind(id.inner())
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected() > 0)
            .map_err(classify)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

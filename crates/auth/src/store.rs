use super::*;
use turnstile_core::ID;

/// Credential store seam.
/// Pure data access; the only rule a backend enforces is email uniqueness,
/// reported as [`StoreError::Conflict`].
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create(&self, account: &Account, hashword: &str) -> Result<(), StoreError>;
    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, StoreError>;
    async fn fetch(&self, id: ID<Account>) -> Result<Option<(Account, String)>, StoreError>;
    /// Overwrite every column of an existing row. False when no row matched.
    async fn update(&self, account: &Account, hashword: &str) -> Result<bool, StoreError>;
    /// False when no row matched.
    async fn delete(&self, id: ID<Account>) -> Result<bool, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

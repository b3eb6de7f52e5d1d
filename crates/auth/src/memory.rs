use super::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use turnstile_core::ID;
use turnstile_core::Unique;

/// In-process credential store.
/// Enforces email uniqueness under one write lock, the same way the
/// database's unique index does.
#[derive(Default)]
pub struct Memory {
    rows: RwLock<HashMap<ID<Account>, (Account, String)>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn taken(rows: &HashMap<ID<Account>, (Account, String)>, email: &str, except: ID<Account>) -> bool {
    rows.values()
        .any(|(account, _)| account.email() == email && account.id() != except)
}

#[async_trait::async_trait]
impl Store for Memory {
    async fn create(&self, account: &Account, hashword: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if taken(&rows, account.email(), account.id()) || rows.contains_key(&account.id()) {
            return Err(StoreError::Conflict);
        }
        rows.insert(account.id(), (account.clone(), hashword.to_string()));
        Ok(())
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|(account, _)| account.email() == email)
            .cloned())
    }

    async fn fetch(&self, id: ID<Account>) -> Result<Option<(Account, String)>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, account: &Account, hashword: &str) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&account.id()) {
            return Ok(false);
        }
        if taken(&rows, account.email(), account.id()) {
            return Err(StoreError::Conflict);
        }
        rows.insert(account.id(), (account.clone(), hashword.to_string()));
        Ok(true)
    }

    async fn delete(&self, id: ID<Account>) -> Result<bool, StoreError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str) -> Account {
        Account::new(
            ID::default(),
            "ana".to_string(),
            email.to_string(),
            Role::default(),
        )
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = Memory::new();
        store.create(&account("a@x.com"), "h").await.unwrap();
        assert!(matches!(
            store.create(&account("a@x.com"), "h").await,
            Err(StoreError::Conflict)
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_onto_taken_email_conflicts() {
        let store = Memory::new();
        let ana = account("a@x.com");
        let bea = account("b@x.com");
        store.create(&ana, "h").await.unwrap();
        store.create(&bea, "h").await.unwrap();
        let moved = bea.patch(None, Some("a@x.com".to_string()));
        assert!(matches!(store.update(&moved, "h").await, Err(StoreError::Conflict)));
        let kept = ana.clone().patch(Some("ana m".to_string()), None);
        assert!(store.update(&kept, "h2").await.unwrap());
        assert_eq!(store.fetch(ana.id()).await.unwrap().unwrap().1, "h2");
    }

    #[tokio::test]
    async fn missing_rows_report_false() {
        let store = Memory::new();
        let ghost = account("g@x.com");
        assert!(!store.update(&ghost, "h").await.unwrap());
        assert!(!store.delete(ghost.id()).await.unwrap());
        assert!(store.lookup("g@x.com").await.unwrap().is_none());
    }
}

use super::*;
use turnstile_core::ID;
use turnstile_core::Unique;

/// Registered user with verified identity.
/// The password hash is a store-only field and never lives on this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    id: ID<Self>,
    username: String,
    email: String,
    role: Role,
}

impl Account {
    pub fn new(id: ID<Self>, username: String, email: String, role: Role) -> Self {
        Self {
            id,
            username,
            email,
            role,
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn role(&self) -> &Role {
        &self.role
    }
    /// Replace whichever fields are supplied, keeping the rest.
    pub fn patch(self, username: Option<String>, email: Option<String>) -> Self {
        Self {
            username: username.unwrap_or(self.username),
            email: email.unwrap_or(self.email),
            ..self
        }
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Sanitized view of an account, safe to send to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub id: ID<Account>,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            username: account.username().to_string(),
            email: account.email().to_string(),
            role: account.role().clone(),
        }
    }
}

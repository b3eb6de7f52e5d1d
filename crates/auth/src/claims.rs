use super::*;
use std::time::Duration;
use turnstile_core::ID;

/// Signed token payload. `sub` is the account id, times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<Account>, role: Role, lifetime: Duration) -> Self {
        let now = now();
        Self {
            sub: user.inner(),
            role,
            iat: now,
            exp: i64::try_from(lifetime.as_secs())
                .map(|secs| now.saturating_add(secs))
                .unwrap_or(i64::MAX),
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < now()
    }
    pub fn user(&self) -> ID<Account> {
        ID::from(self.sub)
    }
    pub fn role(&self) -> &Role {
        &self.role
    }
}

pub(crate) fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_sets_expiry() {
        let claims = Claims::new(ID::default(), Role::default(), Duration::from_secs(7200));
        assert_eq!(claims.exp - claims.iat, 7200);
        assert!(!claims.expired());
    }

    #[test]
    fn unbounded_lifetime_saturates() {
        let claims = Claims::new(ID::default(), Role::default(), Duration::MAX);
        assert_eq!(claims.exp, i64::MAX);
        assert!(!claims.expired());
        let claims = Claims::new(ID::default(), Role::default(), Duration::from_secs(i64::MAX as u64));
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn past_expiry_is_expired() {
        let mut claims = Claims::new(ID::default(), Role::default(), Duration::from_secs(60));
        claims.exp = now() - 1;
        assert!(claims.expired());
    }
}

use super::*;
use crate::dto::filled;
use std::sync::Arc;
use turnstile_core::BEARER;
use turnstile_core::ID;
use turnstile_core::Unique;

/// Orchestrates registration, login, profile mutation and the
/// authorization gate over an injected credential store.
/// Holds no per-request state.
pub struct Authority {
    store: Arc<dyn Store>,
    crypto: Crypto,
}

impl Authority {
    pub fn new(store: Arc<dyn Store>, crypto: Crypto) -> Self {
        Self { store, crypto }
    }
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
    pub fn crypto(&self) -> &Crypto {
        &self.crypto
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<Registered, AuthError> {
        let (username, email, password) =
            match (filled(req.username), filled(req.email), filled(req.password)) {
                (Some(u), Some(e), Some(p)) => (u, e, p),
                _ => return Err(AuthError::Validation(INCOMPLETE_PAYLOAD)),
            };
        if self.store.lookup(&email).await?.is_some() {
            log::info!("registration refused for taken email");
            return Err(AuthError::Conflict(EMAIL_TAKEN));
        }
        let hashword = hash(password).await?;
        let role = filled(req.role).map(Role::from).unwrap_or_default();
        let account = Account::new(ID::default(), username, email, role);
        self.store.create(&account, &hashword).await?;
        log::info!("registered account {}", account.id());
        Ok(Registered {
            username: account.username().to_string(),
            email: account.email().to_string(),
        })
    }

    /// Unknown email and wrong password fail identically, and both pay for one hash verify.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let (email, password) = match (filled(req.email), filled(req.password)) {
            (Some(e), Some(p)) => (e, p),
            _ => return Err(AuthError::Validation(CREDENTIALS_REQUIRED)),
        };
        let matched = match self.store.lookup(&email).await? {
            Some((account, hashword)) => verify(password, hashword).await?.then_some(account),
            None => {
                verify(password, password::decoy().to_string()).await?;
                None
            }
        };
        let account = matched.ok_or_else(|| {
            log::info!("login refused");
            AuthError::Authentication(INVALID_CREDENTIALS)
        })?;
        let token = self
            .crypto
            .issue(account.id(), account.role().clone())
            .map_err(AuthError::internal)?;
        log::info!("login for account {}", account.id());
        Ok(AuthResponse {
            token,
            user: UserInfo::from(&account),
        })
    }

    /// The gate. Takes the raw Authorization header value and never touches the store.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix(BEARER))
            .ok_or(AuthError::Authentication(INVALID_TOKEN))?;
        self.crypto
            .verify(token)
            .inspect_err(|e| log::warn!("bearer token rejected: {}", e))
            .map_err(|_| AuthError::Authentication(INVALID_TOKEN))
    }

    pub async fn update(&self, target: ID<Account>, req: UpdateRequest) -> Result<UserInfo, AuthError> {
        let (account, hashword) = self
            .store
            .fetch(target)
            .await?
            .ok_or(AuthError::NotFound(USER_NOT_FOUND))?;
        let hashword = match filled(req.password) {
            Some(password) => hash(password).await?,
            None => hashword,
        };
        let account = account.patch(filled(req.username), filled(req.email));
        match self.store.update(&account, &hashword).await? {
            true => Ok(UserInfo::from(&account)),
            false => Err(AuthError::NotFound(USER_NOT_FOUND)),
        }
    }

    pub async fn delete(&self, target: ID<Account>) -> Result<(), AuthError> {
        match self.store.delete(target).await? {
            true => {
                log::info!("deleted account {}", target);
                Ok(())
            }
            false => Err(AuthError::NotFound(USER_NOT_FOUND)),
        }
    }
}

/// Runs on the blocking pool.
async fn hash(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(AuthError::internal)?
        .map_err(AuthError::internal)
}

async fn verify(password: String, hashword: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || password::verify(&password, &hashword))
        .await
        .map_err(AuthError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn authority() -> Authority {
        Authority::new(
            Arc::new(Memory::new()),
            Crypto::new(b"s3cret", Duration::from_secs(7200)),
        )
    }

    fn ana() -> RegisterRequest {
        RegisterRequest {
            username: Some("ana".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
            role: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn registers_once_per_email() {
        let auth = authority();
        let registered = auth.register(ana()).await.unwrap();
        assert_eq!(registered.username, "ana");
        assert_eq!(registered.email, "a@x.com");
        let again = RegisterRequest {
            username: Some("other".to_string()),
            ..ana()
        };
        assert!(matches!(
            auth.register(again).await,
            Err(AuthError::Conflict(EMAIL_TAKEN))
        ));
    }

    #[tokio::test]
    async fn concurrent_registrations_admit_one() {
        let auth = Arc::new(authority());
        let tasks = (0..4)
            .map(|_| {
                let auth = auth.clone();
                tokio::spawn(async move { auth.register(ana()).await })
            })
            .collect::<Vec<_>>();
        let mut admitted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(AuthError::Conflict(_)) => {}
                Err(e) => panic!("unexpected {:?}", e),
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn registration_requires_every_field() {
        let auth = authority();
        for req in [
            RegisterRequest {
                username: None,
                ..ana()
            },
            RegisterRequest {
                email: Some(String::new()),
                ..ana()
            },
            RegisterRequest {
                password: None,
                ..ana()
            },
        ] {
            assert!(matches!(
                auth.register(req).await,
                Err(AuthError::Validation(INCOMPLETE_PAYLOAD))
            ));
        }
    }

    #[tokio::test]
    async fn role_defaults_to_user() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        auth.register(RegisterRequest {
            email: Some("b@x.com".to_string()),
            role: Some("admin".to_string()),
            ..ana()
        })
        .await
        .unwrap();
        let user = auth.login(login("a@x.com", "secret1")).await.unwrap().user;
        let admin = auth.login(login("b@x.com", "secret1")).await.unwrap().user;
        assert_eq!(user.role.as_str(), "user");
        assert_eq!(admin.role.as_str(), "admin");
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        let response = auth.login(login("a@x.com", "secret1")).await.unwrap();
        let claims = auth.authorize(Some(&bearer(&response.token))).unwrap();
        assert_eq!(claims.user(), response.user.id);
        assert_eq!(claims.role().as_str(), "user");
        assert_eq!(response.user.email, "a@x.com");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        let unknown = auth.login(login("z@x.com", "secret1")).await.unwrap_err();
        let wrong = auth.login(login("a@x.com", "secret2")).await.unwrap_err();
        assert!(matches!(unknown, AuthError::Authentication(INVALID_CREDENTIALS)));
        assert!(matches!(wrong, AuthError::Authentication(INVALID_CREDENTIALS)));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn unknown_email_still_runs_a_verify() {
        let auth = authority();
        let decoy = password::decoy().to_string();
        let started = std::time::Instant::now();
        let unknown = auth.login(login("nobody@x.com", "secret1")).await.unwrap_err();
        let elapsed = started.elapsed();
        assert!(matches!(unknown, AuthError::Authentication(INVALID_CREDENTIALS)));
        let started = std::time::Instant::now();
        assert!(!verify("secret1".to_string(), decoy).await.unwrap());
        let single = started.elapsed();
        assert!(elapsed * 10 >= single);
    }

    #[tokio::test]
    async fn login_requires_credentials() {
        let auth = authority();
        assert!(matches!(
            auth.login(login("", "secret1")).await,
            Err(AuthError::Validation(CREDENTIALS_REQUIRED))
        ));
        assert!(matches!(
            auth.login(LoginRequest::default()).await,
            Err(AuthError::Validation(CREDENTIALS_REQUIRED))
        ));
    }

    #[test]
    fn gate_rejects_uniformly() {
        let auth = authority();
        let foreign = Crypto::new(b"other", Duration::from_secs(7200))
            .issue(ID::default(), Role::default())
            .unwrap();
        let mut stale = Claims::new(ID::default(), Role::default(), Duration::from_secs(60));
        stale.iat -= 3600;
        stale.exp -= 3600;
        let stale = auth.crypto().encode(&stale).unwrap();
        let headers = [
            None,
            Some("Token abc".to_string()),
            Some("Bearer".to_string()),
            Some(bearer("abc.def.ghi")),
            Some(bearer(&stale)),
            Some(bearer(&foreign)),
        ];
        for header in headers {
            let e = auth.authorize(header.as_deref()).unwrap_err();
            assert!(matches!(e, AuthError::Authentication(INVALID_TOKEN)));
        }
    }

    #[tokio::test]
    async fn update_without_password_keeps_hash() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        let id = auth.login(login("a@x.com", "secret1")).await.unwrap().user.id;
        let before = auth.store().fetch(id).await.unwrap().unwrap().1;
        let patch = UpdateRequest {
            username: Some("ana maria".to_string()),
            ..UpdateRequest::default()
        };
        let view = auth.update(id, patch).await.unwrap();
        let after = auth.store().fetch(id).await.unwrap().unwrap().1;
        assert_eq!(view.username, "ana maria");
        assert_eq!(view.email, "a@x.com");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn update_with_password_rehashes() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        let id = auth.login(login("a@x.com", "secret1")).await.unwrap().user.id;
        let patch = UpdateRequest {
            password: Some("secret2".to_string()),
            ..UpdateRequest::default()
        };
        auth.update(id, patch).await.unwrap();
        assert!(auth.login(login("a@x.com", "secret2")).await.is_ok());
        assert!(auth.login(login("a@x.com", "secret1")).await.is_err());
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let auth = authority();
        assert!(matches!(
            auth.update(ID::default(), UpdateRequest::default()).await,
            Err(AuthError::NotFound(USER_NOT_FOUND))
        ));
    }

    #[tokio::test]
    async fn update_onto_taken_email_conflicts() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        auth.register(RegisterRequest {
            email: Some("b@x.com".to_string()),
            ..ana()
        })
        .await
        .unwrap();
        let id = auth.login(login("b@x.com", "secret1")).await.unwrap().user.id;
        let patch = UpdateRequest {
            email: Some("a@x.com".to_string()),
            ..UpdateRequest::default()
        };
        assert!(matches!(
            auth.update(id, patch).await,
            Err(AuthError::Conflict(EMAIL_TAKEN))
        ));
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let auth = authority();
        auth.register(ana()).await.unwrap();
        let id = auth.login(login("a@x.com", "secret1")).await.unwrap().user.id;
        auth.delete(id).await.unwrap();
        for _ in 0..2 {
            assert!(matches!(
                auth.delete(id).await,
                Err(AuthError::NotFound(USER_NOT_FOUND))
            ));
        }
        assert!(auth.login(login("a@x.com", "secret1")).await.is_err());
    }
}

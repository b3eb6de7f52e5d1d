use super::*;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use turnstile_auth::Account;
use turnstile_auth::AuthResponse;
use turnstile_auth::Claims;
use turnstile_auth::LoginRequest;
use turnstile_auth::ProfileResponse;
use turnstile_auth::RegisterRequest;
use turnstile_auth::RegisterResponse;
use turnstile_auth::StatusResponse;
use turnstile_auth::UpdateRequest;
use turnstile_auth::UserInfo;
use turnstile_core::ID;

/// HTTP client for the `/auth` routes.
/// Keeps the shared [`Session`] in step with what the server says.
pub struct Api {
    http: reqwest::Client,
    base: String,
    session: Arc<Session>,
}

impl Api {
    pub fn new(base: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Registration issues no token, so the session is left alone.
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        let res = self.http.post(self.url("/auth/register")).json(req).send().await?;
        self.read(res, false).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<UserInfo, ClientError> {
        let res = self.http.post(self.url("/auth/login")).json(req).send().await?;
        let AuthResponse { token, user } = self.read(res, false).await?;
        self.session.set(Some(Snapshot {
            token,
            user: user.clone(),
        }));
        Ok(user)
    }

    pub async fn profile(&self) -> Result<Claims, ClientError> {
        let res = self.authorized(self.http.get(self.url("/auth/perfil"))).send().await?;
        self.read::<ProfileResponse>(res, true)
            .await
            .map(|profile| profile.data.user)
    }

    pub async fn update_user(
        &self,
        id: ID<Account>,
        req: &UpdateRequest,
    ) -> Result<UserInfo, ClientError> {
        let url = self.url(&format!("/auth/update/{}", id));
        let res = self.authorized(self.http.put(url)).json(req).send().await?;
        let user = self.read::<UserInfo>(res, true).await?;
        if self.session.user().is_some_and(|me| me.id == user.id) {
            self.session.replace_user(user.clone());
        }
        Ok(user)
    }

    /// Signs out afterwards, whichever account was deleted.
    pub async fn delete_user(&self, id: ID<Account>) -> Result<(), ClientError> {
        let url = self.url(&format!("/auth/delete/{}", id));
        let res = self.authorized(self.http.delete(url)).send().await?;
        self.read::<StatusResponse>(res, true).await?;
        self.session.logout();
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// A 401 on a guarded call means the cached token is dead.
    async fn read<T>(&self, res: reqwest::Response, guarded: bool) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        if guarded && status == StatusCode::UNAUTHORIZED {
            log::info!("server rejected the session token, signing out");
            self.session.logout();
        }
        let message = res
            .json::<StatusResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

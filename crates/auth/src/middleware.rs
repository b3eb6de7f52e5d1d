use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use std::future::Ready;
use std::future::ready;
use turnstile_core::ID;

/// Extractor for authenticated requests.
/// Verifies the bearer token and hands the decoded claims to the handler.
pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
    pub fn user(&self) -> ID<Account> {
        self.0.user()
    }
    pub fn role(&self) -> &Role {
        self.0.role()
    }
}

impl FromRequest for Auth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        ready(
            req.app_data::<web::Data<Authority>>()
                .ok_or_else(|| AuthError::internal("authority not configured"))
                .and_then(|authority| authority.authorize(header))
                .map(Auth),
        )
    }
}

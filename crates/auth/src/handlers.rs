use super::*;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use turnstile_core::BODY_LIMIT;
use turnstile_core::ID;

/// Request body sent as JSON, or as an urlencoded form when the content
/// type says so. Decoding failures of either kind, oversized bodies
/// included, surface through [`json_config`] and [`form_config`].
pub struct Body<T>(pub T);

impl<T> Body<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Body<T>
where
    T: serde::de::DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match req.content_type().eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            true => {
                let form = web::Form::<T>::from_request(req, payload);
                Box::pin(async move { form.await.map(|form| Body(form.into_inner())) })
            }
            false => {
                let json = web::Json::<T>::from_request(req, payload);
                Box::pin(async move { json.await.map(|json| Body(json.into_inner())) })
            }
        }
    }
}

pub async fn register(
    authority: web::Data<Authority>,
    req: Body<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    let user = authority.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        status: "success".to_string(),
        message: "User created successfully".to_string(),
        user,
    }))
}

pub async fn login(
    authority: web::Data<Authority>,
    req: Body<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let response = authority.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn profile(auth: Auth) -> HttpResponse {
    log::debug!("profile read by {} as {}", auth.user(), auth.role());
    HttpResponse::Ok().json(ProfileResponse {
        status: "success".to_string(),
        message: "Access granted to protected profile".to_string(),
        data: ProfileData { user: auth.0 },
    })
}

pub async fn update(
    authority: web::Data<Authority>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    req: Body<UpdateRequest>,
) -> Result<HttpResponse, AuthError> {
    let target = target(&auth, Some(ID::from(path.into_inner())));
    let user = authority.update(target, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_self(
    authority: web::Data<Authority>,
    auth: Auth,
    req: Body<UpdateRequest>,
) -> Result<HttpResponse, AuthError> {
    let target = target(&auth, None);
    let user = authority.update(target, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete(
    authority: web::Data<Authority>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, AuthError> {
    let target = target(&auth, Some(ID::from(path.into_inner())));
    authority.delete(target).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::success("Account deleted.")))
}

pub async fn delete_self(
    authority: web::Data<Authority>,
    auth: Auth,
) -> Result<HttpResponse, AuthError> {
    let target = target(&auth, None);
    authority.delete(target).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::success("Account deleted.")))
}

/// The path id wins over the caller's own id. There is no ownership check,
/// so any authenticated caller may act on any account.
fn target(auth: &Auth, path: Option<ID<Account>>) -> ID<Account> {
    match path {
        Some(id) if id != auth.user() => {
            log::warn!("account {} acting on account {}", auth.user(), id);
            id
        }
        Some(id) => id,
        None => auth.user(),
    }
}

/// Malformed or oversized bodies become validation failures with the usual error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT)
        .error_handler(|e, _| {
            log::debug!("rejected json body: {}", e);
            AuthError::Validation(INCOMPLETE_PAYLOAD).into()
        })
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(BODY_LIMIT)
        .error_handler(|e, _| {
            log::debug!("rejected form body: {}", e);
            AuthError::Validation(INCOMPLETE_PAYLOAD).into()
        })
}

/// An id segment that is not a uuid names no account.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|e, _| {
            log::debug!("rejected path: {}", e);
            AuthError::NotFound(USER_NOT_FOUND).into()
        })
}

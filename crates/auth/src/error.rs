pub const INCOMPLETE_PAYLOAD: &str = "Incomplete request payload";
pub const CREDENTIALS_REQUIRED: &str = "Credentials required";
pub const EMAIL_TAKEN: &str = "Email is already registered";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_TOKEN: &str = "Invalid or expired token.";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INTERNAL: &str = "Internal Server Error";

/// Failures surfaced by the auth core. Each variant maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Authentication(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }
    /// Message safe to show a caller. Internal detail is withheld.
    pub fn public(&self) -> &'static str {
        match self {
            Self::Validation(m)
            | Self::Conflict(m)
            | Self::Authentication(m)
            | Self::NotFound(m) => m,
            Self::Internal(_) => INTERNAL,
        }
    }
}

/// Failures reported by a credential store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique email index rejected the write.
    #[error("email already exists")]
    Conflict,
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => Self::Conflict(EMAIL_TAKEN),
            StoreError::Backend(detail) => Self::Internal(detail),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::*;
    use crate::StatusResponse;
    use actix_web::HttpResponse;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    impl ResponseError for AuthError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::Validation(_) => StatusCode::BAD_REQUEST,
                Self::Conflict(_) => StatusCode::CONFLICT,
                Self::Authentication(_) => StatusCode::UNAUTHORIZED,
                Self::NotFound(_) => StatusCode::NOT_FOUND,
                Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
        fn error_response(&self) -> HttpResponse {
            if let Self::Internal(detail) = self {
                log::error!("{}", detail);
            }
            HttpResponse::build(self.status_code()).json(StatusResponse::error(self.public()))
        }
    }
}

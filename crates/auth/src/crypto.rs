use super::*;
use jsonwebtoken::errors::ErrorKind;
use std::time::Duration;
use turnstile_core::ID;

/// Why a presented token was refused. Callers outside this crate
/// collapse every kind into one authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            _ => Self::Malformed,
        }
    }
}

/// HS256 token issuer and verifier over one process-wide secret.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    lifetime: Duration,
}

impl Crypto {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }
    pub fn from_settings(settings: &turnstile_core::Settings) -> Self {
        Self::new(settings.secret.as_bytes(), settings.lifetime)
    }
    pub fn issue(&self, user: ID<Account>, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode(&Claims::new(user, role, self.lifetime))
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)?;
        match claims.expired() {
            true => Err(VerificationError::Expired),
            false => Ok(claims),
        }
    }
    /// How long each issued token stays valid.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> Crypto {
        Crypto::new(b"s3cret", Duration::from_secs(7200))
    }

    #[test]
    fn issued_tokens_verify() {
        let id = ID::<Account>::default();
        let token = crypto().issue(id, Role::from("admin")).unwrap();
        let claims = crypto().verify(&token).unwrap();
        assert_eq!(claims.user(), id);
        assert_eq!(claims.role().as_str(), "admin");
        assert_eq!(claims.exp - claims.iat, crypto().lifetime().as_secs() as i64);
    }

    #[test]
    fn settings_lifetime_is_carried() {
        let settings = turnstile_core::Settings::from_lookup(|key| match key {
            "JWT_SECRET" => Some("s3cret".to_string()),
            "TOKEN_EXPIRATION" => Some("15m".to_string()),
            _ => None,
        })
        .unwrap();
        let crypto = Crypto::from_settings(&settings);
        assert_eq!(crypto.lifetime(), Duration::from_secs(900));
        let token = crypto.issue(ID::default(), Role::default()).unwrap();
        let claims = crypto.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn expired_tokens_fail() {
        let mut claims = Claims::new(ID::default(), Role::default(), Duration::from_secs(60));
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = crypto().encode(&claims).unwrap();
        assert_eq!(crypto().verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn foreign_secret_fails() {
        let other = Crypto::new(b"other", Duration::from_secs(7200));
        let token = other.issue(ID::default(), Role::default()).unwrap();
        assert_eq!(crypto().verify(&token), Err(VerificationError::SignatureInvalid));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(crypto().verify(""), Err(VerificationError::Malformed));
        assert_eq!(crypto().verify("abc.def"), Err(VerificationError::Malformed));
        assert_eq!(crypto().verify("not a token"), Err(VerificationError::Malformed));
    }

    #[test]
    fn truncated_tokens_fail() {
        let token = crypto().issue(ID::default(), Role::default()).unwrap();
        assert!(crypto().verify(&token[..token.len() - 1]).is_err());
    }
}

use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
use argon2::password_hash::SaltString;
use std::sync::OnceLock;
use turnstile_core::HASH_ITERATIONS;
use turnstile_core::HASH_LANES;
use turnstile_core::HASH_MEMORY_KIB;

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, HASH_LANES, None)
        .map(|params| Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
        .map_err(argon2::password_hash::Error::from)
}

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes)
}

/// One-way salted hash in PHC string format. The salt travels inside the output.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    argon2()?
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
}

/// Recompute with the embedded salt and parameters. Unparseable hashes never match.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Hash checked when a login names no account, so the miss runs a full verify.
/// Built once per process from a random phrase that no caller can know.
pub fn decoy() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| {
        salt()
            .and_then(|phrase| hash(phrase.as_str()))
            .inspect_err(|e| log::error!("decoy hash unavailable: {}", e))
            .unwrap_or_default()
    })
}

//! Password hashing and bearer token handling.
//!
//! The bearer token is the user's numeric id rendered as a decimal string.
//! Tokens carry no signature or expiry; any parseable id is accepted.

use crate::error::{Result, TrackerError};
use crate::model::UserId;
use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Token type reported by the password-grant endpoint.
pub const TOKEN_TYPE: &str = "bearer";

/// Hash a raw password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Check `password` against a stored PHC hash.
///
/// A malformed stored hash is an internal error, not a credential mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow::anyhow!("stored hash unreadable: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn issue_token(user_id: UserId) -> String {
    user_id.to_string()
}

/// Resolve a bearer token back to the user id it encodes.
pub fn resolve_token(token: &str) -> Result<UserId> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TrackerError::Unauthorized("Not authenticated".to_string()));
    }
    token
        .parse::<UserId>()
        .map_err(|_| TrackerError::Unauthorized("Could not validate credentials".to_string()))
}

/// Extract the token from an `Authorization` header value (`Bearer <token>`).
///
/// The scheme is matched case-insensitively.
pub fn bearer_from_header(value: &str) -> Option<&str> {
    let (scheme, rest) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

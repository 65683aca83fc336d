use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Rounds of HMAC applied when stretching a password.
const HASH_ROUNDS: u32 = 10_000;
pub const MIN_PASSWORD_LEN: usize = 8;
/// Salt hashed against when no account matches the login email.
const UNKNOWN_ACCOUNT_SALT: &str = "00000000000000000000000000000000";

/// Caller authenticated by a valid bearer token. Extract this in handlers
/// that require auth; a missing or invalid token is a 401.
#[derive(Debug, Clone)]
pub struct BearerUser {
    pub user_id: String,
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for BearerUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let token = bearer_token(header).ok_or(ApiError::Unauthorized)?;
        let claims = state
            .jwt
            .verify_token(token)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(BearerUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Fresh random salt, hex encoded.
pub fn new_salt() -> String {
    hex::encode(Uuid::new_v4().as_bytes())
}

/// Salted, iterated HMAC-SHA256 of a password, hex encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = mac(salt, password.as_bytes());
    for _ in 1..HASH_ROUNDS {
        let mut input = digest.clone();
        input.extend_from_slice(password.as_bytes());
        digest = mac(salt, &input);
    }
    hex::encode(digest)
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    constant_time_eq(
        hash_password(password, salt).as_bytes(),
        expected_hash.as_bytes(),
    )
}

/// Check a login attempt against a stored `(salt, hash)`. An unknown account
/// still pays for a full hash before failing.
pub fn check_login(password: &str, account: Option<(&str, &str)>) -> bool {
    match account {
        Some((salt, hash)) => verify_password(password, salt, hash),
        None => {
            std::hint::black_box(hash_password(password, UNKNOWN_ACCOUNT_SALT));
            false
        }
    }
}

fn mac(key: &str, input: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(input);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Basic shape check for a registration request.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email address is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

//! JWT access-token claims and validation.
//!
//! Only admin flows carry a JWT; regular user sessions are opaque tokens
//! resolved by a store lookup, so nothing here applies to them.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Access-token JWT lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_EXP: u64 = 900;

/// Identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: Role,
    pub access_token_exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token issuance and validation.
///
/// | Field  | JWT claim | Meaning                        |
/// |--------|-----------|--------------------------------|
/// | `sub`  | `sub`     | user ID (UUID string)          |
/// | `role` | custom    | [`Role`] as its wire string    |
/// | `exp`  | `exp`     | expiration, seconds since epoch|
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: Role,
    pub exp: u64,
}

/// Validate an access token, returning the parsed identity.
///
/// Signature and expiry check only — stateless, no store lookup. HS256,
/// required claims `exp` + `sub`, default 60s leeway for clock skew.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        role: claims.role,
        access_token_exp: claims.exp,
    })
}

fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

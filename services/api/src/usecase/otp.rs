//! Verification-code issuance and validation.
//!
//! Issuance guarantees at most one live code per (user, purpose) by deleting
//! prior unused codes first. Validation consumes the code through a
//! compare-and-swap on `used_at` so concurrent attempts resolve to exactly
//! one winner.

use chrono::Duration;
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{Clock, DeliveryChannel, VerificationCodeRepository};
use crate::domain::types::{CodePurpose, OTP_TTL_MINUTES, VerificationCode};
use crate::error::ApiError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000).to_string()
}

fn is_phone_number(target: &str) -> bool {
    !target.is_empty() && target.chars().all(|c| c.is_ascii_digit())
}

/// Issue a fresh code for (user, purpose), superseding any unused one.
///
/// Dispatch to the delivery channel is best-effort: a gateway failure is
/// logged and swallowed because the persisted code is already valid and the
/// user can retry delivery via resend.
pub async fn issue_code<V, D, C>(
    codes: &V,
    delivery: &D,
    clock: &C,
    user_id: Uuid,
    target: &str,
    purpose: CodePurpose,
    fixed_codes: bool,
) -> Result<VerificationCode, ApiError>
where
    V: VerificationCodeRepository,
    D: DeliveryChannel,
    C: Clock,
{
    codes.delete_unused(user_id, purpose).await?;

    let code_str = if fixed_codes {
        purpose.sentinel().to_owned()
    } else {
        generate_code()
    };

    let now = clock.now();
    let code = VerificationCode {
        id: Uuid::new_v4(),
        user_id,
        code: code_str,
        target: target.to_owned(),
        purpose,
        expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        used_at: None,
        created_at: now,
    };
    codes.create(&code).await?;

    // SMS only reaches numeric targets; email targets fall through silently
    // (mail delivery is handled elsewhere).
    if is_phone_number(target) {
        let message = format!(
            "Your Trenzo verification code is: {}. Valid for {} minutes.",
            code.code, OTP_TTL_MINUTES
        );
        if let Err(e) = delivery.send(target, &message).await {
            tracing::warn!(error = %e, %user_id, "code dispatch failed; stored code remains valid");
        }
    }

    Ok(code)
}

/// Validate and consume a code.
///
/// Uniform failure: wrong code, expired, and already-consumed all surface as
/// [`ApiError::InvalidOrExpiredOtp`] — the distinction must never leak.
pub async fn validate_code<V, C>(
    codes: &V,
    clock: &C,
    user_id: Uuid,
    code: &str,
    purpose: CodePurpose,
) -> Result<VerificationCode, ApiError>
where
    V: VerificationCodeRepository,
    C: Clock,
{
    let now = clock.now();
    let cutoff = now - purpose.expiry_grace();

    let found = codes
        .find_unused(user_id, code.trim(), purpose, cutoff)
        .await?
        .ok_or(ApiError::InvalidOrExpiredOtp)?;

    // The loser of a concurrent race lands here with `false`.
    if !codes.consume(found.id, now).await? {
        return Err(ApiError::InvalidOrExpiredOtp);
    }

    Ok(found)
}

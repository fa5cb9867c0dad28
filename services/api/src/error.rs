use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Domain error variants for the backend.
///
/// `InvalidCredentials`, `InvalidAdminCredentials`, and `InvalidOrExpiredOtp`
/// are deliberately uniform: the message never reveals which underlying check
/// failed (unknown identifier vs. bad password vs. wrong role; wrong code vs.
/// expired vs. already consumed).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid admin credentials")]
    InvalidAdminCredentials,
    #[error("email or phone already registered")]
    DuplicateIdentity,
    #[error("user not found")]
    UserNotFound,
    #[error("admin user no longer exists")]
    AdminNoLongerExists,
    #[error("account is already verified")]
    AlreadyVerified,
    #[error("invalid or expired verification code")]
    InvalidOrExpiredOtp,
    #[error("session expired")]
    SessionExpired,
    #[error("current password incorrect")]
    IncorrectPassword,
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("address not found")]
    AddressNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidAdminCredentials => "INVALID_ADMIN_CREDENTIALS",
            Self::DuplicateIdentity => "DUPLICATE_IDENTITY",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AdminNoLongerExists => "ADMIN_NO_LONGER_EXISTS",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::InvalidOrExpiredOtp => "INVALID_OR_EXPIRED_OTP",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials
            | Self::InvalidAdminCredentials
            | Self::SessionExpired
            | Self::IncorrectPassword
            | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::AdminNoLongerExists | Self::AddressNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::AlreadyVerified | Self::InvalidOrExpiredOtp => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only internal errors are logged here; TraceLayer covers the rest.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing admin access tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// SMS gateway endpoint URL.
    pub sms_api_url: String,
    pub sms_api_key: String,
    pub sms_sender_id: String,
    /// Metal price API endpoint (default metalpriceapi latest).
    pub metal_api_url: String,
    pub metal_api_key: String,
    /// Directory holding uploaded profile images.
    pub upload_dir: String,
    /// Replace random one-time codes with fixed ones. For test environments
    /// only. Env var: `OTP_FIXED_CODES`.
    pub otp_fixed_codes: bool,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sms_api_url: std::env::var("SMS_API_URL").expect("SMS_API_URL"),
            sms_api_key: std::env::var("SMS_API_KEY").expect("SMS_API_KEY"),
            sms_sender_id: std::env::var("SMS_SENDER_ID").expect("SMS_SENDER_ID"),
            metal_api_url: std::env::var("METAL_API_URL")
                .unwrap_or_else(|_| "https://api.metalpriceapi.com/v1/latest".to_owned()),
            metal_api_key: std::env::var("METAL_API_KEY").expect("METAL_API_KEY"),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "public/uploads/profiles".to_owned()),
            otp_fixed_codes: std::env::var("OTP_FIXED_CODES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

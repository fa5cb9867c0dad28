pub mod account;
pub mod address;
pub mod admin_auth;
pub mod auth;
pub mod metal;
pub mod otp;
pub mod profile;
pub mod token;

pub mod address;
pub mod admin_auth;
pub mod auth;
pub mod metal;
pub mod user;

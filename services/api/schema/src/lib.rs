//! Sea-orm entities for the Trenzo backend.

pub mod addresses;
pub mod admin_sessions;
pub mod sessions;
pub mod users;
pub mod verification_codes;

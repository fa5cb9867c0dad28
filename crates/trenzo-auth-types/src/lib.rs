//! Auth vocabulary shared across the Trenzo backend.
//!
//! Provides the [`role::Role`] enum, JWT claims + validation, and cookie
//! builders for the session and admin refresh-token cookies.

pub mod cookie;
pub mod role;
pub mod token;

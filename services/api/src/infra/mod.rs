pub mod clock;
pub mod db;
pub mod files;
pub mod metal;
pub mod sms;

pub mod admin;
pub mod auth;
pub mod files;
pub mod occurrences;
pub mod status;

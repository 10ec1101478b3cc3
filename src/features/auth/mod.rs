//! Administrator authentication.
//!
//! Login verifies an Argon2 password hash and opens an [`AdminSession`]
//! held in the in-memory [`SessionStore`]. Admin routes are guarded by
//! [`session_middleware`](crate::core::middleware::session_middleware),
//! which turns the presented token back into an `AdminSession`.

mod password;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod session;

pub use model::AdminSession;
pub use services::AuthService;
pub use session::SessionStore;

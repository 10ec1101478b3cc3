//! Serving of stored attachments under the configured public path
//! (`/uploads/{filename}` by default).

pub mod routes;

pub use routes::routes;

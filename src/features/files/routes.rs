use axum::Router;
use tower_http::services::ServeDir;

use crate::modules::storage::LocalStorage;

/// Static file route for attachments; unknown names yield 404
pub fn routes(storage: &LocalStorage) -> Router {
    Router::new().nest_service(storage.public_path(), ServeDir::new(storage.root()))
}

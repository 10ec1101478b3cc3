//! Staff-only occurrence management, mounted under `/admin/api`.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/admin/api/estatisticas` | Counts by status and responded |
//! | GET | `/admin/api/ocorrencias` | List with response counts |
//! | GET | `/admin/api/ocorrencias/{id}` | Detail with responses and history |
//! | PUT | `/admin/api/ocorrencias/{id}/status` | Change status |
//! | POST | `/admin/api/responder` | Respond (multipart) |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;

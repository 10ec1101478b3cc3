//! Citizen-facing occurrence reports.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/registrar` | Submit an occurrence (multipart) |
//! | GET | `/api/ocorrencias` | List occurrences, newest first |
//! | GET | `/api/estatisticas` | Totals per category |
//! | GET | `/api/ocorrencia/{id}` | Occurrence with its responses |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::OccurrenceService;

//! Occurrence status lifecycle: the legal status set lives on
//! [`OccurrenceStatus`](crate::features::occurrences::models::OccurrenceStatus),
//! this feature owns every write to `occurrences.status` made by staff and
//! the append-only `status_history` trail that goes with it.

pub mod models;
pub mod services;

pub use services::StatusService;

mod occurrence_service;

pub use occurrence_service::{OccurrenceService, ResponseOrder};

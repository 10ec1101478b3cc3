mod occurrence;
mod response;

pub use occurrence::{
    CategoryCount, CreateOccurrence, Occurrence, OccurrenceStatus, OccurrenceWithResponseCount,
};
pub use response::{CreateOccurrenceResponse, OccurrenceResponse};

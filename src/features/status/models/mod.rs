mod status_change;

pub use status_change::{StatusChange, StatusChangeEntry};

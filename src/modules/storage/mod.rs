//! Storage module for attachment files
//!
//! Provides a local-directory store for uploaded attachments and maps
//! stored names to the URLs they are served under.

mod local_storage;

pub use local_storage::{AttachmentKind, LocalStorage};

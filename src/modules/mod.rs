//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for resources outside the database, such as attachment storage.

pub mod storage;

//! Tubecast Core Library
//!
//! This crate provides the core domain models, error types, configuration,
//! and the composite object reference shared across all Tubecast components.

pub mod config;
pub mod error;
pub mod models;
pub mod object_ref;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use object_ref::{ObjectRef, ObjectRefError};

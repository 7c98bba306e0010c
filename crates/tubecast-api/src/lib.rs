//! Tubecast API Library
//!
//! This crate provides the HTTP handlers, auth extractor, and application
//! setup for the Tubecast video-hosting service.

mod handlers;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;

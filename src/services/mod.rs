//! Services Layer
//!
//! Business logic extracted from HTTP handlers.

pub mod book_service;
pub mod validation;

// Re-export for convenience
pub use book_service::*;

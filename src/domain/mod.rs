//! Domain layer - Pure business abstractions
//!
//! Only trait definitions, repository inputs and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;

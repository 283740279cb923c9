//! Core types and traits shared by the pool and the pooled validator.
//!
//! This module contains:
//! - The outcome of a single invocation
//! - The `Validator` capability trait
//! - Dynamic argument values
//! - Error types, including the batch error stack

pub mod error;
pub mod outcome;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{ErrorStack, InvocationError, ValidationResult};
pub use outcome::Outcome;
pub use types::{Value, ValueType};
pub use validator::Validator;

//! # validator-pool - Pooled, Reusable Validators
//!
//! validator-pool lets request-handling code run stateful validation logic
//! without building a fresh validator per call, while guaranteeing that a
//! validator instance is never used by two validations at once.
//!
//! ## Features
//!
//! - **Non-blocking pool**: checkout reuses an idle instance or creates a new one; callers never wait on each other
//! - **Guaranteed release**: instances go back to the pool on every exit path
//! - **Batch validation**: one checkout per batch, with compact or positional error stacks
//! - **Typed contract**: the `Validator` trait fixes input, output and error types at compile time
//! - **Dynamic arguments**: a `Value` tagged union for callers holding untyped request data
//!
//! ## Quick Start
//!
//! ```rust
//! use validator_pool::prelude::*;
//!
//! struct Bounds {
//!     min: i64,
//!     max: i64,
//! }
//!
//! impl Validator for Bounds {
//!     type Input = i64;
//!     type Output = i64;
//!     type Error = InvocationError;
//!
//!     fn validate(&mut self, n: i64) -> Outcome<i64, InvocationError> {
//!         if n >= self.min && n <= self.max {
//!             Outcome::valid(n)
//!         } else {
//!             Outcome::invalid(n, InvocationError::OutOfRange { value: n, min: self.min, max: self.max })
//!         }
//!     }
//! }
//!
//! let validator = PooledValidator::from_validator(|| Bounds { min: 1, max: 10 });
//!
//! assert!(validator.validate(5).is_valid());
//!
//! let (results, errors) = validator.validate_multiple(vec![1, 2, 44, 9]);
//! assert_eq!(results, vec![1, 2, 44, 9]);
//! assert_eq!(errors.map(|e| e.len()), Some(1));
//!
//! let (_, stack) = validator.validate_multiple_full_err_stack(vec![1, 2, 44, 9]);
//! assert_eq!(stack.len(), 4);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: outcomes, the `Validator` trait, dynamic values and errors
//! - [`pool`]: the instance pool and its configuration
//! - [`validation`]: the pooled validator with single and batch calls

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use validator_pool::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::outcome::Outcome;
    pub use crate::core::types::{Value, ValueType};
    pub use crate::core::validator::Validator;

    // Errors
    pub use crate::core::error::{ErrorStack, InvocationError, ValidationResult};

    // Pool
    pub use crate::pool::{Pool, PoolConfig, PoolGuard, PoolStats};

    // Pooled validation
    pub use crate::validation::{PooledValidator, SharedValidator};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "validator-pool");
    }

    #[test]
    fn test_prelude_builds_pooled_validator() {
        let v = PooledValidator::new(
            || (),
            |_: &mut (), s: String| {
                if s.is_empty() {
                    Outcome::invalid(s, InvocationError::Invalid("empty".into()))
                } else {
                    Outcome::valid(s)
                }
            },
        );

        assert!(v.validate("name".to_string()).is_valid());
        assert_eq!(
            v.validate(String::new()).into_result(),
            Err(InvocationError::Invalid("empty".into()))
        );
    }
}

//! Validator capability trait.
//!
//! A type implementing [`Validator`] declares, at compile time, which input
//! it accepts and what it produces. A [`PooledValidator`] built with
//! [`PooledValidator::from_validator`] then routes every call through
//! [`Validator::validate`] on a pooled instance.
//!
//! [`PooledValidator`]: crate::validation::PooledValidator
//! [`PooledValidator::from_validator`]: crate::validation::PooledValidator::from_validator

use crate::core::outcome::Outcome;

/// Validation logic owned by a poolable instance.
///
/// Implementations may keep scratch state in `self` (compiled rules,
/// reusable buffers); the pool guarantees only one caller holds a given
/// instance at a time. An instance that acquires an external resource
/// must release it before `validate` returns, since pooled instances are
/// never explicitly torn down.
pub trait Validator: Send + 'static {
    /// Argument accepted by one validation call.
    type Input;

    /// Value handed back to the caller, whether or not the input passed.
    type Output;

    /// Error reported for rejected input.
    type Error;

    /// Validate one input.
    fn validate(&mut self, input: Self::Input) -> Outcome<Self::Output, Self::Error>;
}

/// Validators shared by the unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::error::InvocationError;

    /// Accepts integers inside an inclusive range and echoes the input back
    /// in both cases.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RangeValidator {
        pub min: i64,
        pub max: i64,
    }

    impl RangeValidator {
        pub fn new(min: i64, max: i64) -> Self {
            Self { min, max }
        }

        pub fn in_range(&self, value: i64) -> bool {
            value >= self.min && value <= self.max
        }
    }

    impl Validator for RangeValidator {
        type Input = i64;
        type Output = i64;
        type Error = InvocationError;

        fn validate(&mut self, input: i64) -> Outcome<i64, InvocationError> {
            if self.in_range(input) {
                Outcome::valid(input)
            } else {
                Outcome::invalid(
                    input,
                    InvocationError::OutOfRange {
                        value: input,
                        min: self.min,
                        max: self.max,
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RangeValidator;
    use super::*;

    #[test]
    fn test_range_bounds_inclusive() {
        let mut v = RangeValidator::new(1, 10);
        assert!(v.validate(1).is_valid());
        assert!(v.validate(10).is_valid());
        assert!(!v.validate(0).is_valid());
        assert!(!v.validate(11).is_valid());
    }

    #[test]
    fn test_rejection_echoes_input() {
        let mut v = RangeValidator::new(1, 10);
        let outcome = v.validate(-1);
        assert_eq!(outcome.value, -1);
        assert_eq!(outcome.error.unwrap().to_string(), "-1 not in range [1, 10]");
    }
}

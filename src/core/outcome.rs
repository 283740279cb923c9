//! The value/error pair produced by one invocation.

use std::fmt;

/// Result of running one invocation function call.
///
/// Unlike `Result`, the value is always present: a rejecting invocation
/// may still hand back something useful (typically the rejected input)
/// for diagnostics. Whether the value is meaningful when `error` is set is
/// up to the invocation function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T, E> {
    /// Value produced by the invocation.
    pub value: T,
    /// Error reported by the invocation, if the input was rejected.
    pub error: Option<E>,
}

impl<T, E> Outcome<T, E> {
    /// An accepted input.
    pub fn valid(value: T) -> Self {
        Self { value, error: None }
    }

    /// A rejected input, still carrying a value.
    pub fn invalid(value: T, error: E) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Build an outcome from an optional error.
    pub fn new(value: T, error: Option<E>) -> Self {
        Self { value, error }
    }

    /// Check if the input was accepted.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Get the error, if any.
    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Split into the value and the optional error.
    pub fn into_parts(self) -> (T, Option<E>) {
        (self.value, self.error)
    }

    /// Convert into a `Result`, dropping the value on failure.
    pub fn into_result(self) -> Result<T, E> {
        match self.error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }

    /// Transform the value, keeping the error.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        Outcome {
            value: f(self.value),
            error: self.error,
        }
    }

    /// Transform the error, keeping the value.
    pub fn map_err<G, F: FnOnce(E) -> G>(self, f: F) -> Outcome<T, G> {
        Outcome {
            value: self.value,
            error: self.error.map(f),
        }
    }
}

/// On failure the value is lost, so an `Err` carries no echo.
impl<T: Default, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::valid(value),
            Err(e) => Outcome::invalid(T::default(), e),
        }
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "valid: {}", self.value),
            Some(e) => write!(f, "invalid: {} ({})", self.value, e),
        }
    }
}

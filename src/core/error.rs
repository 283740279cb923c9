//! Error types for validator-pool.
//!
//! The pooling layer never invents errors of its own: every failure comes
//! from the caller's invocation function and is handed back unchanged.
//! This module provides:
//! - [`InvocationError`], a ready-made error type for invocation functions
//! - [`ErrorStack`], the aggregate produced by batch validation

use crate::core::types::{Value, ValueType};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Placeholder rendered for passing positions of a full error stack.
pub const PASSED_PLACEHOLDER: &str = "<passed>";

/// Errors an invocation function can report.
///
/// Invocation functions are free to use any error type; this one covers
/// the common cases, including the dedicated unknown-input failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InvocationError {
    #[error("unknown input: expected {expected}, got {got}")]
    UnknownInput { expected: String, got: ValueType },

    #[error("{value} not in range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("{0}")]
    Invalid(String),
}

impl InvocationError {
    /// Build the unknown-input failure for a value the validator was not
    /// written to handle.
    pub fn unknown_input(expected: impl Into<String>, got: &Value) -> Self {
        InvocationError::UnknownInput {
            expected: expected.into(),
            got: got.get_type(),
        }
    }

    /// Check if this is the unknown-input sentinel.
    pub fn is_unknown_input(&self) -> bool {
        matches!(self, InvocationError::UnknownInput { .. })
    }
}

/// Result type alias for invocation functions using [`InvocationError`].
pub type ValidationResult<T> = Result<T, InvocationError>;

// ============================================================================
// Error Stack
// ============================================================================

/// Ordered collection of per-item errors from a batch validation.
///
/// Produced in two shapes:
/// - compact: only the failures, in input order (every entry is `Some`)
/// - full: one slot per input, `None` where the item passed
///
/// "No errors" is expressed by the caller receiving no stack at all; a
/// compact stack handed out by the pooled validator is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorStack<E> {
    entries: Vec<Option<E>>,
}

impl<E> ErrorStack<E> {
    /// Create a stack from raw entries.
    pub fn new(entries: Vec<Option<E>>) -> Self {
        Self { entries }
    }

    /// Create a compact stack holding only failures.
    pub fn from_failures(errors: Vec<E>) -> Self {
        Self {
            entries: errors.into_iter().map(Some).collect(),
        }
    }

    /// Number of slots, passing positions included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the stack has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of slots holding an actual error.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Check if any slot holds an error.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(Option::is_some)
    }

    /// Get the slot at `index`.
    ///
    /// Returns `None` when the index is out of bounds, `Some(None)` for a
    /// passing position.
    pub fn get(&self, index: usize) -> Option<Option<&E>> {
        self.entries.get(index).map(Option::as_ref)
    }

    /// Iterate over all slots.
    pub fn iter(&self) -> impl Iterator<Item = Option<&E>> {
        self.entries.iter().map(Option::as_ref)
    }

    /// Iterate over failing slots with their position in the stack.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &E)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
    }

    /// Drop passing slots, keeping failures in order.
    pub fn compact(self) -> Self {
        Self {
            entries: self.entries.into_iter().filter(Option::is_some).collect(),
        }
    }

    /// Consume the stack and return its slots.
    pub fn into_inner(self) -> Vec<Option<E>> {
        self.entries
    }
}

impl<E: fmt::Display> ErrorStack<E> {
    /// Render every slot, using [`PASSED_PLACEHOLDER`] for passing ones.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|e| render_entry(e.as_ref())).collect()
    }
}

fn render_entry<E: fmt::Display>(entry: Option<&E>) -> String {
    match entry {
        Some(e) => e.to_string(),
        None => PASSED_PLACEHOLDER.to_string(),
    }
}

impl<E> Default for ErrorStack<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for ErrorStack<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            match entry {
                Some(e) => write!(f, "{}", e)?,
                None => f.write_str(PASSED_PLACEHOLDER)?,
            }
        }
        Ok(())
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ErrorStack<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.entries
            .iter()
            .flatten()
            .next()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl<E> From<Vec<Option<E>>> for ErrorStack<E> {
    fn from(entries: Vec<Option<E>>) -> Self {
        Self::new(entries)
    }
}

impl<E> IntoIterator for ErrorStack<E> {
    type Item = Option<E>;
    type IntoIter = std::vec::IntoIter<Option<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Serialized as a list of rendered messages, `null` for passing slots.
impl<E: fmt::Display> Serialize for ErrorStack<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(&entry.as_ref().map(|e| e.to_string()))?;
        }
        seq.end()
    }
}

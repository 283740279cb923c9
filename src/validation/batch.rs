//! Batch validation.
//!
//! A batch checks out a single instance and runs every argument set
//! through it in input order, which avoids a pool round-trip per item. The
//! result vector always has one entry per input; errors are aggregated into
//! an [`ErrorStack`], either compact (failures only) or full (one slot per
//! input).

use crate::core::error::ErrorStack;
use crate::core::outcome::Outcome;
use crate::validation::pooled::PooledValidator;
use log::debug;
use rayon::prelude::*;

/// Default number of argument sets per chunk for parallel batches.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

impl<V, A, T, E> PooledValidator<V, A, T, E> {
    /// Validate several argument sets on one checked-out instance.
    ///
    /// Returns the values in input order, failed items included, and a
    /// compact error stack holding only the failures. The error is `None`
    /// when every item passed.
    pub fn validate_multiple<I>(&self, arg_sets: I) -> (Vec<T>, Option<ErrorStack<E>>)
    where
        I: IntoIterator<Item = A>,
    {
        let (results, errors) = self.run_batch(arg_sets, false);
        debug!(
            "Validated batch of {} item(s), {} failed",
            results.len(),
            errors.len()
        );
        (results, compact_stack(errors))
    }

    /// Validate several argument sets, keeping one error slot per input.
    ///
    /// The stack has exactly as many slots as there were argument sets, with
    /// `None` wherever the item passed, so a failure can be traced back to
    /// its input by position.
    pub fn validate_multiple_full_err_stack<I>(&self, arg_sets: I) -> (Vec<T>, ErrorStack<E>)
    where
        I: IntoIterator<Item = A>,
    {
        let (results, errors) = self.run_batch(arg_sets, true);
        debug!(
            "Validated batch of {} item(s), {} failed",
            results.len(),
            errors.iter().filter(|e| e.is_some()).count()
        );
        (results, ErrorStack::new(errors))
    }

    /// Run every argument set through one instance.
    ///
    /// With `keep_passing` the error vector gets a slot for every item,
    /// otherwise only for failures.
    fn run_batch<I>(&self, arg_sets: I, keep_passing: bool) -> (Vec<T>, Vec<Option<E>>)
    where
        I: IntoIterator<Item = A>,
    {
        let arg_sets = arg_sets.into_iter();
        let (lower, _) = arg_sets.size_hint();
        let mut results = Vec::with_capacity(lower);
        let mut errors = Vec::with_capacity(if keep_passing { lower } else { 0 });

        let mut instance = self.pool.checkout();
        for args in arg_sets {
            let Outcome { value, error } = (self.invoke)(&mut *instance, args);
            results.push(value);
            if keep_passing || error.is_some() {
                errors.push(error);
            }
        }
        drop(instance);

        (results, errors)
    }
}

impl<V, A, T, E> PooledValidator<V, A, T, E>
where
    V: Send,
    A: Send,
    T: Send,
    E: Send,
{
    /// Validate a large batch on the rayon thread pool.
    ///
    /// The input is split into chunks of `chunk_size` argument sets; each
    /// chunk checks out its own instance. Values and errors keep input order
    /// exactly as with [`PooledValidator::validate_multiple`].
    pub fn validate_multiple_parallel(
        &self,
        arg_sets: Vec<A>,
        chunk_size: usize,
    ) -> (Vec<T>, Option<ErrorStack<E>>) {
        let (results, errors) = self.run_parallel(arg_sets, chunk_size);
        let failures: Vec<Option<E>> = errors.into_iter().filter(Option::is_some).collect();
        (results, compact_stack(failures))
    }

    /// Parallel counterpart of
    /// [`PooledValidator::validate_multiple_full_err_stack`].
    pub fn validate_multiple_parallel_full_err_stack(
        &self,
        arg_sets: Vec<A>,
        chunk_size: usize,
    ) -> (Vec<T>, ErrorStack<E>) {
        let (results, errors) = self.run_parallel(arg_sets, chunk_size);
        (results, ErrorStack::new(errors))
    }

    fn run_parallel(&self, arg_sets: Vec<A>, chunk_size: usize) -> (Vec<T>, Vec<Option<E>>) {
        let total = arg_sets.len();
        let chunk_size = chunk_size.max(1);

        let chunks: Vec<(Vec<T>, Vec<Option<E>>)> = arg_sets
            .into_par_iter()
            .chunks(chunk_size)
            .map(|chunk| self.run_batch(chunk, true))
            .collect();

        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::with_capacity(total);
        for (chunk_results, chunk_errors) in chunks {
            results.extend(chunk_results);
            errors.extend(chunk_errors);
        }

        debug!(
            "Validated parallel batch of {} item(s) in chunks of {}",
            total, chunk_size
        );
        (results, errors)
    }
}

/// `None` for an empty failure list, a compact stack otherwise.
fn compact_stack<E>(failures: Vec<Option<E>>) -> Option<ErrorStack<E>> {
    if failures.is_empty() {
        None
    } else {
        Some(ErrorStack::new(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::InvocationError;
    use crate::core::validator::testing::RangeValidator;

    fn range_validator() -> PooledValidator<RangeValidator, i64, i64, InvocationError> {
        PooledValidator::from_validator(|| RangeValidator::new(1, 10))
    }

    #[test]
    fn test_valid_multi() {
        let v = range_validator();
        let data: Vec<i64> = (1..=10).collect();

        let (results, err) = v.validate_multiple(data.clone());
        assert!(err.is_none(), "unexpected error: {:?}", err);
        assert_eq!(results, data);
    }

    #[test]
    fn test_set_with_error() {
        let v = range_validator();
        let data = vec![1, 2, 3, 44, 9];

        let (results, err) = v.validate_multiple(data.clone());
        let err = err.expect("expected an error");
        assert_eq!(results, data);
        assert_eq!(err.len(), 1);
        assert_eq!(err.to_string(), "44 not in range [1, 10]");
    }

    #[test]
    fn test_full_stack_has_slot_per_input() {
        let v = range_validator();
        let data: Vec<i64> = (1..=10).collect();

        let (_, stack) = v.validate_multiple_full_err_stack(data.clone());
        assert_eq!(stack.len(), data.len());
        assert!(!stack.has_failures());
    }

    #[test]
    fn test_example_scenario() {
        let v = range_validator();
        let data = vec![1, 2, 44, 9];

        let (results, err) = v.validate_multiple(data.clone());
        assert_eq!(results, vec![1, 2, 44, 9]);
        assert_eq!(err.map(|e| e.len()), Some(1));

        let (results, stack) = v.validate_multiple_full_err_stack(data);
        assert_eq!(results, vec![1, 2, 44, 9]);
        let slots: Vec<bool> = stack.iter().map(|e| e.is_some()).collect();
        assert_eq!(slots, vec![false, false, true, false]);
    }

    #[test]
    fn test_batch_uses_single_checkout() {
        let v = range_validator();
        v.validate_multiple(vec![1, 2, 3, 4, 5]);
        v.validate_multiple_full_err_stack(vec![6, 7, 8]);

        let stats = v.stats();
        assert_eq!(stats.checkouts, 2);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.returned, 2);
    }

    #[test]
    fn test_empty_batch() {
        let v = range_validator();
        let (results, err) = v.validate_multiple(Vec::new());
        assert!(results.is_empty());
        assert!(err.is_none());

        let (_, stack) = v.validate_multiple_full_err_stack(Vec::new());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let v = range_validator();
        let data: Vec<i64> = (-50..150).collect();

        let (results, err) = v.validate_multiple_parallel(data.clone(), 7);
        assert_eq!(results, data);

        let err = err.expect("out of range items");
        let expected_failures = data.iter().filter(|n| !(1..=10).contains(*n)).count();
        assert_eq!(err.len(), expected_failures);
        assert_eq!(err.get(0).flatten().map(|e| e.to_string()), Some("-50 not in range [1, 10]".to_string()));

        let (_, stack) = v.validate_multiple_parallel_full_err_stack(data.clone(), 7);
        let (_, sequential) = v.validate_multiple_full_err_stack(data);
        assert_eq!(stack, sequential);
    }

    #[test]
    fn test_parallel_zero_chunk_size() {
        let v = range_validator();
        let (results, err) = v.validate_multiple_parallel(vec![1, 2, 3], 0);
        assert_eq!(results, vec![1, 2, 3]);
        assert!(err.is_none());
    }
}

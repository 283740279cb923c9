//! Pooled validator: a pool of instances plus the function that drives them.

use crate::core::outcome::Outcome;
use crate::core::validator::Validator;
use crate::pool::{Pool, PoolConfig, PoolStats};
use std::fmt;
use std::sync::Arc;

/// Invocation function applied to a checked-out instance.
pub type Invoke<V, A, T, E> = Arc<dyn Fn(&mut V, A) -> Outcome<T, E> + Send + Sync>;

/// Validator backed by a pool of reusable instances.
///
/// Every call checks an instance out, applies the invocation function and
/// returns the instance before handing the outcome back. The layer adds no
/// validation semantics of its own: the invocation function alone decides
/// what is invalid, and its outcome is propagated unchanged.
///
/// A `PooledValidator` is `Send + Sync` whenever `V: Send`. Build it once
/// at setup time and share it by reference or through [`SharedValidator`].
///
/// Type parameters:
/// - `V`: pooled instance
/// - `A`: arguments of one call
/// - `T`: value produced by one call
/// - `E`: error reported for rejected arguments
pub struct PooledValidator<V, A, T, E> {
    pub(super) pool: Pool<V>,
    pub(super) invoke: Invoke<V, A, T, E>,
}

/// A pooled validator shared across threads.
pub type SharedValidator<V, A, T, E> = Arc<PooledValidator<V, A, T, E>>;

impl<V, A, T, E> PooledValidator<V, A, T, E> {
    /// Create a pooled validator from an instance factory and an invocation
    /// function.
    ///
    /// ```rust
    /// use validator_pool::prelude::*;
    ///
    /// struct Bounds {
    ///     min: i64,
    ///     max: i64,
    /// }
    ///
    /// let validator = PooledValidator::new(
    ///     || Bounds { min: 1, max: 10 },
    ///     |b: &mut Bounds, n: i64| {
    ///         if n >= b.min && n <= b.max {
    ///             Outcome::valid(n)
    ///         } else {
    ///             Outcome::invalid(n, format!("{} not in range", n))
    ///         }
    ///     },
    /// );
    ///
    /// assert!(validator.validate(5).is_valid());
    /// assert_eq!(validator.validate(-1).into_parts(), (-1, Some("-1 not in range".to_string())));
    /// ```
    pub fn new<F, I>(factory: F, invoke: I) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        I: Fn(&mut V, A) -> Outcome<T, E> + Send + Sync + 'static,
    {
        Self::with_config(PoolConfig::default(), factory, invoke)
    }

    /// Create a pooled validator with custom pool options.
    pub fn with_config<F, I>(config: PoolConfig, factory: F, invoke: I) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        I: Fn(&mut V, A) -> Outcome<T, E> + Send + Sync + 'static,
    {
        Self {
            pool: Pool::with_config(config, factory),
            invoke: Arc::new(invoke),
        }
    }

    /// Validate one set of arguments on a pooled instance.
    ///
    /// The instance is returned to the pool whatever the outcome.
    pub fn validate(&self, args: A) -> Outcome<T, E> {
        let mut instance = self.pool.checkout();
        (self.invoke)(&mut *instance, args)
    }

    /// Add externally built instances to the pool.
    ///
    /// Use with care: the instances are handed to the invocation function
    /// as-is, so they must be configured the way the factory would have
    /// configured them.
    pub fn add_validators<I>(&self, instances: I)
    where
        I: IntoIterator<Item = V>,
    {
        self.pool.seed(instances);
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Pool<V> {
        &self.pool
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Wrap into an `Arc` for sharing across threads.
    pub fn into_shared(self) -> SharedValidator<V, A, T, E> {
        Arc::new(self)
    }
}

impl<V: Validator> PooledValidator<V, V::Input, V::Output, V::Error> {
    /// Create a pooled validator for a type implementing [`Validator`].
    pub fn from_validator<F>(factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::new(factory, V::validate)
    }

    /// Like [`PooledValidator::from_validator`], with custom pool options.
    pub fn from_validator_with_config<F>(config: PoolConfig, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::with_config(config, factory, V::validate)
    }
}

impl<V, A, T, E> fmt::Debug for PooledValidator<V, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledValidator")
            .field("pool", &self.pool)
            .field("invoke", &"<function>")
            .finish()
    }
}

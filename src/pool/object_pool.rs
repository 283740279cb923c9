//! Object pool for validator instances.
//!
//! Instances are created lazily by a factory and recycled through an idle
//! list. Checkout never waits for another holder: when nothing is idle a
//! fresh instance is created, so the only critical section is the push/pop
//! on the idle list itself.

use crate::pool::config::PoolConfig;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Factory function for creating pooled instances.
pub type Factory<V> = Arc<dyn Fn() -> V + Send + Sync>;

/// Pool statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Checkouts served.
    pub checkouts: u64,
    /// Instances created by the factory (prewarm included).
    pub created: u64,
    /// Checkouts served from the idle list.
    pub reused: u64,
    /// Instances handed back after a checkout.
    pub returned: u64,
    /// Instances added through seeding.
    pub seeded: u64,
    /// Instances dropped by the pool (idle cap, shrink, clear, panic).
    pub discarded: u64,
    /// Instances currently idle.
    pub idle: usize,
}

impl PoolStats {
    /// Fraction of checkouts served without calling the factory.
    pub fn reuse_ratio(&self) -> f64 {
        if self.checkouts == 0 {
            return 0.0;
        }
        self.reused as f64 / self.checkouts as f64
    }
}

#[derive(Default)]
struct Counters {
    checkouts: AtomicU64,
    created: AtomicU64,
    reused: AtomicU64,
    returned: AtomicU64,
    seeded: AtomicU64,
    discarded: AtomicU64,
}

/// Thread-safe pool of interchangeable instances.
///
/// `Pool<V>` is `Sync` whenever `V: Send`, so it can be shared by reference
/// or through an `Arc` between any number of threads.
pub struct Pool<V> {
    /// Instances ready for checkout, most recently returned last.
    idle: Mutex<Vec<V>>,
    /// Creates instances when the idle list is empty.
    factory: Factory<V>,
    /// Maximum idle instances retained.
    max_idle: Option<usize>,
    counters: Counters,
}

impl<V> Pool<V> {
    /// Create a pool with default options.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::with_config(PoolConfig::default(), factory)
    }

    /// Create a pool with the given options.
    pub fn with_config<F>(config: PoolConfig, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::from_factory(config, Arc::new(factory))
    }

    /// Create a pool from an already shared factory.
    pub fn from_factory(config: PoolConfig, factory: Factory<V>) -> Self {
        let prewarm = config.effective_prewarm();
        let pool = Self {
            idle: Mutex::new(Vec::with_capacity(prewarm)),
            factory,
            max_idle: config.max_idle,
            counters: Counters::default(),
        };

        if prewarm > 0 {
            let instances: Vec<V> = (0..prewarm).map(|_| (pool.factory)()).collect();
            pool.counters
                .created
                .fetch_add(prewarm as u64, Ordering::Relaxed);
            pool.idle.lock().extend(instances);
            debug!("Prewarmed pool with {} instance(s)", prewarm);
        }

        pool
    }

    /// Take an instance out of the pool.
    ///
    /// Reuses the most recently returned idle instance, or calls the factory
    /// when none is idle. The caller owns the instance until it is handed
    /// back with [`Pool::put`]; prefer [`Pool::checkout`], which does that
    /// automatically.
    pub fn take(&self) -> V {
        // Lock must be released before the factory runs.
        let popped = self.idle.lock().pop();
        self.counters.checkouts.fetch_add(1, Ordering::Relaxed);

        match popped {
            Some(instance) => {
                self.counters.reused.fetch_add(1, Ordering::Relaxed);
                trace!("Reusing idle instance");
                instance
            }
            None => {
                let n = self.counters.created.fetch_add(1, Ordering::Relaxed) + 1;
                debug!("No idle instance, creating instance #{}", n);
                (self.factory)()
            }
        }
    }

    /// Hand an instance back after use.
    ///
    /// The instance must not have been mutated into a state the invocation
    /// function cannot handle; the pool performs no checks.
    pub fn put(&self, instance: V) {
        self.counters.returned.fetch_add(1, Ordering::Relaxed);
        self.retain(instance);
    }

    /// Pre-populate the pool with externally built instances.
    ///
    /// Equivalent to returning instances that were never checked out. The
    /// idle cap still applies.
    pub fn seed<I>(&self, instances: I)
    where
        I: IntoIterator<Item = V>,
    {
        let mut count = 0u64;
        for instance in instances {
            self.retain(instance);
            count += 1;
        }
        self.counters.seeded.fetch_add(count, Ordering::Relaxed);
        debug!("Seeded pool with {} instance(s)", count);
    }

    /// Check an instance out, returning it when the guard is dropped.
    pub fn checkout(&self) -> PoolGuard<'_, V> {
        PoolGuard {
            pool: self,
            instance: Some(self.take()),
        }
    }

    /// Drop idle instances until at most `keep` remain.
    pub fn shrink_to(&self, keep: usize) {
        let dropped: Vec<V> = {
            let mut idle = self.idle.lock();
            if idle.len() <= keep {
                return;
            }
            // Oldest instances sit at the front.
            let excess = idle.len() - keep;
            idle.drain(..excess).collect()
        };
        self.counters
            .discarded
            .fetch_add(dropped.len() as u64, Ordering::Relaxed);
        debug!("Shrunk pool, dropped {} idle instance(s)", dropped.len());
    }

    /// Drop every idle instance.
    pub fn clear(&self) {
        self.shrink_to(0);
    }

    /// Number of idle instances.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Maximum number of idle instances retained, if capped.
    pub fn max_idle(&self) -> Option<usize> {
        self.max_idle
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            checkouts: self.counters.checkouts.load(Ordering::Relaxed),
            created: self.counters.created.load(Ordering::Relaxed),
            reused: self.counters.reused.load(Ordering::Relaxed),
            returned: self.counters.returned.load(Ordering::Relaxed),
            seeded: self.counters.seeded.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
            idle: self.idle_count(),
        }
    }

    /// Add an instance to the idle list, or drop it when the list is full.
    fn retain(&self, instance: V) {
        let rejected = {
            let mut idle = self.idle.lock();
            match self.max_idle {
                Some(max) if idle.len() >= max => Some(instance),
                _ => {
                    idle.push(instance);
                    None
                }
            }
        };

        // Dropped outside the lock.
        if let Some(instance) = rejected {
            self.discard(instance);
        }
    }

    fn discard(&self, instance: V) {
        self.counters.discarded.fetch_add(1, Ordering::Relaxed);
        trace!("Idle list full, dropping instance");
        drop(instance);
    }
}

impl<V> fmt::Debug for Pool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle_count())
            .field("max_idle", &self.max_idle)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Pool Guard
// ============================================================================

/// Exclusive access to one checked-out instance.
///
/// The instance goes back to the pool when the guard is dropped, on every
/// exit path. If the guard is dropped during a panic the instance may be
/// half-mutated, so it is discarded instead.
pub struct PoolGuard<'a, V> {
    pool: &'a Pool<V>,
    instance: Option<V>,
}

impl<'a, V> PoolGuard<'a, V> {
    /// Detach the instance from the pool. It will not be returned.
    pub fn into_inner(mut self) -> V {
        match self.instance.take() {
            Some(instance) => instance,
            // Only Drop empties the slot, and Drop cannot have run yet.
            None => unreachable!("pool guard emptied before drop"),
        }
    }

    /// The pool this guard returns to.
    pub fn pool(&self) -> &'a Pool<V> {
        self.pool
    }
}

impl<V> Deref for PoolGuard<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        match &self.instance {
            Some(instance) => instance,
            None => unreachable!("pool guard emptied before drop"),
        }
    }
}

impl<V> DerefMut for PoolGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        match &mut self.instance {
            Some(instance) => instance,
            None => unreachable!("pool guard emptied before drop"),
        }
    }
}

impl<V> Drop for PoolGuard<'_, V> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            if std::thread::panicking() {
                warn!("Validation panicked, discarding checked-out instance");
                self.pool.counters.discarded.fetch_add(1, Ordering::Relaxed);
                drop(instance);
            } else {
                self.pool.put(instance);
            }
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for PoolGuard<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoolGuard").field(&self.instance).finish()
    }
}

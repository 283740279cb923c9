//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use validator_pool::prelude::*;

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Accepts integers in an inclusive range, echoing the input back.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Validator for Bounds {
    type Input = i64;
    type Output = i64;
    type Error = InvocationError;

    fn validate(&mut self, n: i64) -> Outcome<i64, InvocationError> {
        if n >= self.min && n <= self.max {
            Outcome::valid(n)
        } else {
            Outcome::invalid(
                n,
                InvocationError::OutOfRange {
                    value: n,
                    min: self.min,
                    max: self.max,
                },
            )
        }
    }
}

pub type BoundsValidator = PooledValidator<Bounds, i64, i64, InvocationError>;

/// The 1..=10 range validator used throughout the tests.
pub fn bounds_validator() -> BoundsValidator {
    PooledValidator::from_validator(|| Bounds { min: 1, max: 10 })
}

/// Like [`bounds_validator`], also counting factory calls.
pub fn counted_bounds_validator() -> (BoundsValidator, Arc<AtomicUsize>) {
    let created = Arc::new(AtomicUsize::new(0));
    let c = created.clone();
    let validator = PooledValidator::from_validator(move || {
        c.fetch_add(1, Ordering::SeqCst);
        Bounds { min: 1, max: 10 }
    });
    (validator, created)
}

/// Instance that detects being used by two callers at the same time.
///
/// The flag lives behind an `Arc` so the check still works if the pool were
/// ever to hand out the same instance twice.
#[derive(Debug, Default)]
pub struct ExclusiveProbe {
    pub in_use: Arc<AtomicBool>,
    pub scratch: Vec<i64>,
}

impl Validator for ExclusiveProbe {
    type Input = i64;
    type Output = i64;
    type Error = String;

    fn validate(&mut self, n: i64) -> Outcome<i64, String> {
        if self.in_use.swap(true, Ordering::SeqCst) {
            return Outcome::invalid(n, "instance shared between callers".to_string());
        }

        // Mutate scratch state and read it back; a concurrent writer would
        // leave something other than our own input behind.
        self.scratch.clear();
        self.scratch.push(n);
        std::thread::yield_now();
        let seen = self.scratch[0];

        self.in_use.store(false, Ordering::SeqCst);
        if seen == n {
            Outcome::valid(n)
        } else {
            Outcome::invalid(n, format!("scratch clobbered: wrote {}, read {}", n, seen))
        }
    }
}

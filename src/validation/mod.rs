//! Pooled validation.
//!
//! [`PooledValidator`] couples a [`Pool`](crate::pool::Pool) with an
//! invocation function and exposes single and batch validation on top.

pub mod batch;
pub mod pooled;

pub use batch::DEFAULT_CHUNK_SIZE;
pub use pooled::{Invoke, PooledValidator, SharedValidator};

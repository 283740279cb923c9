//! Instance pooling.
//!
//! The pool hands out validator instances for exclusive use and recycles
//! them afterwards, creating new ones on demand.

pub mod config;
pub mod object_pool;

pub use config::PoolConfig;
pub use object_pool::{Factory, Pool, PoolGuard, PoolStats};

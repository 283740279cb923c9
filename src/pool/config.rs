//! Pool configuration.

use serde::{Deserialize, Serialize};

/// Options controlling how a [`Pool`](crate::pool::Pool) retains instances.
///
/// None of these options bound how many instances can be checked out at
/// once: checkout never blocks and creates a fresh instance whenever the
/// idle list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle instances kept for reuse.
    /// Instances returned while the idle list is full are dropped.
    /// `None` retains every returned instance.
    pub max_idle: Option<usize>,
    /// Number of instances created up front when the pool is built.
    pub prewarm: usize,
}

impl PoolConfig {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of idle instances kept for reuse.
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = Some(max_idle);
        self
    }

    /// Keep every returned instance.
    pub fn unbounded(mut self) -> Self {
        self.max_idle = None;
        self
    }

    /// Create `count` instances when the pool is built.
    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }

    /// Number of instances actually created up front.
    ///
    /// Prewarming past the idle cap would only create instances to drop them.
    pub fn effective_prewarm(&self) -> usize {
        match self.max_idle {
            Some(max) => self.prewarm.min(max),
            None => self.prewarm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let config = PoolConfig::default();
        assert_eq!(config.max_idle, None);
        assert_eq!(config.prewarm, 0);
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::new().with_max_idle(4).with_prewarm(2);
        assert_eq!(config.max_idle, Some(4));
        assert_eq!(config.prewarm, 2);
        assert_eq!(config.clone().unbounded().max_idle, None);
    }

    #[test]
    fn test_prewarm_clamped_to_idle_cap() {
        let config = PoolConfig::new().with_max_idle(2).with_prewarm(8);
        assert_eq!(config.effective_prewarm(), 2);
        assert_eq!(PoolConfig::new().with_prewarm(8).effective_prewarm(), 8);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: PoolConfig = serde_json::from_str(r#"{"max_idle": 16}"#).unwrap();
        assert_eq!(config.max_idle, Some(16));
        assert_eq!(config.prewarm, 0);
    }
}

//! Strategy registry.
//!
//! Maps notification attribute types to the strategies that handle them. The registry is
//! populated once at startup through explicit [`StrategyRegistry::register`] calls and shared
//! read-only afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::config::CacheConfig;
use super::strategies::{CategoryDepthEscalationStrategy, CustomProductSkuStrategy, NoOpStrategy};
use super::strategy::InvalidationStrategy;

#[derive(Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Vec<Arc<dyn InvalidationStrategy>>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in strategies plus a no-op for each extension type.
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CategoryDepthEscalationStrategy::from_config(config)));
        registry.register(Arc::new(CustomProductSkuStrategy));
        for extension in &config.extension_types {
            registry.register(Arc::new(NoOpStrategy::new(extension.clone())));
        }
        registry
    }

    /// Register a strategy under its invalidation type.
    ///
    /// Strategies sharing a type run in registration order.
    pub fn register(&mut self, strategy: Arc<dyn InvalidationStrategy>) {
        let invalidation_type = strategy.invalidation_type().to_string();
        debug!(
            strategy = strategy.name(),
            invalidation_type = %invalidation_type,
            "Invalidation strategy registered"
        );
        self.strategies
            .entry(invalidation_type)
            .or_default()
            .push(strategy);
    }

    /// Strategies registered for `invalidation_type`.
    pub fn strategies_for(&self, invalidation_type: &str) -> &[Arc<dyn InvalidationStrategy>] {
        self.strategies
            .get(invalidation_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registered invalidation types in sorted order.
    pub fn invalidation_types(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Total number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

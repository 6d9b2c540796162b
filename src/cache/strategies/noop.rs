use async_trait::async_trait;

use crate::cache::strategy::{InvalidationContext, InvalidationStrategy};

/// Placeholder registered for attribute types whose handling lives outside this crate.
#[derive(Debug, Clone)]
pub struct NoOpStrategy {
    invalidation_type: String,
}

impl NoOpStrategy {
    pub fn new(invalidation_type: impl Into<String>) -> Self {
        Self {
            invalidation_type: invalidation_type.into(),
        }
    }
}

#[async_trait]
impl InvalidationStrategy for NoOpStrategy {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn invalidation_type(&self) -> &str {
        &self.invalidation_type
    }

    fn patterns(&self, _identifiers: &[String]) -> Vec<String> {
        Vec::new()
    }

    async fn paths_to_invalidate(&self, _context: &InvalidationContext<'_>) -> Vec<String> {
        Vec::new()
    }
}

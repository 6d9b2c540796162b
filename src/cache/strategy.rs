//! The strategy contract every invalidation rule implements.

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};
use venia_cache_types::ChangeNotification;

use crate::application::repos::{GraphqlClient, ResourceResolver};

use super::error::InvalidationError;

const METRIC_STRATEGY_DEGRADED: &str = "venia_cache_strategy_degraded_total";

/// Everything a strategy may consult while evaluating one notification.
#[derive(Clone, Copy)]
pub struct InvalidationContext<'a> {
    pub notification: &'a ChangeNotification,
    pub resources: &'a dyn ResourceResolver,
    pub graphql: &'a dyn GraphqlClient,
}

impl<'a> InvalidationContext<'a> {
    pub fn new(
        notification: &'a ChangeNotification,
        resources: &'a dyn ResourceResolver,
        graphql: &'a dyn GraphqlClient,
    ) -> Self {
        Self {
            notification,
            resources,
            graphql,
        }
    }
}

/// A rule mapping changed identifiers to cache entries that must be purged.
///
/// Implementations hold no per-request state and never fail: anything that prevents a
/// decision results in an empty list.
#[async_trait]
pub trait InvalidationStrategy: Send + Sync {
    /// Name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Notification attribute this strategy reacts to, e.g. `categoryUids`.
    fn invalidation_type(&self) -> &str;

    /// Patterns the host's cache scanner matches against cached payloads.
    fn patterns(&self, identifiers: &[String]) -> Vec<String>;

    /// Explicit cache paths to purge. May contain the store path to purge the whole store.
    async fn paths_to_invalidate(&self, context: &InvalidationContext<'_>) -> Vec<String>;
}

/// Collapse a strategy outcome into its result list, logging and counting failures.
pub(crate) fn absorb(
    strategy: &'static str,
    outcome: Result<Vec<String>, InvalidationError>,
) -> Vec<String> {
    match outcome {
        Ok(values) => values,
        Err(err) => {
            match &err {
                InvalidationError::ConfigurationAbsent { .. } => {
                    info!(strategy, reason = err.reason(), error = %err, "Strategy skipped")
                }
                _ => warn!(strategy, reason = err.reason(), error = %err, "Strategy degraded"),
            }
            counter!(METRIC_STRATEGY_DEGRADED, "reason" => err.reason()).increment(1);
            Vec::new()
        }
    }
}

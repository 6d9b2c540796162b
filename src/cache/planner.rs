//! Invalidation plan generation.
//!
//! Runs every registered strategy against a notification and merges their output into one
//! deduplicated plan for the purge executor.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, histogram};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use venia_cache_types::{ChangeNotification, InvalidationReport};

use super::registry::StrategyRegistry;
use super::strategy::{InvalidationContext, InvalidationStrategy};

const METRIC_STRATEGY_RUNS: &str = "venia_cache_strategy_runs_total";
const METRIC_PLAN_MS: &str = "venia_cache_plan_ms";

/// Merged result of all strategies for one notification.
#[derive(Debug)]
pub struct InvalidationPlan {
    pub id: Uuid,
    pub store_path: String,
    /// Patterns for the host's cache scanner.
    pub patterns: BTreeSet<String>,
    /// Explicit paths to purge, with descendants of listed paths removed.
    pub paths: BTreeSet<String>,
    /// Number of strategy invocations that contributed to this plan.
    pub strategy_runs: usize,
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationPlan {{ store: {}, patterns: {}, paths: {}, full_store: {}, runs: {} }}",
            self.store_path,
            self.patterns.len(),
            self.paths.len(),
            self.is_full_store(),
            self.strategy_runs,
        )
    }
}

impl InvalidationPlan {
    fn empty(store_path: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_path: normalize_path(store_path).unwrap_or_else(|| store_path.to_string()),
            patterns: BTreeSet::new(),
            paths: BTreeSet::new(),
            strategy_runs: 0,
        }
    }

    /// Evaluate patterns and paths of every strategy matching the notification.
    ///
    /// Path computations run concurrently; a strategy that cannot decide contributes nothing.
    #[instrument(skip_all, fields(store_path = %context.notification.store_path))]
    pub async fn evaluate(registry: &StrategyRegistry, context: &InvalidationContext<'_>) -> Self {
        let started_at = Instant::now();
        let notification = context.notification;
        let mut plan = Self::empty(&notification.store_path);

        let runs = matching_strategies(registry, notification);
        for (attribute, strategy) in &runs {
            plan.patterns
                .extend(strategy.patterns(notification.identifiers(attribute)));
            counter!(METRIC_STRATEGY_RUNS, "strategy" => strategy.name()).increment(1);
        }

        let computed = join_all(
            runs.iter()
                .map(|(_, strategy)| strategy.paths_to_invalidate(context)),
        )
        .await;
        plan.paths = collapse_paths(computed.into_iter().flatten());
        plan.strategy_runs = runs.len();

        info!(plan_id = %plan.id, plan = %plan, "Invalidation plan ready");
        histogram!(METRIC_PLAN_MS, "mode" => "full")
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        plan
    }

    /// Collect patterns only; no strategy path computation and no remote calls.
    pub fn patterns_only(registry: &StrategyRegistry, notification: &ChangeNotification) -> Self {
        let started_at = Instant::now();
        let mut plan = Self::empty(&notification.store_path);

        let runs = matching_strategies(registry, notification);
        for (attribute, strategy) in &runs {
            plan.patterns
                .extend(strategy.patterns(notification.identifiers(attribute)));
        }
        plan.strategy_runs = runs.len();

        info!(plan_id = %plan.id, plan = %plan, "Pattern plan ready");
        histogram!(METRIC_PLAN_MS, "mode" => "patterns")
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        plan
    }

    /// True when the store path itself is purged.
    pub fn is_full_store(&self) -> bool {
        self.paths.contains(&self.store_path)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.paths.is_empty()
    }

    pub fn into_report(self) -> InvalidationReport {
        InvalidationReport {
            id: self.id,
            full_store: self.is_full_store(),
            store_path: self.store_path,
            patterns: self.patterns.into_iter().collect(),
            paths: self.paths.into_iter().collect(),
            strategy_runs: self.strategy_runs,
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}

fn matching_strategies<'r, 'n>(
    registry: &'r StrategyRegistry,
    notification: &'n ChangeNotification,
) -> Vec<(&'n str, &'r dyn InvalidationStrategy)> {
    let mut runs = Vec::new();
    for attribute in notification.attributes() {
        let strategies = registry.strategies_for(attribute);
        if strategies.is_empty() {
            debug!(attribute, "No strategy registered for attribute");
        }
        runs.extend(strategies.iter().map(|strategy| (attribute, strategy.as_ref())));
    }
    runs
}

/// Normalize, dedupe and drop paths already covered by an ancestor in the set.
fn collapse_paths(paths: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    let normalized: BTreeSet<String> = paths
        .into_iter()
        .filter_map(|path| normalize_path(&path))
        .collect();

    let mut kept: BTreeSet<String> = BTreeSet::new();
    for path in normalized {
        if !kept.iter().any(|ancestor| covers(ancestor, &path)) {
            kept.insert(path);
        }
    }
    kept
}

/// Trim whitespace and trailing slashes; `None` for blank input.
fn normalize_path(path: &str) -> Option<String> {
    let trimmed = path.trim();
    match trimmed.trim_end_matches('/') {
        "" if trimmed.starts_with('/') => Some("/".to_string()),
        "" => None,
        path => Some(path.to_string()),
    }
}

fn covers(ancestor: &str, path: &str) -> bool {
    ancestor == "/"
        || path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use venia_cache_types::{CATEGORY_UIDS, CUSTOM_PRODUCT_SKUS};

    use super::*;
    use crate::application::categories::tests::StubGraphql;
    use crate::cache::config::CacheConfig;
    use crate::cache::navigation::tests::{HEADER_ROOT, StubResources};
    use crate::cache::pattern::{CATEGORY_UID_PREFIX, PRODUCT_SKU_PREFIX};

    const STORE: &str = "/content/venia/us/en";

    /// Returns fixed paths for its type.
    struct FixedPaths(&'static str, Vec<&'static str>);

    #[async_trait]
    impl InvalidationStrategy for FixedPaths {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn invalidation_type(&self) -> &str {
            self.0
        }

        fn patterns(&self, _identifiers: &[String]) -> Vec<String> {
            Vec::new()
        }

        async fn paths_to_invalidate(&self, _context: &InvalidationContext<'_>) -> Vec<String> {
            self.1.iter().map(|p| p.to_string()).collect()
        }
    }

    fn registry() -> StrategyRegistry {
        StrategyRegistry::from_config(&CacheConfig {
            header_fragment_root: HEADER_ROOT.into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn category_escalation_and_sku_patterns_merge() {
        let notification = ChangeNotification::new(STORE)
            .with_identifiers(CATEGORY_UIDS, ["cat-1"])
            .with_identifiers(CUSTOM_PRODUCT_SKUS, ["SKU1"]);
        let resources = StubResources::navigation(json!(2));
        let graphql = StubGraphql::levels(&[("cat-1", Some(1))]);
        let context = InvalidationContext::new(&notification, &resources, &graphql);

        let plan = InvalidationPlan::evaluate(&registry(), &context).await;

        assert_eq!(plan.strategy_runs, 2);
        assert!(plan.is_full_store());
        assert_eq!(plan.paths.iter().collect::<Vec<_>>(), [STORE]);
        assert!(plan.patterns.contains(&format!("{CATEGORY_UID_PREFIX}(cat-1)")));
        assert!(plan.patterns.contains(&format!("{PRODUCT_SKU_PREFIX}(SKU1)")));
    }

    #[tokio::test]
    async fn trailing_slash_store_path_still_reports_full_store() {
        let notification = ChangeNotification::new(format!("{STORE}/"))
            .with_identifiers(CATEGORY_UIDS, ["cat-1"]);
        let resources = StubResources::navigation(json!(2));
        let graphql = StubGraphql::levels(&[("cat-1", Some(1))]);
        let context = InvalidationContext::new(&notification, &resources, &graphql);

        let plan = InvalidationPlan::evaluate(&registry(), &context).await;

        assert_eq!(plan.store_path, STORE);
        assert_eq!(plan.paths.iter().collect::<Vec<_>>(), [STORE]);
        assert!(plan.is_full_store());
        assert!(plan.into_report().full_store);
    }

    #[tokio::test]
    async fn unknown_attributes_are_skipped() {
        let notification =
            ChangeNotification::new(STORE).with_identifiers("productSkus", ["SKU1"]);
        let resources = StubResources::default();
        let graphql = StubGraphql::levels(&[]);
        let context = InvalidationContext::new(&notification, &resources, &graphql);

        let plan = InvalidationPlan::evaluate(&registry(), &context).await;

        assert_eq!(plan.strategy_runs, 0);
        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn store_path_supersedes_sub_paths() {
        let mut registry = StrategyRegistry::new();
        registry.register(Arc::new(FixedPaths(
            CATEGORY_UIDS,
            vec!["/content/venia/us/en/products/a", "/content/venia/us/en-gb"],
        )));
        registry.register(Arc::new(FixedPaths(CATEGORY_UIDS, vec![STORE])));

        let notification = ChangeNotification::new(STORE).with_identifiers(CATEGORY_UIDS, ["c"]);
        let resources = StubResources::default();
        let graphql = StubGraphql::levels(&[]);
        let context = InvalidationContext::new(&notification, &resources, &graphql);

        let plan = InvalidationPlan::evaluate(&registry, &context).await;

        assert_eq!(
            plan.paths.iter().collect::<Vec<_>>(),
            [STORE, "/content/venia/us/en-gb"]
        );
        assert!(plan.is_full_store());
    }

    #[test]
    fn patterns_only_makes_no_calls() {
        let notification = ChangeNotification::new(STORE)
            .with_identifiers(CATEGORY_UIDS, ["c1", "c2"])
            .with_identifiers(CUSTOM_PRODUCT_SKUS, ["SKU1"]);

        let plan = InvalidationPlan::patterns_only(&registry(), &notification);

        assert_eq!(plan.patterns.len(), 2);
        assert!(plan.paths.is_empty());
        assert!(!plan.is_full_store());
    }

    #[test]
    fn collapse_normalizes_and_dedupes() {
        let paths = collapse_paths(
            ["/a/b/", "/a/b", " /c ", "", "/a/bc"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), ["/a/b", "/a/bc", "/c"]);
    }

    #[test]
    fn collapse_keeps_root_only() {
        let paths = collapse_paths(["/", "/a", "/b/c"].into_iter().map(String::from));
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), ["/"]);
    }

    #[test]
    fn report_carries_plan_content() {
        let mut plan = InvalidationPlan::empty(STORE);
        plan.paths.insert(STORE.to_string());
        plan.patterns.insert("p(a)".to_string());
        plan.strategy_runs = 1;
        let id = plan.id;

        let report = plan.into_report();

        assert_eq!(report.id, id);
        assert!(report.full_store);
        assert_eq!(report.paths, [STORE]);
        assert_eq!(report.patterns, ["p(a)"]);
    }

    #[test]
    fn display_format() {
        let plan = InvalidationPlan::empty(STORE);
        let display = format!("{plan}");
        assert!(display.contains("InvalidationPlan"));
        assert!(display.contains("paths: 0"));
    }
}

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, info, instrument};
use venia_cache_types::CATEGORY_UIDS;

use crate::application::categories::CategoryLevelQuery;
use crate::cache::config::CacheConfig;
use crate::cache::error::InvalidationError;
use crate::cache::navigation::NavigationDepthResolver;
use crate::cache::pattern::{CATEGORY_UID_PREFIX, build_pattern};
use crate::cache::strategy::{InvalidationContext, InvalidationStrategy, absorb};

const NAME: &str = "category_depth_escalation";
const METRIC_ESCALATIONS: &str = "venia_cache_escalations_total";

/// Category invalidation that escalates to the whole store when a changed category is
/// shallow enough to appear in the shared navigation fragment.
///
/// A category escalates when `level <= structureDepth + 1`. Categories the backend reports
/// without a level are ignored.
#[derive(Debug, Clone)]
pub struct CategoryDepthEscalationStrategy {
    navigation: NavigationDepthResolver,
    escalation_enabled: bool,
}

impl CategoryDepthEscalationStrategy {
    pub fn new(navigation: NavigationDepthResolver, escalation_enabled: bool) -> Self {
        Self {
            navigation,
            escalation_enabled,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.navigation_resolver(), config.escalation_enabled)
    }

    async fn decide(
        &self,
        context: &InvalidationContext<'_>,
    ) -> Result<Vec<String>, InvalidationError> {
        let notification = context.notification;
        let uids = notification.identifiers(CATEGORY_UIDS);
        if uids.is_empty() {
            return Err(InvalidationError::invalid_argument(
                "no category uids in notification",
            ));
        }
        if notification.store_path.trim().is_empty() {
            return Err(InvalidationError::invalid_argument(
                "notification has an empty store path",
            ));
        }
        if !self.escalation_enabled {
            debug!(strategy = NAME, "Escalation disabled by configuration");
            return Ok(Vec::new());
        }

        let depth = self
            .navigation
            .resolve(context.resources)
            .ok_or_else(|| InvalidationError::configuration_absent(self.navigation.path()))?;

        let levels = CategoryLevelQuery::fetch(context.graphql, uids).await;
        let threshold = u64::from(depth) + 1;

        let escalating = levels
            .iter()
            .filter_map(|category| category.level.map(|level| (category, level)))
            .find(|(_, level)| u64::from(*level) <= threshold);

        match escalating {
            Some((category, level)) => {
                info!(
                    strategy = NAME,
                    store_path = %notification.store_path,
                    category_uid = %category.uid,
                    level,
                    depth,
                    "Escalating to full store invalidation"
                );
                counter!(METRIC_ESCALATIONS).increment(1);
                Ok(vec![notification.store_path.clone()])
            }
            None => {
                debug!(
                    strategy = NAME,
                    resolved = levels.len(),
                    depth,
                    "No category within navigation depth"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl InvalidationStrategy for CategoryDepthEscalationStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn invalidation_type(&self) -> &str {
        CATEGORY_UIDS
    }

    fn patterns(&self, identifiers: &[String]) -> Vec<String> {
        absorb(
            NAME,
            build_pattern(CATEGORY_UID_PREFIX, identifiers).map(|pattern| vec![pattern]),
        )
    }

    #[instrument(skip_all, fields(strategy = NAME))]
    async fn paths_to_invalidate(&self, context: &InvalidationContext<'_>) -> Vec<String> {
        absorb(NAME, self.decide(context).await)
    }
}

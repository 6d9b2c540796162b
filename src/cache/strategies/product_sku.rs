use async_trait::async_trait;
use venia_cache_types::CUSTOM_PRODUCT_SKUS;

use crate::cache::pattern::{PRODUCT_SKU_PREFIX, build_pattern};
use crate::cache::strategy::{InvalidationContext, InvalidationStrategy, absorb};

/// Pattern-only invalidation for custom product SKUs.
///
/// Purging is left to the host's pattern scan, so no explicit paths are produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomProductSkuStrategy;

const NAME: &str = "custom_product_sku";

#[async_trait]
impl InvalidationStrategy for CustomProductSkuStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn invalidation_type(&self) -> &str {
        CUSTOM_PRODUCT_SKUS
    }

    fn patterns(&self, identifiers: &[String]) -> Vec<String> {
        absorb(
            NAME,
            build_pattern(PRODUCT_SKU_PREFIX, identifiers).map(|pattern| vec![pattern]),
        )
    }

    async fn paths_to_invalidate(&self, _context: &InvalidationContext<'_>) -> Vec<String> {
        Vec::new()
    }
}

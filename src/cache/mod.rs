//! Cache invalidation strategies.
//!
//! Decides which cached dispatcher and GraphQL fragments to purge when the commerce backend
//! reports changed categories or products:
//!
//! - **Patterns**: expressions the dispatcher's cache scanner matches against cached payloads
//! - **Paths**: explicit cache paths; the store path means the whole store is purged
//!
//! ## Configuration
//!
//! Strategy behavior is controlled via `venia-cache.toml`:
//!
//! ```toml
//! [invalidation]
//! header_fragment_root = "/content/experience-fragments/venia/us/en/site/header/master"
//! escalation_enabled = true
//! extension_types = []
//! ```

mod config;
mod error;
mod navigation;
mod pattern;
mod planner;
mod registry;
mod strategies;
mod strategy;

pub use config::CacheConfig;
pub use error::InvalidationError;
pub use navigation::{NAVIGATION_RELATIVE_PATH, NavigationDepthResolver, STRUCTURE_DEPTH_PROPERTY};
pub use pattern::{CATEGORY_UID_PREFIX, PRODUCT_SKU_PREFIX, build_pattern};
pub use planner::InvalidationPlan;
pub use registry::StrategyRegistry;
pub use strategies::{CategoryDepthEscalationStrategy, CustomProductSkuStrategy, NoOpStrategy};
pub use strategy::{InvalidationContext, InvalidationStrategy};

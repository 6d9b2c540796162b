//! Built-in invalidation strategies.

mod category_depth;
mod noop;
mod product_sku;

pub use category_depth::CategoryDepthEscalationStrategy;
pub use noop::NoOpStrategy;
pub use product_sku::CustomProductSkuStrategy;

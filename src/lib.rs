//! Cache invalidation planning for a Venia commerce storefront.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

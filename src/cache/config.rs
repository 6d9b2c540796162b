//! Invalidation configuration.
//!
//! Controls where the navigation depth is read from and which strategies are registered.

use serde::Deserialize;

use super::navigation::{NavigationDepthResolver, STRUCTURE_DEPTH_PROPERTY};

pub(crate) const DEFAULT_HEADER_FRAGMENT_ROOT: &str =
    "/content/experience-fragments/venia/us/en/site/header/master";

/// Invalidation configuration from `venia-cache.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root of the header experience fragment holding the navigation component.
    pub header_fragment_root: String,
    /// Navigation property carrying the structure depth.
    pub structure_depth_property: String,
    /// Allow category changes to escalate to full store invalidation.
    pub escalation_enabled: bool,
    /// Attribute types that get a no-op strategy as an extension point.
    pub extension_types: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            header_fragment_root: DEFAULT_HEADER_FRAGMENT_ROOT.to_string(),
            structure_depth_property: STRUCTURE_DEPTH_PROPERTY.to_string(),
            escalation_enabled: true,
            extension_types: Vec::new(),
        }
    }
}

impl From<&crate::config::InvalidationSettings> for CacheConfig {
    fn from(settings: &crate::config::InvalidationSettings) -> Self {
        Self {
            header_fragment_root: settings.header_fragment_root.clone(),
            structure_depth_property: settings.structure_depth_property.clone(),
            escalation_enabled: settings.escalation_enabled,
            extension_types: settings.extension_types.clone(),
        }
    }
}

impl CacheConfig {
    pub fn navigation_resolver(&self) -> NavigationDepthResolver {
        NavigationDepthResolver::new(&self.header_fragment_root, &self.structure_depth_property)
    }
}

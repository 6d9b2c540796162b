//! Shared types for the venia-cache invalidation planner.
//!
//! [`ChangeNotification`] is the inbound shape delivered by the commerce backend and
//! [`InvalidationReport`] is what the planner hands back to whoever executes the purge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Attribute key carrying changed category UIDs.
pub const CATEGORY_UIDS: &str = "categoryUids";
/// Attribute key carrying changed custom product SKUs.
pub const CUSTOM_PRODUCT_SKUS: &str = "customProductSkus";

/// A change notification for one store scope.
///
/// ```json
/// { "storePath": "/content/venia/us/en", "categoryUids": ["c1", "c2"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotification {
    /// Root content scope whose cached descendants are purged on full invalidation.
    pub store_path: String,
    /// Identifier lists keyed by attribute name.
    #[serde(flatten)]
    pub identifiers: BTreeMap<String, Vec<String>>,
}

impl ChangeNotification {
    pub fn new(store_path: impl Into<String>) -> Self {
        Self {
            store_path: store_path.into(),
            identifiers: BTreeMap::new(),
        }
    }

    /// Attach an identifier list under `attribute`, replacing any previous list.
    pub fn with_identifiers<I, S>(mut self, attribute: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers
            .insert(attribute.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    /// Identifiers for `attribute`; empty when the attribute is not present.
    pub fn identifiers(&self, attribute: &str) -> &[String] {
        self.identifiers
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Attribute keys that carry at least one identifier.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.identifiers
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(key, _)| key.as_str())
    }
}

/// Aggregated outcome of running every registered strategy against a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationReport {
    pub id: Uuid,
    pub store_path: String,
    /// True when the whole store scope is purged.
    pub full_store: bool,
    pub patterns: Vec<String>,
    pub paths: Vec<String>,
    pub strategy_runs: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

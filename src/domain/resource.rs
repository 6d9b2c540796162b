//! Content resources as seen through a resource resolver.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A single content node and its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    path: String,
    properties: Map<String, Value>,
}

impl Resource {
    pub fn new(path: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            properties,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw property value, if set.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Property converted to `T`; `None` when unset or not convertible.
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.property(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

//! File-backed content tree.
//!
//! Reads a JCR-style JSON export where nested objects are child resources and every other
//! value is a property of the enclosing resource:
//!
//! ```json
//! { "content": { "experience-fragments": { "header": {
//!     "jcr:content": { "root": { "navigation": { "structureDepth": 2 } } } } } } }
//! ```

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::application::repos::ResourceResolver;
use crate::domain::resource::Resource;

use super::error::InfraError;

#[derive(Debug, Clone)]
pub struct JsonResourceTree {
    root: Map<String, Value>,
}

impl JsonResourceTree {
    /// A tree without any resources; every lookup resolves to nothing.
    pub fn empty() -> Self {
        Self { root: Map::new() }
    }

    pub fn from_value(root: Value) -> Result<Self, InfraError> {
        match root {
            Value::Object(root) => Ok(Self { root }),
            other => Err(InfraError::content(format!(
                "content tree root must be a JSON object, found {}",
                kind(&other)
            ))),
        }
    }

    pub async fn load(path: &Path) -> Result<Self, InfraError> {
        let bytes = tokio::fs::read(path).await?;
        let root: Value = serde_json::from_slice(&bytes).map_err(|err| {
            InfraError::content(format!("failed to parse `{}`: {err}", path.display()))
        })?;
        debug!(path = %path.display(), "Content tree loaded");
        Self::from_value(root)
    }
}

impl ResourceResolver for JsonResourceTree {
    fn resolve(&self, path: &str) -> Option<Resource> {
        if !path.starts_with('/') {
            return None;
        }

        let mut node = &self.root;
        let mut segments = Vec::new();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            node = node.get(segment)?.as_object()?;
            segments.push(segment);
        }

        let properties = node
            .iter()
            .filter(|(_, value)| !value.is_object())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Resource::new(format!("/{}", segments.join("/")), properties))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

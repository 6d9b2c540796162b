//! Traits describing the host adapters the invalidation core consumes.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::resource::Resource;

/// Resolves content paths to resources.
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Option<Resource>;
}

#[derive(Debug, Error)]
pub enum GraphqlClientError {
    #[error("graphql transport error: {0}")]
    Transport(String),
    #[error("graphql endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode graphql response: {0}")]
    Decode(String),
    #[error("graphql client returned no response")]
    NoResponse,
}

impl GraphqlClientError {
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorEntry>>,
}

impl GraphqlResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// Errors reported by the endpoint; empty when none were sent.
    pub fn errors(&self) -> &[GraphqlErrorEntry] {
        self.errors.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphqlErrorEntry {
    #[serde(default)]
    pub message: String,
}

/// Executes GraphQL queries against the commerce backend.
#[async_trait]
pub trait GraphqlClient: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest)
    -> Result<GraphqlResponse, GraphqlClientError>;
}

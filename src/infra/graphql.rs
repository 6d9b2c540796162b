//! HTTP transport for the commerce GraphQL endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::application::repos::{GraphqlClient, GraphqlClientError, GraphqlRequest, GraphqlResponse};
use crate::config::GraphqlSettings;

use super::error::InfraError;

/// Header selecting the Magento store view.
const STORE_HEADER: &str = "Store";

#[derive(Debug, Clone)]
pub struct HttpGraphqlClient {
    client: Client,
    endpoint: Url,
    store_code: Option<String>,
}

impl HttpGraphqlClient {
    pub fn new(settings: &GraphqlSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build graphql client: {err}"))
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            store_code: settings.store_code.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("venia-cache/", env!("CARGO_PKG_VERSION"))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GraphqlClient for HttpGraphqlClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn execute(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse, GraphqlClientError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(store) = self.store_code.as_ref() {
            builder = builder.header(STORE_HEADER, store);
        }

        let response = builder.send().await.map_err(GraphqlClientError::transport)?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(GraphqlClientError::transport)?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "GraphQL response received");

        if !status.is_success() {
            return Err(GraphqlClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(GraphqlClientError::NoResponse);
        }

        serde_json::from_slice::<Option<GraphqlResponse>>(&bytes)
            .map_err(GraphqlClientError::decode)?
            .ok_or(GraphqlClientError::NoResponse)
    }
}

//! Category level lookup against the commerce GraphQL endpoint.

use metrics::counter;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::repos::{GraphqlClient, GraphqlRequest};
use crate::cache::InvalidationError;
use crate::domain::category::CategoryLevel;

const METRIC_STRATEGY_DEGRADED: &str = "venia_cache_strategy_degraded_total";

#[derive(Debug, Deserialize)]
struct CategoryListData {
    #[serde(rename = "categoryList", default)]
    category_list: Option<Vec<Option<CategoryLevel>>>,
}

/// Resolves hierarchy levels for a set of category UIDs.
pub struct CategoryLevelQuery;

impl CategoryLevelQuery {
    /// Build the `categoryList` query for `uids`.
    pub fn build_query(uids: &[String]) -> Result<String, InvalidationError> {
        if uids.is_empty() {
            return Err(InvalidationError::invalid_argument(
                "category uid list is empty",
            ));
        }
        let quoted = serde_json::to_string(uids)
            .map_err(|err| InvalidationError::invalid_argument(err.to_string()))?;
        Ok(format!(
            "{{categoryList(filters:{{category_uid:{{in:{quoted}}}}}){{uid level}}}}"
        ))
    }

    /// Fetch levels for `uids` with a single query.
    ///
    /// Every failure (no response, GraphQL errors, no data, null list) yields an empty vector.
    pub async fn fetch(client: &dyn GraphqlClient, uids: &[String]) -> Vec<CategoryLevel> {
        match Self::try_fetch(client, uids).await {
            Ok(levels) => {
                debug!(requested = uids.len(), resolved = levels.len(), "Category levels resolved");
                levels
            }
            Err(err) => {
                warn!(
                    error = %err,
                    reason = err.reason(),
                    requested = uids.len(),
                    "Category level query failed; treating as no result"
                );
                counter!(METRIC_STRATEGY_DEGRADED, "reason" => err.reason()).increment(1);
                Vec::new()
            }
        }
    }

    async fn try_fetch(
        client: &dyn GraphqlClient,
        uids: &[String],
    ) -> Result<Vec<CategoryLevel>, InvalidationError> {
        let query = Self::build_query(uids)?;
        let response = client
            .execute(&GraphqlRequest::new(query))
            .await
            .map_err(|err| InvalidationError::upstream(err.to_string()))?;

        if let Some(first) = response.errors().first() {
            return Err(InvalidationError::upstream(format!(
                "graphql returned {} error(s), first: {}",
                response.errors().len(),
                first.message
            )));
        }

        let data = response
            .data
            .ok_or_else(|| InvalidationError::upstream("response carries no data"))?;
        let data: CategoryListData = serde_json::from_value(data).map_err(|err| {
            InvalidationError::upstream(format!("failed to decode categoryList: {err}"))
        })?;

        data.category_list
            .map(|list| list.into_iter().flatten().collect())
            .ok_or_else(|| InvalidationError::upstream("categoryList is null"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::application::repos::{
        GraphqlClientError, GraphqlErrorEntry, GraphqlRequest, GraphqlResponse,
    };

    /// Replays a canned outcome and records every query it receives.
    pub(crate) struct StubGraphql {
        outcome: Box<dyn Fn() -> Result<GraphqlResponse, GraphqlClientError> + Send + Sync>,
        pub(crate) queries: Mutex<Vec<String>>,
    }

    impl StubGraphql {
        pub(crate) fn new(
            outcome: impl Fn() -> Result<GraphqlResponse, GraphqlClientError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                outcome: Box::new(outcome),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn levels(levels: &[(&str, Option<u32>)]) -> Self {
            let list: Vec<_> = levels
                .iter()
                .map(|(uid, level)| json!({ "uid": uid, "level": level }))
                .collect();
            let data = json!({ "categoryList": list });
            Self::new(move || Ok(GraphqlResponse::with_data(data.clone())))
        }

        pub(crate) fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GraphqlClient for StubGraphql {
        async fn execute(
            &self,
            request: &GraphqlRequest,
        ) -> Result<GraphqlResponse, GraphqlClientError> {
            self.queries.lock().unwrap().push(request.query.clone());
            (self.outcome)()
        }
    }

    fn uids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn query_filters_by_uid_and_selects_level() {
        let query = CategoryLevelQuery::build_query(&uids(&["c1", "c2"])).expect("query");
        assert_eq!(
            query,
            r#"{categoryList(filters:{category_uid:{in:["c1","c2"]}}){uid level}}"#
        );
    }

    #[test]
    fn query_quotes_hostile_uids() {
        let query = CategoryLevelQuery::build_query(&uids(&[r#"a"]}){x}"#])).expect("query");
        assert!(query.contains(r#"["a\"]}){x}"]"#));
    }

    #[test]
    fn empty_uid_list_is_rejected() {
        let err = CategoryLevelQuery::build_query(&[]).expect_err("empty list");
        assert!(matches!(err, InvalidationError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn fetch_returns_levels() {
        let client = StubGraphql::levels(&[("c1", Some(1)), ("c2", None)]);
        let levels = CategoryLevelQuery::fetch(&client, &uids(&["c1", "c2"])).await;

        assert_eq!(
            levels,
            vec![CategoryLevel::new("c1", Some(1)), CategoryLevel::new("c2", None)]
        );
        assert_eq!(client.query_count(), 1);
    }

    #[tokio::test]
    async fn fetch_skips_null_list_entries() {
        let client = StubGraphql::new(|| {
            Ok(GraphqlResponse::with_data(
                json!({ "categoryList": [null, { "uid": "c1", "level": 2 }] }),
            ))
        });
        let levels = CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await;
        assert_eq!(levels, vec![CategoryLevel::new("c1", Some(2))]);
    }

    #[tokio::test]
    async fn fetch_with_empty_uids_makes_no_call() {
        let client = StubGraphql::levels(&[("c1", Some(1))]);
        assert!(CategoryLevelQuery::fetch(&client, &[]).await.is_empty());
        assert_eq!(client.query_count(), 0);
    }

    #[tokio::test]
    async fn missing_response_yields_nothing() {
        let client = StubGraphql::new(|| Err(GraphqlClientError::NoResponse));
        assert!(CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await.is_empty());
    }

    #[tokio::test]
    async fn graphql_errors_yield_nothing() {
        let client = StubGraphql::new(|| {
            Ok(GraphqlResponse {
                data: Some(json!({ "categoryList": [{ "uid": "c1", "level": 1 }] })),
                errors: Some(vec![GraphqlErrorEntry {
                    message: "Internal server error".into(),
                }]),
            })
        });
        assert!(CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await.is_empty());
    }

    #[tokio::test]
    async fn missing_data_yields_nothing() {
        let client = StubGraphql::new(|| Ok(GraphqlResponse::default()));
        assert!(CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await.is_empty());
    }

    #[tokio::test]
    async fn null_category_list_yields_nothing() {
        let client =
            StubGraphql::new(|| Ok(GraphqlResponse::with_data(json!({ "categoryList": null }))));
        assert!(CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await.is_empty());
    }

    #[tokio::test]
    async fn empty_errors_array_is_not_a_failure() {
        let client = StubGraphql::new(|| {
            Ok(GraphqlResponse {
                data: Some(json!({ "categoryList": [{ "uid": "c1", "level": 3 }] })),
                errors: Some(Vec::new()),
            })
        });
        let levels = CategoryLevelQuery::fetch(&client, &uids(&["c1"])).await;
        assert_eq!(levels, vec![CategoryLevel::new("c1", Some(3))]);
    }
}

//! Shopify Admin API GraphQL client authenticated with an access token.
//!
//! This module provides the HTTP transport for typed Admin API operations,
//! plus the list loaders and update submitters built on top of it.

use std::future::Future;
use std::sync::Arc;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use shopdesk_core::{UpdateFailure, UpdateResult, UserError};
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
pub mod customers;
pub mod products;
pub mod queries;

#[cfg(test)]
pub(crate) mod testing;

/// Runs typed GraphQL operations against the Admin API.
///
/// [`AdminClient`] is the production implementation. Loaders and submitters
/// are generic over this trait so they can be exercised without a network.
pub trait GraphQLTransport: Send + Sync {
    /// Execute one operation and return its `data`.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-success HTTP statuses,
    /// timeouts, and responses carrying top-level GraphQL `errors`.
    fn execute<Q>(
        &self,
        variables: Q::Variables,
    ) -> impl Future<Output = Result<Q::ResponseData, AdminShopifyError>> + Send
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send;
}

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Security
///
/// This client carries an access token with HIGH PRIVILEGE access to the
/// store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    store: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// Every request made by the client is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                store: config.store.clone(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Get the GraphQL endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }
}

impl GraphQLTransport for AdminClient {
    #[instrument(skip_all, fields(store = %self.inner.store))]
    async fn execute<Q>(&self, variables: Q::Variables) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q: GraphQLQuery,
        Q::Variables: Send,
        Q::ResponseData: Send,
    {
        let body = Q::build_query(variables);
        tracing::debug!(operation = body.operation_name, "Sending Admin API request");

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        if !status.is_success() {
            return Err(AdminShopifyError::Status(status.as_u16()));
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;
        unwrap_response(graphql_response)
    }
}

/// Turn a GraphQL envelope into its data, or the errors it carries.
fn unwrap_response<T>(response: GraphQLResponse<T>) -> Result<T, AdminShopifyError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                locations: e
                    .locations
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: l.line,
                        column: l.column,
                    })
                    .collect(),
                path: e.path,
            })
            .collect();
        return Err(AdminShopifyError::GraphQL(converted_errors));
    }

    response
        .data
        .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
}

/// Fail with the first user error of a mutation payload, if there is one.
///
/// Any further errors are only logged.
fn reject_user_errors(operation: &str, errors: &[UserError]) -> UpdateResult<()> {
    let Some(failure) = UpdateFailure::from_user_errors(errors) else {
        return Ok(());
    };

    for ignored in errors.iter().skip(1) {
        tracing::debug!(
            operation,
            field = ?ignored.field,
            message = %ignored.message,
            "Additional user error not surfaced"
        );
    }
    tracing::info!(operation, message = %failure.message, "Mutation rejected by Shopify");

    Err(failure)
}

/// Classify a failed mutation call as a transport failure.
fn transport_failure(operation: &str, err: &AdminShopifyError) -> UpdateFailure {
    tracing::warn!(operation, error = %err, "Mutation request failed");
    UpdateFailure::transport(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopdesk_core::FailureKind;

    #[test]
    fn test_unwrap_response_returns_data() {
        let response: GraphQLResponse<serde_json::Value> =
            serde_json::from_value(json!({ "data": { "ok": true } })).unwrap();
        assert_eq!(unwrap_response(response).unwrap(), json!({ "ok": true }));
    }

    #[test]
    fn test_unwrap_response_surfaces_graphql_errors() {
        let response: GraphQLResponse<serde_json::Value> = serde_json::from_value(json!({
            "data": null,
            "errors": [{
                "message": "Throttled",
                "locations": [{ "line": 2, "column": 3 }]
            }]
        }))
        .unwrap();

        let err = unwrap_response(response).unwrap_err();
        let AdminShopifyError::GraphQL(errors) = err else {
            panic!("expected GraphQL error, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Throttled");
        assert_eq!(errors[0].locations[0].line, 2);
    }

    #[test]
    fn test_unwrap_response_without_data() {
        let response: GraphQLResponse<serde_json::Value> =
            serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            unwrap_response(response),
            Err(AdminShopifyError::GraphQL(_))
        ));
    }

    #[test]
    fn test_reject_user_errors_takes_first() {
        let errors = vec![
            UserError::new("Phone is invalid"),
            UserError::new("other"),
        ];
        let failure = reject_user_errors("customerUpdate", &errors).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.message, "Phone is invalid");

        assert!(reject_user_errors("customerUpdate", &[]).is_ok());
    }

    #[test]
    fn test_timeout_is_transport_failure() {
        let failure = transport_failure("customerUpdate", &AdminShopifyError::Timeout);
        assert_eq!(failure.kind, FailureKind::Transport);
        assert_eq!(failure.message, "Request to Shopify timed out");
    }
}

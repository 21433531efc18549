//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Shopify Admin API access token.** It can read and
//! write every customer and product in the store, so the binary must only be
//! reachable by store staff.
//!
//! # Architecture
//!
//! - `graphql_client::GraphQLQuery` types for each operation
//! - Direct API calls to Shopify (no local database sync)
//! - A [`GraphQLTransport`] seam so loaders and submitters run against a fake
//!   in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use shopdesk_admin::shopify::{AdminClient, admin::customers};
//! use shopdesk_core::PageArgs;
//!
//! let client = AdminClient::new(&config.shopify)?;
//! let page = customers::list_customers(&client, &PageArgs::first_page(5)).await?;
//! ```

pub mod admin;
pub mod types;

pub use admin::{AdminClient, GraphQLTransport};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request to Shopify timed out")]
    Timeout,

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but carried values we cannot represent.
    #[error("Invalid data from Shopify: {0}")]
    InvalidData(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Shopify answered with an unexpected HTTP status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for AdminShopifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// Error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A list query failed; the page the caller holds is unchanged.
#[derive(Debug, Error)]
#[error("Failed to load {resource}: {cause}")]
pub struct LoadError {
    /// Resource being listed ("customers", "products").
    pub resource: &'static str,
    /// Underlying API failure.
    #[source]
    pub cause: AdminShopifyError,
}

impl LoadError {
    pub(crate) const fn customers(cause: AdminShopifyError) -> Self {
        Self {
            resource: "customers",
            cause,
        }
    }

    pub(crate) const fn products(cause: AdminShopifyError) -> Self {
        Self {
            resource: "products",
            cause,
        }
    }
}

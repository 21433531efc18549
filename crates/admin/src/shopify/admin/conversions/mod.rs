//! Type conversions from GraphQL response types to domain types.
//!
//! Scalars arrive as strings; parsing them can fail, so every conversion
//! returns `AdminShopifyError::InvalidData` for a node it cannot represent.

mod customers;
mod products;

pub use customers::{convert_customer_connection, convert_customer_update};
pub use products::{convert_product_connection, convert_variant_update};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopdesk_core::types::id::GidError;

use crate::shopify::AdminShopifyError;

/// Parse an RFC 3339 `DateTime` scalar.
fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AdminShopifyError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AdminShopifyError::InvalidData(format!("{field} {value:?}: {e}")))
}

/// Parse a `Decimal`/`Money` scalar.
fn parse_decimal(field: &str, value: &str) -> Result<Decimal, AdminShopifyError> {
    value
        .parse::<Decimal>()
        .map_err(|e| AdminShopifyError::InvalidData(format!("{field} {value:?}: {e}")))
}

/// Describe an ID Shopify returned that does not fit its newtype.
fn invalid_id(field: &str, err: &GidError) -> AdminShopifyError {
    AdminShopifyError::InvalidData(format!("{field}: {err}"))
}

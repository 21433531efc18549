//! Domain types for Shopify Admin API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response types in `admin::queries`.

pub mod customer;
pub mod product;

pub use customer::*;
pub use product::*;

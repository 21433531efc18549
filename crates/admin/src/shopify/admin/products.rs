//! Product list loading and variant price updates for the Admin API.

use shopdesk_core::{Page, PageArgs, UpdateFailure, UpdateResult};
use tracing::instrument;

use super::{
    GraphQLTransport,
    conversions::{convert_product_connection, convert_variant_update},
    queries::{GetProducts, ProductVariantsBulkUpdate, get_products, product_variants_bulk_update},
    reject_user_errors, transport_failure,
};
use crate::shopify::LoadError;
use crate::shopify::types::{ProductRecord, VariantPriceUpdate, VariantPriceUpdated};

const NO_VARIANTS_RETURNED: &str = "No product variants returned from update";

/// Load one page of products with their first variants and image.
///
/// # Errors
///
/// Returns `LoadError` if the request fails or a node cannot be converted.
#[instrument(skip(api), fields(first = ?args.first, last = ?args.last))]
pub async fn list_products<T: GraphQLTransport>(
    api: &T,
    args: &PageArgs,
) -> Result<Page<ProductRecord>, LoadError> {
    let variables = get_products::Variables { page: args.clone() };

    let response = api
        .execute::<GetProducts>(variables)
        .await
        .map_err(LoadError::products)?;

    let page = convert_product_connection(response.products).map_err(LoadError::products)?;
    tracing::debug!(count = page.items.len(), "Loaded products");
    Ok(page)
}

/// Set the price of a single variant.
///
/// # Errors
///
/// Returns a validation failure carrying Shopify's first user error, or a
/// transport failure if the request fails or returns no variants.
#[instrument(
    skip(api),
    fields(product_id = %update.product_id, variant_id = %update.variant_id)
)]
pub async fn update_variant_price<T: GraphQLTransport>(
    api: &T,
    update: &VariantPriceUpdate,
) -> UpdateResult<VariantPriceUpdated> {
    let variables = product_variants_bulk_update::Variables {
        product_id: update.product_id.to_string(),
        variants: vec![product_variants_bulk_update::ProductVariantsBulkInput {
            id: update.variant_id.to_string(),
            price: update.price.to_string(),
        }],
    };

    let response = api
        .execute::<ProductVariantsBulkUpdate>(variables)
        .await
        .map_err(|e| transport_failure("productVariantsBulkUpdate", &e))?;

    let payload = response
        .product_variants_bulk_update
        .ok_or_else(|| UpdateFailure::transport(NO_VARIANTS_RETURNED))?;

    reject_user_errors("productVariantsBulkUpdate", &payload.user_errors)?;

    let variants = payload
        .product_variants
        .filter(|variants| !variants.is_empty())
        .ok_or_else(|| UpdateFailure::transport(NO_VARIANTS_RETURNED))?;

    convert_variant_update(update.product_id.clone(), variants)
        .map_err(|e| transport_failure("productVariantsBulkUpdate", &e))
}

//! Product type conversion functions.

use shopdesk_core::{Money, Page, ProductId, VariantId};

use crate::shopify::AdminShopifyError;
use crate::shopify::types::{
    PriceRange, ProductRecord, UpdatedVariant, VariantPriceUpdated, VariantRef,
};

use super::super::queries::{get_products, product_variants_bulk_update};
use super::{invalid_id, parse_decimal};

// =============================================================================
// GetProducts conversions
// =============================================================================

fn convert_money(
    field: &str,
    money: get_products::MoneyV2,
) -> Result<Money, AdminShopifyError> {
    Ok(Money::new(
        parse_decimal(field, &money.amount)?,
        money.currency_code,
    ))
}

fn convert_product(
    node: get_products::GetProductsProductsNodes,
) -> Result<ProductRecord, AdminShopifyError> {
    let id = ProductId::parse(&node.id).map_err(|e| invalid_id("product.id", &e))?;

    let price_range = PriceRange {
        min: convert_money("product.minVariantPrice", node.price_range_v2.min_variant_price)?,
        max: convert_money("product.maxVariantPrice", node.price_range_v2.max_variant_price)?,
    };

    // Without page info the list may be partial.
    let has_more_variants = node
        .variants
        .page_info
        .as_ref()
        .is_none_or(|info| info.has_next_page);

    let variants = node
        .variants
        .nodes
        .into_iter()
        .map(|v| {
            Ok(VariantRef {
                id: VariantId::parse(&v.id).map_err(|e| invalid_id("variant.id", &e))?,
                price: Some(parse_decimal("variant.price", &v.price)?),
            })
        })
        .collect::<Result<Vec<_>, AdminShopifyError>>()?;

    let image_url = node
        .media
        .nodes
        .into_iter()
        .find_map(|m| m.image)
        .map(|i| i.url);

    Ok(ProductRecord {
        id,
        title: node.title,
        price_range,
        variants,
        has_more_variants,
        image_url,
    })
}

/// Convert a products connection, keeping node order and page info verbatim.
pub fn convert_product_connection(
    connection: get_products::GetProductsProducts,
) -> Result<Page<ProductRecord>, AdminShopifyError> {
    let items = connection
        .nodes
        .into_iter()
        .map(convert_product)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, connection.page_info))
}

// =============================================================================
// ProductVariantsBulkUpdate conversions
// =============================================================================

pub fn convert_variant_update(
    product_id: ProductId,
    variants: Vec<product_variants_bulk_update::ProductVariantsBulkUpdateProductVariants>,
) -> Result<VariantPriceUpdated, AdminShopifyError> {
    let variants = variants
        .into_iter()
        .map(|v| {
            Ok(UpdatedVariant {
                id: VariantId::parse(&v.id).map_err(|e| invalid_id("variant.id", &e))?,
                price: parse_decimal("variant.price", &v.price)?,
            })
        })
        .collect::<Result<Vec<_>, AdminShopifyError>>()?;

    Ok(VariantPriceUpdated {
        product_id,
        variants,
    })
}

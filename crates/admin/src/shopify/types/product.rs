//! Product domain types for Shopify Admin API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::{Money, Price, ProductId, UpdateFailure, VariantId};

// =============================================================================
// Product Types
// =============================================================================

/// Lowest and highest variant price of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Cheapest variant price.
    pub min: Money,
    /// Most expensive variant price.
    pub max: Money,
}

/// A variant reference with its current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRef {
    /// Variant ID.
    pub id: VariantId,
    /// Current price in the shop currency.
    pub price: Option<Decimal>,
}

/// A product row in the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Shopify global ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// First variants of the product (up to 10).
    pub variants: Vec<VariantRef>,
    /// Whether Shopify holds variants beyond `variants`.
    pub has_more_variants: bool,
    /// URL of the first image in the product media.
    pub image_url: Option<String>,
}

impl ProductRecord {
    /// The variant edited when the admin changes "the" price.
    #[must_use]
    pub fn default_variant(&self) -> Option<&VariantRef> {
        self.variants.first()
    }

    /// Merge the prices echoed by a variant price update.
    ///
    /// With every variant loaded the price range is recomputed from them.
    /// Otherwise the new prices only widen Shopify's range; a narrower range
    /// shows up on the next load.
    pub fn apply(&mut self, update: &VariantPriceUpdated) {
        if self.id != update.product_id {
            return;
        }

        for updated in &update.variants {
            if let Some(variant) = self.variants.iter_mut().find(|v| v.id == updated.id) {
                variant.price = Some(updated.price);
            }
        }

        if self.has_more_variants {
            for updated in &update.variants {
                let range = &mut self.price_range;
                range.min.amount = range.min.amount.min(updated.price);
                range.max.amount = range.max.amount.max(updated.price);
            }
            return;
        }

        let prices = self.variants.iter().filter_map(|v| v.price);
        if let Some(min) = prices.clone().min() {
            self.price_range.min.amount = min;
        }
        if let Some(max) = prices.max() {
            self.price_range.max.amount = max;
        }
    }
}

// =============================================================================
// Update Types
// =============================================================================

/// Request to change the price of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceUpdate {
    /// Product owning the variant.
    pub product_id: ProductId,
    /// Variant to update.
    pub variant_id: VariantId,
    /// New price.
    pub price: Price,
}

impl VariantPriceUpdate {
    /// Build an update from untrusted form input.
    ///
    /// # Errors
    ///
    /// Returns a validation failure if either ID is malformed or the price
    /// is not a valid amount.
    pub fn parse(product_id: &str, variant_id: &str, price: &str) -> Result<Self, UpdateFailure> {
        let product_id = ProductId::parse(product_id)
            .map_err(|e| UpdateFailure::validation(format!("Invalid product id: {e}")))?;
        let variant_id = VariantId::parse(variant_id)
            .map_err(|e| UpdateFailure::validation(format!("Invalid variant id: {e}")))?;
        let price = Price::parse(price)
            .map_err(|e| UpdateFailure::validation(format!("Invalid price: {e}")))?;

        Ok(Self {
            product_id,
            variant_id,
            price,
        })
    }
}

/// A variant price echoed by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Price now stored by Shopify.
    pub price: Decimal,
}

/// Fields echoed back by a successful variant price update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPriceUpdated {
    /// Product owning the variants.
    pub product_id: ProductId,
    /// Updated variants.
    pub variants: Vec<UpdatedVariant>,
}

//! Products list and price edit handlers.

use askama::Template;
use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{
    PageLinks, PageQuery, Step, UpdateForm, decode_update, jump, render_html, step, wants_json,
};
use crate::{
    error::AppError,
    middleware::BrowserKey,
    services::PageBrowser,
    shopify::{ProductRecord, VariantPriceUpdate, admin::products::update_variant_price},
    state::AppState,
};

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    /// Minimum variant price with currency symbol.
    pub price: String,
    /// Minimum variant price as entered in the edit form.
    pub price_value: String,
    pub image_url: String,
    /// Variant edited by the price form; empty when the product has none.
    pub variant_id: String,
}

impl From<&ProductRecord> for ProductView {
    fn from(product: &ProductRecord) -> Self {
        let min = &product.price_range.min;

        Self {
            id: product.id.as_str().to_string(),
            title: product.title.clone(),
            price: min.display(),
            price_value: min.amount.round_dp(2).to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            variant_id: product
                .default_variant()
                .map(|v| v.id.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: String,
    pub products: Vec<ProductView>,
    pub links: PageLinks,
}

/// Render the browser's current page as HTML or JSON.
fn render(browser: &PageBrowser<ProductRecord>, headers: &HeaderMap) -> Result<Response, AppError> {
    let page = browser
        .page()
        .ok_or_else(|| AppError::Internal("product page missing after load".to_string()))?;

    if wants_json(headers) {
        return Ok(Json(page).into_response());
    }

    let template = ProductsIndexTemplate {
        current_path: "/products".to_string(),
        products: page.items.iter().map(ProductView::from).collect(),
        links: PageLinks::new(
            "/products",
            &page.page_info,
            browser.navigator().page_size(),
        ),
    };
    Ok(render_html(&template).into_response())
}

/// Products list page handler.
#[instrument(skip(state, headers))]
pub async fn index(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let browser = jump(state.products(), state.shopify(), key, &query).await?;
    render(&browser, &headers)
}

/// Next page of the session's product list.
#[instrument(skip(state, headers))]
pub async fn next(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = step(state.products(), state.shopify(), key, Step::Next).await?;
    render(&browser, &headers)
}

/// Previous page of the session's product list.
#[instrument(skip(state, headers))]
pub async fn previous(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = step(state.products(), state.shopify(), key, Step::Previous).await?;
    render(&browser, &headers)
}

/// A price as posted by the page script: `"19.99"` or `19.99`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// JSON payload of the price edit form.
#[derive(Debug, Deserialize)]
pub struct ProductUpdatePayload {
    /// Product ID.
    pub id: String,
    #[serde(alias = "variantId")]
    pub variant_id: String,
    pub price: PriceInput,
}

/// Update the price of one product variant.
///
/// On success the echoed price is merged into the session's held page, and
/// `minPrice` carries the product's display price after the merge (null when
/// the product is not on that page).
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    form: Result<Form<UpdateForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let payload: ProductUpdatePayload = decode_update(form)?;
    let update =
        VariantPriceUpdate::parse(&payload.id, &payload.variant_id, &payload.price.as_text())?;

    let _edit = state
        .variant_edits()
        .try_acquire(update.variant_id.clone())
        .ok_or_else(|| {
            AppError::Conflict("An update for this variant is already in progress".to_string())
        })?;

    let updated = update_variant_price(state.shopify(), &update).await?;

    let mut min_price = None;
    match state.products().try_lock(key).await {
        Ok(mut browser) => {
            for record in browser.records_mut() {
                record.apply(&updated);
                if record.id == updated.product_id {
                    min_price = Some(record.price_range.min.display());
                }
            }
        }
        Err(busy) => tracing::debug!(error = %busy, "Skipped merging price update"),
    }

    Ok(Json(json!({
        "success": true,
        "updatedProduct": updated,
        "minPrice": min_price,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::{PriceRange, VariantRef};
    use rust_decimal::Decimal;
    use shopdesk_core::{Money, ProductId, VariantId};

    fn record() -> ProductRecord {
        let min = Money::new(Decimal::new(1950, 2), "USD");
        let max = Money::new(Decimal::new(2500, 2), "USD");
        ProductRecord {
            id: ProductId::parse("7").unwrap(),
            title: "Pineapple Tee".to_string(),
            price_range: PriceRange { min, max },
            variants: vec![VariantRef {
                id: VariantId::parse("70").unwrap(),
                price: Some(Decimal::new(1950, 2)),
            }],
            has_more_variants: false,
            image_url: Some("https://cdn.example.com/tee.png".to_string()),
        }
    }

    #[test]
    fn test_view_prefills_min_price() {
        let view = ProductView::from(&record());
        assert_eq!(view.price_value, "19.50");
        assert_eq!(view.variant_id, "gid://shopify/ProductVariant/70");
        assert_eq!(view.image_url, "https://cdn.example.com/tee.png");
    }

    #[test]
    fn test_view_without_variants() {
        let mut product = record();
        product.variants.clear();
        product.image_url = None;
        let view = ProductView::from(&product);
        assert!(view.variant_id.is_empty());
        assert!(view.image_url.is_empty());
    }

    #[test]
    fn test_template_renders_headings() {
        let template = ProductsIndexTemplate {
            current_path: "/products".to_string(),
            products: vec![ProductView::from(&record())],
            links: PageLinks {
                previous: "/products?cursor=p11&direction=before".to_string(),
                next: String::new(),
            },
        };
        let html = template.render().unwrap();
        for heading in ["Title", "Price", "Image", "Action"] {
            assert!(html.contains(heading), "missing {heading}");
        }
        assert!(html.contains("Pineapple Tee"));
        assert!(html.contains("value=\"19.50\""));
        assert!(html.contains("href=\"/products?cursor=p11&amp;direction=before\""));
        assert!(html.contains("<span class=\"disabled\">Next &rarr;</span>"));
    }

    #[test]
    fn test_payload_accepts_string_or_number_price() {
        let payload: ProductUpdatePayload = serde_json::from_str(
            r#"{"id": "7", "variant_id": "70", "price": "12.00"}"#,
        )
        .unwrap();
        assert_eq!(payload.price.as_text(), "12.00");

        let payload: ProductUpdatePayload =
            serde_json::from_str(r#"{"id": "7", "variantId": "70", "price": 12.5}"#).unwrap();
        assert_eq!(payload.price.as_text(), "12.5");
        assert_eq!(payload.variant_id, "70");
    }

    #[test]
    fn test_payload_requires_variant_id() {
        let result =
            serde_json::from_str::<ProductUpdatePayload>(r#"{"id": "7", "price": "12.00"}"#);
        assert!(result.is_err());
    }
}

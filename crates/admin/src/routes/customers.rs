//! Customers list and phone edit handlers.

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
    shopify::{
        CustomerPhoneUpdate, CustomerRecord, admin::customers::update_customer_phone,
    },
    state::AppState,
};

/// Customer view for templates.
#[derive(Debug, Clone)]
pub struct CustomerView {
    pub id: String,
    pub name: String,
    /// Phone number; empty renders as "N/A".
    pub phone: String,
    pub email: String,
}

impl From<&CustomerRecord> for CustomerView {
    fn from(customer: &CustomerRecord) -> Self {
        Self {
            id: customer.id.as_str().to_string(),
            name: customer.display_name(),
            phone: customer.phone.clone().unwrap_or_default(),
            email: customer.email.clone().unwrap_or_default(),
        }
    }
}

/// Customers list page template.
#[derive(Template)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub current_path: String,
    pub customers: Vec<CustomerView>,
    pub links: PageLinks,
}

/// Render the browser's current page as HTML or JSON.
fn render(
    browser: &PageBrowser<CustomerRecord>,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let page = browser
        .page()
        .ok_or_else(|| AppError::Internal("customer page missing after load".to_string()))?;

    if wants_json(headers) {
        return Ok(Json(page).into_response());
    }

    let template = CustomersIndexTemplate {
        current_path: "/customers".to_string(),
        customers: page.items.iter().map(CustomerView::from).collect(),
        links: PageLinks::new(
            "/customers",
            &page.page_info,
            browser.navigator().page_size(),
        ),
    };
    Ok(render_html(&template).into_response())
}

/// Customers list page handler.
#[instrument(skip(state, headers))]
pub async fn index(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let browser = jump(state.customers(), state.shopify(), key, &query).await?;
    render(&browser, &headers)
}

/// Next page of the session's customer list.
#[instrument(skip(state, headers))]
pub async fn next(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = step(state.customers(), state.shopify(), key, Step::Next).await?;
    render(&browser, &headers)
}

/// Previous page of the session's customer list.
#[instrument(skip(state, headers))]
pub async fn previous(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let browser = step(state.customers(), state.shopify(), key, Step::Previous).await?;
    render(&browser, &headers)
}

/// JSON payload of the phone edit form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdatePayload {
    pub customer_id: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Update a customer's phone number.
///
/// On success the echoed phone is merged into the session's held page.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    BrowserKey(key): BrowserKey,
    form: Result<Form<UpdateForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let payload: CustomerUpdatePayload = decode_update(form)?;
    let update =
        CustomerPhoneUpdate::parse(&payload.customer_id, payload.phone.as_deref().unwrap_or(""))?;

    let _edit = state
        .customer_edits()
        .try_acquire(update.customer_id.clone())
        .ok_or_else(|| {
            AppError::Conflict("An update for this customer is already in progress".to_string())
        })?;

    let updated = update_customer_phone(state.shopify(), &update).await?;

    match state.customers().try_lock(key).await {
        Ok(mut browser) => {
            for record in browser.records_mut() {
                record.apply(&updated);
            }
        }
        Err(busy) => tracing::debug!(error = %busy, "Skipped merging phone update"),
    }

    Ok(Json(json!({
        "success": true,
        "updatedCustomer": updated,
    })))
}

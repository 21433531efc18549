//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Customers
//! GET  /customers              - Customer page (?cursor=&direction=after|before)
//! GET  /customers/next         - Next page of this session's customer list
//! GET  /customers/previous     - Previous page of this session's customer list
//! POST /customers/update       - Update a phone number (form field `data`)
//!
//! # Products
//! GET  /products               - Product page (?cursor=&direction=after|before)
//! GET  /products/next          - Next page of this session's product list
//! GET  /products/previous      - Previous page of this session's product list
//! POST /products/update        - Update a variant price (form field `data`)
//! ```
//!
//! Page handlers render HTML, or `{items, pageInfo}` JSON when the request
//! sends `Accept: application/json`. HTML pages link to their neighbours
//! with the page's own cursors, so a stale tab keeps paging from where it is.

use askama::Template;
use axum::{
    Router,
    extract::rejection::FormRejection,
    http::{HeaderMap, header},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, de::DeserializeOwned};
use shopdesk_core::{Cursor, Direction, PageArgs, PageInfo};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::{BrowserRegistry, Listing, PageBrowser};
use crate::shopify::GraphQLTransport;
use crate::state::AppState;

pub mod customers;
pub mod products;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Customers
        .route("/customers", get(customers::index))
        .route("/customers/next", get(customers::next))
        .route("/customers/previous", get(customers::previous))
        .route("/customers/update", post(customers::update))
        // Products
        .route("/products", get(products::index))
        .route("/products/next", get(products::next))
        .route("/products/previous", get(products::previous))
        .route("/products/update", post(products::update))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Shared Extractors
// =============================================================================

/// Explicit page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub direction: Option<String>,
}

impl PageQuery {
    /// Resolve the cursor and direction of the requested page.
    ///
    /// An empty cursor means the first page; a missing direction means
    /// `after`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown direction.
    pub fn resolve(&self) -> Result<(Option<Cursor>, Direction), AppError> {
        let direction = match self.direction.as_deref() {
            None | Some("") => Direction::default(),
            Some(value) => value.parse()?,
        };
        Ok((Cursor::from_param(self.cursor.as_deref()), direction))
    }
}

/// Edit form posted by the page script: one field holding a JSON payload.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub data: String,
}

/// Decode the JSON payload of an edit form.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the form or its payload is malformed.
pub fn decode_update<T: DeserializeOwned>(
    form: Result<axum::Form<UpdateForm>, FormRejection>,
) -> Result<T, AppError> {
    let axum::Form(form) =
        form.map_err(|e| AppError::BadRequest(format!("Invalid form: {}", e.body_text())))?;
    serde_json::from_str(&form.data)
        .map_err(|e| AppError::BadRequest(format!("Invalid update payload: {e}")))
}

/// Whether the client asked for JSON instead of HTML.
#[must_use]
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Render an askama template, logging render failures.
pub fn render_html(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Links to the neighbours of a rendered page; empty when there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: String,
    pub next: String,
}

impl PageLinks {
    /// Links from `page_info`'s cursors, addressed to the list at `path`.
    #[must_use]
    pub fn new(path: &str, page_info: &PageInfo, page_size: u32) -> Self {
        Self {
            previous: page_href(path, page_info.previous_args(page_size).as_ref()),
            next: page_href(path, page_info.next_args(page_size).as_ref()),
        }
    }
}

/// `path?cursor=..&direction=..` for the page `args` address.
fn page_href(path: &str, args: Option<&PageArgs>) -> String {
    args.and_then(PageArgs::cursor)
        .map(|(cursor, direction)| {
            format!(
                "{path}?cursor={}&direction={direction}",
                urlencoding::encode(cursor.as_str())
            )
        })
        .unwrap_or_default()
}

// =============================================================================
// Session Navigation
// =============================================================================

/// Relative move within a session's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Move a session's browser one page, loading the first page if it has none.
///
/// A move past either end keeps the current page without a request.
///
/// # Errors
///
/// Returns `Conflict` if the browser is busy and `Load` if the request fails.
pub async fn step<R: Listing, T: GraphQLTransport>(
    registry: &BrowserRegistry<R>,
    api: &T,
    key: Uuid,
    towards: Step,
) -> Result<OwnedMutexGuard<PageBrowser<R>>, AppError> {
    let mut browser = registry.try_lock(key).await?;

    if browser.page().is_none() {
        browser.reload(api).await?;
        return Ok(browser);
    }

    let moved = match towards {
        Step::Next => browser.next(api).await?,
        Step::Previous => browser.previous(api).await?,
    };
    if !moved {
        tracing::debug!(resource = R::RESOURCE, ?towards, "No page in that direction");
    }

    Ok(browser)
}

/// Load an explicitly addressed page into a session's browser.
///
/// # Errors
///
/// Same as [`step`].
pub async fn jump<R: Listing, T: GraphQLTransport>(
    registry: &BrowserRegistry<R>,
    api: &T,
    key: Uuid,
    query: &PageQuery,
) -> Result<OwnedMutexGuard<PageBrowser<R>>, AppError> {
    let (cursor, direction) = query.resolve()?;
    let mut browser = registry.try_lock(key).await?;
    browser.jump(api, cursor, direction).await?;
    Ok(browser)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use serde_json::Value;

    fn query(cursor: Option<&str>, direction: Option<&str>) -> PageQuery {
        PageQuery {
            cursor: cursor.map(String::from),
            direction: direction.map(String::from),
        }
    }

    #[test]
    fn test_page_query_defaults() {
        let (cursor, direction) = query(None, None).resolve().unwrap();
        assert!(cursor.is_none());
        assert_eq!(direction, Direction::After);

        let (cursor, _) = query(Some(""), Some("before")).resolve().unwrap();
        assert!(cursor.is_none());
    }

    #[test]
    fn test_page_query_before() {
        let (cursor, direction) = query(Some("abc"), Some("before")).resolve().unwrap();
        assert_eq!(cursor.unwrap().as_str(), "abc");
        assert_eq!(direction, Direction::Before);
    }

    #[test]
    fn test_page_query_rejects_unknown_direction() {
        let err = query(Some("abc"), Some("sideways")).resolve().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_page_links_use_page_cursors() {
        let info = PageInfo {
            has_next_page: true,
            has_previous_page: true,
            start_cursor: Some(Cursor::new("c6")),
            end_cursor: Some(Cursor::new("eyJpZCI6MTB9+/=")),
        };
        let links = PageLinks::new("/customers", &info, 5);
        assert_eq!(links.previous, "/customers?cursor=c6&direction=before");
        assert_eq!(
            links.next,
            "/customers?cursor=eyJpZCI6MTB9%2B%2F%3D&direction=after"
        );
    }

    #[test]
    fn test_page_links_empty_at_the_ends() {
        let info = PageInfo {
            has_next_page: false,
            has_previous_page: false,
            start_cursor: Some(Cursor::new("c1")),
            end_cursor: Some(Cursor::new("c5")),
        };
        assert_eq!(PageLinks::new("/products", &info, 10), PageLinks::default());
    }

    #[test]
    fn test_decode_update() {
        let form = UpdateForm {
            data: r#"{"a": 1}"#.to_string(),
        };
        let value: Value = decode_update(Ok(axum::Form(form))).unwrap();
        assert_eq!(value["a"], 1);

        let form = UpdateForm {
            data: "not json".to_string(),
        };
        let err = decode_update::<Value>(Ok(axum::Form(form))).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_wants_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }
}

//! End-to-end test harness for Shopdesk admin.
//!
//! [`FakeShopify`] is an axum server on an ephemeral port that answers the
//! Admin GraphQL endpoint from a queue of canned replies and records every
//! request body. [`TestAdmin`] runs the real admin router against it and
//! hands out a cookie-carrying `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopdesk-integration-tests
//! ```

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use shopdesk_admin::config::{AdminConfig, PaginationConfig, ShopifyAdminConfig};
use shopdesk_admin::state::AppState;
use url::Url;

/// Access token the fake upstream expects.
pub const TEST_ACCESS_TOKEN: &str = "shpat_integration_test_token";

/// API version used by the test admin.
pub const TEST_API_VERSION: &str = "2026-01";

// =============================================================================
// Fake Shopify upstream
// =============================================================================

/// One canned upstream reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// `200 {"data": ...}`.
    Data(Value),
    /// `200 {"errors": [{"message": ...}]}`.
    Errors(Vec<String>),
    /// Bare HTTP status with an empty body.
    Status(u16),
    /// `200 {"data": ...}` after a delay.
    Delayed(Duration, Value),
}

#[derive(Default)]
struct Upstream {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Value>>,
}

/// A fake Shopify Admin GraphQL endpoint.
pub struct FakeShopify {
    origin: String,
    upstream: Arc<Upstream>,
}

impl FakeShopify {
    /// Start the fake upstream on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let upstream = Arc::new(Upstream::default());
        let app = Router::new()
            .route("/admin/api/{version}/graphql.json", post(graphql))
            .with_state(Arc::clone(&upstream));

        let addr = serve(app).await;
        Self {
            origin: format!("http://{addr}"),
            upstream,
        }
    }

    /// Origin to configure as `SHOPIFY_ADMIN_API_URL`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Queue a reply for the next request.
    pub fn push(&self, reply: Reply) -> &Self {
        self.upstream
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Queue a `data` reply for the next request.
    pub fn push_data(&self, data: Value) -> &Self {
        self.push(Reply::Data(data))
    }

    /// Request bodies received so far (`{query, variables, operationName}`).
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.upstream
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Variables of the most recent request.
    ///
    /// # Panics
    ///
    /// Panics if no request has been received.
    #[must_use]
    pub fn last_variables(&self) -> Value {
        self.requests()
            .last()
            .map(|body| body["variables"].clone())
            .expect("no upstream request recorded")
    }
}

async fn graphql(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let token = headers
        .get("X-Shopify-Access-Token")
        .and_then(|value| value.to_str().ok());
    if token != Some(TEST_ACCESS_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    upstream
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body);
    let reply = upstream
        .replies
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front();

    match reply {
        Some(Reply::Data(data)) => Json(json!({ "data": data })).into_response(),
        Some(Reply::Errors(messages)) => {
            let errors: Vec<Value> = messages
                .iter()
                .map(|message| json!({ "message": message }))
                .collect();
            Json(json!({ "errors": errors })).into_response()
        }
        Some(Reply::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Reply::Delayed(delay, data)) => {
            tokio::time::sleep(delay).await;
            Json(json!({ "data": data })).into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no reply queued").into_response(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

// =============================================================================
// Admin under test
// =============================================================================

/// The real admin router served against a [`FakeShopify`].
pub struct TestAdmin {
    base_url: String,
    client: reqwest::Client,
}

impl TestAdmin {
    /// Serve the admin with the given page sizes and a 500ms upstream timeout.
    ///
    /// # Panics
    ///
    /// Panics if the admin cannot be started.
    pub async fn start(upstream: &FakeShopify, pagination: PaginationConfig) -> Self {
        let config = test_config(upstream, pagination);
        let state = AppState::new(config).expect("Failed to build admin state");
        let addr = serve(shopdesk_admin::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    /// Absolute URL for an admin path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Session-carrying client.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET a page as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get_json(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("Failed to send request")
    }

    /// GET a page as HTML.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent or the body cannot be read.
    pub async fn get_html(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
            .text()
            .await
            .expect("Failed to read response")
    }

    /// POST an edit form whose `data` field holds `payload`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_update(&self, path: &str, payload: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(&[("data", payload.to_string())])
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Admin configuration pointing at the fake upstream.
///
/// # Panics
///
/// Panics if the upstream origin is not a valid URL.
#[must_use]
pub fn test_config(upstream: &FakeShopify, pagination: PaginationConfig) -> AdminConfig {
    AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: None,
        shopify: ShopifyAdminConfig {
            store: "shopdesk-test.myshopify.com".to_string(),
            api_version: TEST_API_VERSION.to_string(),
            access_token: SecretString::from(TEST_ACCESS_TOKEN.to_string()),
            api_url: Some(Url::parse(upstream.origin()).expect("valid upstream origin")),
            timeout: Duration::from_millis(500),
        },
        pagination,
        json_logs: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Response fixtures
// =============================================================================

/// A customer node as returned by `customers`.
#[must_use]
pub fn customer_node(n: u32, phone: Option<&str>) -> Value {
    json!({
        "id": format!("gid://shopify/Customer/{n}"),
        "firstName": "Customer",
        "lastName": n.to_string(),
        "email": format!("customer{n}@example.com"),
        "phone": phone,
        "createdAt": "2025-03-01T12:00:00Z",
        "updatedAt": "2025-03-02T12:00:00Z",
        "numberOfOrders": "2"
    })
}

/// A `customers` connection page with cursors `c<first>`..`c<last>`.
#[must_use]
pub fn customers_page(ids: &[u32], has_next: bool, has_previous: bool) -> Value {
    let nodes: Vec<Value> = ids.iter().map(|n| customer_node(*n, None)).collect();
    json!({ "customers": connection(nodes, ids, "c", has_next, has_previous) })
}

/// A product node with one variant priced at `price`.
#[must_use]
pub fn product_node(n: u32, price: &str) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{n}"),
        "title": format!("Product {n}"),
        "priceRangeV2": {
            "minVariantPrice": { "amount": price, "currencyCode": "USD" },
            "maxVariantPrice": { "amount": price, "currencyCode": "USD" }
        },
        "variants": {
            "nodes": [{ "id": format!("gid://shopify/ProductVariant/{n}0"), "price": price }],
            "pageInfo": { "hasNextPage": false }
        },
        "media": {
            "nodes": [{ "image": { "url": format!("https://cdn.example.com/{n}.png") } }]
        }
    })
}

/// A `products` connection page with cursors `p<first>`..`p<last>`.
#[must_use]
pub fn products_page(ids: &[u32], has_next: bool, has_previous: bool) -> Value {
    let nodes: Vec<Value> = ids.iter().map(|n| product_node(*n, "10.00")).collect();
    json!({ "products": connection(nodes, ids, "p", has_next, has_previous) })
}

fn connection(
    nodes: Vec<Value>,
    ids: &[u32],
    prefix: &str,
    has_next: bool,
    has_previous: bool,
) -> Value {
    json!({
        "nodes": nodes,
        "pageInfo": {
            "hasNextPage": has_next,
            "hasPreviousPage": has_previous,
            "startCursor": ids.first().map(|n| format!("{prefix}{n}")),
            "endCursor": ids.last().map(|n| format!("{prefix}{n}"))
        }
    })
}

/// A `customerUpdate` payload.
#[must_use]
pub fn customer_update(id: u32, phone: Option<&str>, user_errors: &[&str]) -> Value {
    let customer = user_errors
        .is_empty()
        .then(|| json!({ "id": format!("gid://shopify/Customer/{id}"), "phone": phone }));
    json!({
        "customerUpdate": {
            "customer": customer,
            "userErrors": user_errors_json(user_errors)
        }
    })
}

/// A `productVariantsBulkUpdate` payload.
#[must_use]
pub fn variant_update(product: u32, variant: u32, price: &str, user_errors: &[&str]) -> Value {
    let variants = user_errors.is_empty().then(|| {
        json!([{ "id": format!("gid://shopify/ProductVariant/{variant}"), "price": price }])
    });
    json!({
        "productVariantsBulkUpdate": {
            "product": { "id": format!("gid://shopify/Product/{product}") },
            "productVariants": variants,
            "userErrors": user_errors_json(user_errors)
        }
    })
}

/// The `href` of the pagination link labelled `label`, unescaped.
///
/// # Panics
///
/// Panics if the page has no such link.
#[must_use]
pub fn link_href(html: &str, label: &str) -> String {
    html.split("<a href=\"")
        .skip(1)
        .find_map(|anchor| {
            let (href, rest) = anchor.split_once('"')?;
            let text = rest.split("</a>").next()?;
            text.contains(label).then(|| href.replace("&amp;", "&"))
        })
        .expect("no pagination link with that label")
}

fn user_errors_json(messages: &[&str]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| json!({ "field": ["input"], "message": message }))
        .collect()
}

//! Integration tests for admin customer browsing and phone updates.
//!
//! Each test serves the real admin router against a fake Shopify upstream.
//!
//! Run with: cargo test -p shopdesk-integration-tests

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use shopdesk_admin::config::PaginationConfig;
use shopdesk_integration_tests::{
    FakeShopify, Reply, TestAdmin, customer_node, customer_update, customers_page, link_href,
};

const PAGE_SIZES: PaginationConfig = PaginationConfig {
    customers: 5,
    products: 10,
};

async fn setup() -> (FakeShopify, TestAdmin) {
    let shopify = FakeShopify::start().await;
    let admin = TestAdmin::start(&shopify, PAGE_SIZES).await;
    (shopify, admin)
}

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("Failed to parse JSON body")
}

// ============================================================================
// List & Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_first_page_then_next_follows_end_cursor() {
    let (shopify, admin) = setup().await;

    let mut first = customers_page(&[1, 2, 3, 4, 5], true, false);
    first["customers"]["pageInfo"]["endCursor"] = json!("abc");
    shopify.push_data(first);
    shopify.push_data(customers_page(&[6, 7], false, true));

    let resp = admin.get_json("/customers").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_body(resp).await;

    assert_eq!(shopify.last_variables(), json!({ "first": 5 }));
    assert_eq!(page["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(page["items"][0]["id"], "gid://shopify/Customer/1");
    assert_eq!(page["items"][0]["numberOfOrders"], 2);
    assert_eq!(page["pageInfo"]["hasNextPage"], true);
    assert_eq!(page["pageInfo"]["endCursor"], "abc");

    let resp = admin.get_json("/customers/next").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_body(resp).await;

    assert_eq!(shopify.last_variables(), json!({ "first": 5, "after": "abc" }));
    assert_eq!(page["items"][0]["id"], "gid://shopify/Customer/6");
}

#[tokio::test]
async fn test_previous_follows_start_cursor() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[6, 7], false, true));
    shopify.push_data(customers_page(&[1, 2, 3, 4, 5], true, false));

    let resp = admin.get_json("/customers?cursor=c5&direction=after").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(shopify.last_variables(), json!({ "first": 5, "after": "c5" }));

    let resp = admin.get_json("/customers/previous").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(shopify.last_variables(), json!({ "last": 5, "before": "c6" }));
}

#[tokio::test]
async fn test_next_on_last_page_makes_no_request() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1, 2], false, false));

    let resp = admin.get_json("/customers").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin.get_json("/customers/next").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = json_body(resp).await;

    assert_eq!(shopify.request_count(), 1);
    assert_eq!(page["items"][0]["id"], "gid://shopify/Customer/1");
}

#[tokio::test]
async fn test_next_without_page_loads_first_page() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1], false, false));

    let resp = admin.get_json("/customers/next").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(shopify.last_variables(), json!({ "first": 5 }));
}

#[tokio::test]
async fn test_explicit_before_cursor() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1, 2], true, false));

    let resp = admin.get_json("/customers?cursor=xyz&direction=before").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(shopify.last_variables(), json!({ "last": 5, "before": "xyz" }));
}

#[tokio::test]
async fn test_empty_cursor_means_first_page() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[], false, false));

    let resp = admin.get_json("/customers?cursor=&direction=before").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(shopify.last_variables(), json!({ "first": 5 }));

    let page = json_body(resp).await;
    assert_eq!(page["items"], json!([]));
    assert_eq!(page["pageInfo"]["endCursor"], Value::Null);
}

#[tokio::test]
async fn test_unknown_direction_is_bad_request() {
    let (shopify, admin) = setup().await;

    let resp = admin.get_json("/customers?cursor=abc&direction=sideways").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(shopify.request_count(), 0);
}

#[tokio::test]
async fn test_load_failure_is_bad_gateway() {
    let (shopify, admin) = setup().await;
    shopify.push(Reply::Status(500));
    shopify.push(Reply::Errors(vec!["Throttled".to_string()]));

    for _ in 0..2 {
        let resp = admin.get_json("/customers").await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(resp).await;
        assert_eq!(body["error"], "Failed to load data from Shopify");
    }
}

#[tokio::test]
async fn test_concurrent_navigation_is_conflict() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1, 2, 3, 4, 5], true, false));
    shopify.push(Reply::Delayed(
        Duration::from_millis(300),
        customers_page(&[6], false, true),
    ));

    // Establish the session first so both requests share a browser.
    let resp = admin.get_json("/customers").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let slow = admin.get_json("/customers/next");
    let racing = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        admin.get_json("/customers/next").await
    };
    let (slow, racing) = tokio::join!(slow, racing);

    assert_eq!(slow.status(), StatusCode::OK);
    assert_eq!(racing.status(), StatusCode::CONFLICT);
    assert_eq!(shopify.request_count(), 2);
}

#[tokio::test]
async fn test_html_page_renders_table() {
    let (shopify, admin) = setup().await;
    let mut page = customers_page(&[1], true, false);
    page["customers"]["nodes"] = json!([customer_node(1, None), customer_node(2, Some("+15550001111"))]);
    shopify.push_data(page);

    let resp = admin
        .client()
        .get(admin.url("/customers"))
        .send()
        .await
        .expect("Failed to get customers list");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");

    assert!(body.contains("Customer Name"));
    assert!(body.contains("Mobile"));
    assert!(body.contains("N/A"));
    assert!(body.contains("+15550001111"));
    assert!(body.contains("customer1@example.com"));
    assert!(body.contains("href=\"/customers?cursor=c1&amp;direction=after\""));
}

#[tokio::test]
async fn test_page_links_survive_navigation_elsewhere() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1, 2, 3, 4, 5], true, false));
    shopify.push_data(customers_page(&[11, 12, 13, 14, 15], true, true));
    shopify.push_data(customers_page(&[6, 7, 8, 9, 10], true, true));
    shopify.push_data(customers_page(&[1, 2, 3, 4, 5], true, false));

    let first = admin.get_html("/customers").await;
    let next = link_href(&first, "Next");
    assert_eq!(next, "/customers?cursor=c5&direction=after");

    // A second tab on the same session moves the held list to page 3.
    let third = admin.get_html("/customers?cursor=c10&direction=after").await;
    assert_eq!(shopify.last_variables(), json!({ "first": 5, "after": "c10" }));
    assert_eq!(link_href(&third, "Next"), "/customers?cursor=c15&direction=after");

    // The first tab's link still leads to page 2.
    let second = admin.get_html(&next).await;
    assert_eq!(shopify.last_variables(), json!({ "first": 5, "after": "c5" }));
    assert!(second.contains("customer6@example.com"));

    let previous = link_href(&second, "Previous");
    assert_eq!(previous, "/customers?cursor=c6&direction=before");
    admin.get_html(&previous).await;
    assert_eq!(shopify.last_variables(), json!({ "last": 5, "before": "c6" }));
}

// ============================================================================
// Phone Update Tests
// ============================================================================

#[tokio::test]
async fn test_phone_update_success_is_merged_into_page() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customers_page(&[1], false, false));
    shopify.push_data(customer_update(1, Some("+1234567890"), &[]));

    let resp = admin.get_json("/customers").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .post_update(
            "/customers/update",
            &json!({ "customerId": "gid://shopify/Customer/1", "phone": "+1234567890" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["updatedCustomer"]["id"], "gid://shopify/Customer/1");
    assert_eq!(body["updatedCustomer"]["phone"], "+1234567890");
    assert_eq!(
        shopify.last_variables(),
        json!({ "input": { "id": "gid://shopify/Customer/1", "phone": "+1234567890" } })
    );

    // No next page: the held page is re-rendered without a request.
    let page = json_body(admin.get_json("/customers/next").await).await;
    assert_eq!(page["items"][0]["phone"], "+1234567890");
    assert_eq!(shopify.request_count(), 2);
}

#[tokio::test]
async fn test_phone_update_accepts_numeric_id() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customer_update(9, None, &[]));

    let resp = admin
        .post_update("/customers/update", &json!({ "customerId": "9", "phone": "" }))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        shopify.last_variables(),
        json!({ "input": { "id": "gid://shopify/Customer/9", "phone": "" } })
    );
}

#[tokio::test]
async fn test_phone_update_first_user_error_wins() {
    let (shopify, admin) = setup().await;
    shopify.push_data(customer_update(1, None, &["Phone is invalid", "other"]));

    let resp = admin
        .post_update(
            "/customers/update",
            &json!({ "customerId": "gid://shopify/Customer/1", "phone": "12" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, json!({ "error": "Phone is invalid" }));
}

#[tokio::test]
async fn test_phone_update_timeout_is_transport_failure() {
    let (shopify, admin) = setup().await;
    shopify.push(Reply::Delayed(
        Duration::from_secs(2),
        customer_update(1, Some("+1234567890"), &[]),
    ));

    let resp = admin
        .post_update(
            "/customers/update",
            &json!({ "customerId": "gid://shopify/Customer/1", "phone": "+1234567890" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Failed to update Shopify" })
    );
}

#[tokio::test]
async fn test_phone_update_double_submit_is_conflict() {
    let (shopify, admin) = setup().await;
    shopify.push(Reply::Delayed(
        Duration::from_millis(300),
        customer_update(1, Some("+1234567890"), &[]),
    ));

    let payload = json!({ "customerId": "gid://shopify/Customer/1", "phone": "+1234567890" });
    let first = admin.post_update("/customers/update", &payload);
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        admin.post_update("/customers/update", &payload).await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(shopify.request_count(), 1);
}

#[tokio::test]
async fn test_phone_update_rejects_malformed_input() {
    let (shopify, admin) = setup().await;

    let resp = admin
        .client()
        .post(admin.url("/customers/update"))
        .form(&[("data", "not json")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = admin
        .post_update(
            "/customers/update",
            &json!({ "customerId": "gid://shopify/Product/1", "phone": "+1" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(shopify.request_count(), 0);
}

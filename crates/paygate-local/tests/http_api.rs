use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use paygate_local::{GatewayLocal, ItemPolicy, PaymentPolicy, app};
use paygate_types::catalog::Catalog;

const ORIGIN: &str = "http://localhost:3000";

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

fn default_app() -> Router {
    app(Arc::new(GatewayLocal::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, ORIGIN)
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body,
    }
}

async fn post(app: &Router, uri: &str, body: Value) -> Reply {
    send(app, Method::POST, uri, Some(body)).await
}

async fn register(app: &Router, username: &str, password: &str) -> Reply {
    post(
        app,
        "/api/register",
        json!({"username": username, "password": password}),
    )
    .await
}

#[tokio::test]
async fn test_root_banner() {
    let app = default_app();
    let reply = send(&app, Method::GET, "/", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), "Welcome to SimplePayment Gateway!");
}

#[tokio::test]
async fn test_register_then_duplicate() {
    let app = default_app();
    let reply = register(&app, "bob", "pw1").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({
            "success": true,
            "user": {"username": "bob", "paymentMethod": null, "transactions": []}
        })
    );

    let reply = register(&app, "bob", "other").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.json(),
        json!({"success": false, "message": "Username already exists"})
    );
}

#[tokio::test]
async fn test_register_rejects_empty_username() {
    let app = default_app();
    let reply = register(&app, "", "pw1").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["success"], false);
}

#[tokio::test]
async fn test_login() {
    let app = default_app();
    let body = json!({"username": "bob", "password": "pw1"});
    let reply = post(&app, "/api/login", body.clone()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.json(),
        json!({"success": false, "message": "Invalid credentials"})
    );

    register(&app, "bob", "pw1").await;
    let reply = post(&app, "/api/login", body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["user"]["username"], "bob");

    let reply = post(
        &app,
        "/api/login",
        json!({"username": "bob", "password": "wrong"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_products() {
    let app = default_app();
    let reply = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!({
            "success": true,
            "products": [
                {"name": "Laptop", "price": 1000.0},
                {"name": "Smartphone", "price": 500.0},
                {"name": "Subscription", "price": 100.0}
            ]
        })
    );
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let app = default_app();
    let reply = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let reply = post(&app, "/api/login", json!({"username": "x", "password": "y"})).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_preflight_is_empty_no_content() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/payment")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers().clone();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    let reply = send(&app, Method::OPTIONS, "/api/register", None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_unsupported_method_is_405_without_body() {
    let app = default_app();
    let reply = send(&app, Method::GET, "/api/register", None).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_malformed_bodies() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .body(Body::from("{username:bob"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let reply = post(&app, "/api/register", json!({"username": "bob"})).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["success"], false);

    register(&app, "bob", "pw1").await;
    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop", "productPrice": "abc"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop", "productPrice": "12abc34"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let app = default_app();
    let reply = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(
        reply.json(),
        json!({"success": false, "message": "Not found"})
    );
    assert!(reply.headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let reply = post(&app, "/api/nope", json!({})).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.json()["success"], false);
}

#[tokio::test]
async fn test_body_with_foreign_content_type_is_accepted() {
    let app = default_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"username":"bob","password":"pw1"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bank_account_purchase_flow() {
    let app = default_app();
    register(&app, "bob", "pw1").await;
    let reply = post(
        &app,
        "/api/login",
        json!({"username": "bob", "password": "wrong"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let purchase = json!({
        "username": "bob",
        "password": "pw1",
        "productName": "Subscription",
        "productPrice": "100.0"
    });
    let reply = post(&app, "/api/payment", purchase.clone()).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.json(),
        json!({"success": false, "message": "Payment method not set"})
    );

    let reply = post(
        &app,
        "/api/payment-method",
        json!({
            "username": "bob",
            "password": "pw1",
            "paymentMethod": "Bank Account",
            "bankAccount": "123456789"
        }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["message"], "Payment method updated successfully");
    assert_eq!(json["user"]["paymentMethod"], "Bank Account");
    assert_eq!(json["user"]["bankAccount"], "xxxxxxxx6789");
    assert!(!reply.text().contains("123456789"));

    let reply = post(&app, "/api/payment", purchase).await;
    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Payment successful");
    assert_eq!(
        json["user"]["transactions"],
        json!([{"product": {"name": "Subscription", "price": 100.0}, "successful": true}])
    );

    let reply = post(
        &app,
        "/api/transactions",
        json!({"username": "bob", "password": "pw1"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["transactions"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_card_masking_and_invalid_details() {
    let app = default_app();
    register(&app, "alice", "pw2").await;
    let reply = post(
        &app,
        "/api/payment-method",
        json!({
            "username": "alice",
            "password": "pw2",
            "paymentMethod": "Credit Card",
            "cardNumber": "4111111111111111",
            "cardExpiry": "12/25",
            "cardCVV": "987"
        }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["user"]["cardNumber"], "xxxx-xxxx-xxxx-1111");
    let text = reply.text();
    assert!(!text.contains("4111111111111111"));
    assert!(!text.contains("987"));

    post(
        &app,
        "/api/payment-method",
        json!({
            "username": "alice",
            "password": "pw2",
            "paymentMethod": "Credit Card",
            "cardNumber": "411111111111111",
            "cardExpiry": "12/25",
            "cardCVV": "987"
        }),
    )
    .await;
    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "alice", "password": "pw2", "productName": "Laptop", "productPrice": 1000}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid payment details");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["cardNumber"], "xxxx-xxxx-xxxx-1111");
    assert_eq!(body["user"]["transactions"], json!([]));
    assert!(!reply.text().contains("411111111111111"));

    let reply = post(
        &app,
        "/api/transactions",
        json!({"username": "alice", "password": "pw2"}),
    )
    .await;
    assert_eq!(reply.json()["transactions"], json!([]));
}

#[tokio::test]
async fn test_declined_payment_is_success_false_with_history() {
    let policy = PaymentPolicy::from_success_rate(0.0).unwrap();
    let app = app(Arc::new(GatewayLocal::new(Catalog::default(), policy)));
    register(&app, "bob", "pw1").await;
    post(
        &app,
        "/api/payment-method",
        json!({"username": "bob", "password": "pw1", "paymentMethod": "PayPal"}),
    )
    .await;
    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop", "productPrice": 1000}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let json = reply.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Payment failed - Please try again");
    assert_eq!(json["user"]["transactions"][0]["successful"], false);
}

#[tokio::test]
async fn test_catalog_only_rejects_ad_hoc_items() {
    let gateway = GatewayLocal::default().with_item_policy(ItemPolicy::CatalogOnly);
    let app = app(Arc::new(gateway));
    register(&app, "bob", "pw1").await;
    post(
        &app,
        "/api/payment-method",
        json!({"username": "bob", "password": "pw1", "paymentMethod": "UPI", "upiId": "bob@bank"}),
    )
    .await;
    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop", "productPrice": "1"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = post(
        &app,
        "/api/payment",
        json!({"username": "bob", "password": "pw1", "productName": "Laptop", "productPrice": "$1,000"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["user"]["upiId"], "bob@bank");
}

#[tokio::test]
async fn test_payment_method_requires_authentication() {
    let app = default_app();
    let reply = post(
        &app,
        "/api/payment-method",
        json!({"username": "ghost", "password": "pw", "paymentMethod": "PayPal"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    let reply = post(
        &app,
        "/api/transactions",
        json!({"username": "ghost", "password": "pw"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

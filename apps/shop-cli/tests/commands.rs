//! Commands end to end against an in-process fake backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use threadline_shop::error::ErrorCode;
use threadline_shop::{execute, execute_with, Cli};
use threadline_store::{GatewayResult, MockPaymentGateway};

#[derive(Default)]
struct Backend {
    cart_lines: usize,
    checkouts: AtomicUsize,
    verifies: AtomicUsize,
}

async fn get_cart(State(backend): State<Arc<Backend>>) -> Json<Value> {
    let items: Vec<Value> = (0..backend.cart_lines)
        .map(|i| {
            json!({
                "_id": format!("line-{i}"),
                "product": {"_id": format!("p-{i}"), "name": "Chanderi Saree", "price": 600},
                "quantity": 1,
                "finalPrice": 600
            })
        })
        .collect();
    Json(json!({"success": true, "data": {
        "items": items,
        "totalItems": backend.cart_lines,
        "totalPrice": 600 * backend.cart_lines
    }}))
}

async fn get_addresses() -> Json<Value> {
    Json(json!({"success": true, "data": [
        {"_id": "a1", "name": "Asha", "phone": "9876543210", "addressLine1": "12 MG Road",
         "city": "Pune", "state": "MH", "pincode": "411001", "isDefault": true}
    ]}))
}

async fn checkout(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Json<Value> {
    backend.checkouts.fetch_add(1, Ordering::SeqCst);
    Json(json!({"success": true, "data": {
        "_id": "o-1", "orderNo": "TL-1001",
        "shippingAddress": body["shippingAddress"],
        "paymentMethod": body["paymentMethod"],
        "subtotal": 600, "shipping": 0, "tax": 108, "total": 708
    }}))
}

fn order_body(order_id: &str, method: &str, payment_status: &str) -> Value {
    json!({
        "_id": order_id, "orderNo": "TL-1002",
        "shippingAddress": {
            "name": "Asha", "phone": "9876543210", "addressLine1": "12 MG Road",
            "city": "Pune", "state": "MH", "pincode": "411001"
        },
        "paymentMethod": method,
        "paymentStatus": payment_status,
        "subtotal": 600, "shipping": 0, "tax": 108, "total": 708
    })
}

/// `o-upi` is an unpaid UPI order, anything else is cash on delivery.
async fn get_order(Path(id): Path<String>) -> Json<Value> {
    let method = if id == "o-upi" { "upi" } else { "cod" };
    Json(json!({"success": true, "data": order_body(&id, method, "pending")}))
}

async fn create_gateway_order(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"success": true, "data": {
        "id": format!("gw_{}", body["orderId"].as_str().unwrap_or_default()),
        "amount": 708
    }}))
}

async fn verify_payment(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.verifies.fetch_add(1, Ordering::SeqCst);
    let order_id = body["orderId"].as_str().unwrap_or_default();
    Json(json!({"success": true, "data": order_body(order_id, "upi", "completed")}))
}

async fn spawn(backend: Arc<Backend>) -> SocketAddr {
    let router = Router::new()
        .route("/api/cart", get(get_cart))
        .route("/api/addresses", get(get_addresses))
        .route("/api/orders/checkout", post(checkout))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/payments/create-order", post(create_gateway_order))
        .route("/api/payments/verify", post(verify_payment))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn cli(addr: SocketAddr, args: &[&str]) -> Cli {
    let url = format!("http://{addr}/api");
    let mut argv = vec![
        "threadline-shop",
        "--config",
        "/nonexistent/threadline/client.toml",
        "--api-url",
        url.as_str(),
        "--json",
    ];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_checkout_places_one_cod_order() {
    let backend = Arc::new(Backend {
        cart_lines: 1,
        ..Default::default()
    });
    let addr = spawn(backend.clone()).await;

    execute(cli(addr, &["checkout", "--yes"])).await.unwrap();
    assert_eq!(backend.checkouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_fails_before_ordering() {
    let backend = Arc::new(Backend::default());
    let addr = spawn(backend.clone()).await;

    let err = execute(cli(addr, &["checkout", "--yes"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "Your cart is empty");
    assert_eq!(backend.checkouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_address_is_a_validation_error() {
    let backend = Arc::new(Backend {
        cart_lines: 1,
        ..Default::default()
    });
    let addr = spawn(backend.clone()).await;

    let err = execute(cli(addr, &["checkout", "--address", "a9", "--yes"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(backend.checkouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wallet_is_forbidden_for_customers() {
    let addr = spawn(Arc::new(Backend::default())).await;

    let err = execute(cli(addr, &["wallet", "show"])).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[tokio::test]
async fn test_cart_show() {
    let backend = Arc::new(Backend {
        cart_lines: 2,
        ..Default::default()
    });
    let addr = spawn(backend).await;

    execute(cli(addr, &["cart", "show"])).await.unwrap();
}

#[tokio::test]
async fn test_orders_pay_settles_unpaid_online_order() {
    let backend = Arc::new(Backend::default());
    let addr = spawn(backend.clone()).await;

    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_collect()
        .once()
        .withf(|order, gw| order.id == "o-upi" && gw.gateway_order_id == "gw_o-upi")
        .returning(|_, _| GatewayResult::Success {
            payment_id: "pay_1".into(),
            signature: "sig".into(),
        });

    execute_with(cli(addr, &["orders", "pay", "o-upi"]), Arc::new(gateway))
        .await
        .unwrap();
    assert_eq!(backend.verifies.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_orders_pay_cancelled_payment_points_back_to_retry() {
    let backend = Arc::new(Backend::default());
    let addr = spawn(backend.clone()).await;

    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_collect()
        .once()
        .returning(|_, _| GatewayResult::Cancelled);

    let err = execute_with(cli(addr, &["orders", "pay", "o-upi"]), Arc::new(gateway))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Payment);
    assert!(err.message.contains("orders pay o-upi"));
    assert_eq!(backend.verifies.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_orders_pay_refuses_cash_on_delivery() {
    let addr = spawn(Arc::new(Backend::default())).await;

    let mut gateway = MockPaymentGateway::new();
    gateway.expect_collect().never();

    let err = execute_with(cli(addr, &["orders", "pay", "o-cod"]), Arc::new(gateway))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Business);
    assert_eq!(err.message, "Order TL-1002 is cash on delivery");
}

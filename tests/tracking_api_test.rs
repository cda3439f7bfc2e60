mod common;

use axum::http::StatusCode;
use common::{setup_test_app, SUPPLIER_AUTH_TOKEN};

async fn create_cargo(app: &common::TestApp) -> String {
    let (status, body) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    body["trackingNumber"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_public_tracking_masks_pii() {
    let app = setup_test_app().await;
    let tracking_number = create_cargo(&app).await;

    let (status, body) = app
        .request("GET", &format!("/track-cargo/{}", tracking_number), None)
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let pickup = &body["cargo"]["pickupAddress"];
    assert_eq!(pickup["contactName"], "Ad*");
    assert_eq!(pickup["phone"], "********22");
    assert_eq!(pickup["line"], "12 D******");
    // City stays readable for route context.
    assert_eq!(pickup["city"], "Hamburg");

    let delivery = &body["cargo"]["deliveryAddress"];
    assert_eq!(delivery["contactName"], "Gr***");

    // History rides along, oldest first.
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["status"], "NEW_REQUEST");
}

#[tokio::test]
async fn test_supplier_auth_token_reveals_pii() {
    let app = setup_test_app().await;
    let tracking_number = create_cargo(&app).await;

    let (status, body) = app
        .request(
            "GET",
            &format!(
                "/track-cargo/{}?authToken={}",
                tracking_number, SUPPLIER_AUTH_TOKEN
            ),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cargo"]["pickupAddress"]["contactName"], "Ada");
    assert_eq!(body["cargo"]["pickupAddress"]["phone"], "5550001122");
}

#[tokio::test]
async fn test_wrong_auth_token_still_masked() {
    let app = setup_test_app().await;
    let tracking_number = create_cargo(&app).await;

    let (status, body) = app
        .request(
            "GET",
            &format!("/track-cargo/{}?authToken=wrong", tracking_number),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cargo"]["pickupAddress"]["contactName"], "Ad*");
}

#[tokio::test]
async fn test_unknown_tracking_number_404s() {
    let app = setup_test_app().await;

    let (status, body) = app
        .request("GET", "/track-cargo/CM0000000000000", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_tracking_history_grows_with_status_updates() {
    let app = setup_test_app().await;
    let tracking_number = create_cargo(&app).await;

    for status in ["AWAITING_PICKUP", "RECEIVED", "AWAITING_SHIPMENT"] {
        app.request(
            "PUT",
            &format!("/cargo/tracking/{}/status", tracking_number),
            Some(serde_json::json!({"status": status})),
        )
        .await;
    }

    let (_, body) = app
        .request("GET", &format!("/track-cargo/{}", tracking_number), None)
        .await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0]["status"], "NEW_REQUEST");
    assert_eq!(history[3]["status"], "AWAITING_SHIPMENT");
}

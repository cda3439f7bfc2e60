mod common;

use axum::http::StatusCode;
use cargomarket::domain::CargoId;
use common::setup_test_app;

async fn create_cargo(app: &common::TestApp) -> i64 {
    let (status, body) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_status_update_appends_tracking_and_emits_event() {
    let app = setup_test_app().await;
    let id = create_cargo(&app).await;
    let creation_events = app.events.count();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/cargo/{}/status", id),
            Some(serde_json::json!({"status": "AWAITING_PICKUP", "note": "driver booked"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "AWAITING_PICKUP");
    assert_eq!(body["note"], "driver booked");

    let history = app
        .cargo_service
        .tracking_history(CargoId::new(id))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].status.as_str(), "AWAITING_PICKUP");
    assert_eq!(history[1].note.as_deref(), Some("driver booked"));

    let events = app.events.recorded();
    assert_eq!(events.len(), creation_events + 1);
    assert_eq!(events.last().unwrap().name(), "cargo.status.updated");
}

#[tokio::test]
async fn test_same_status_is_a_silent_field_update() {
    let app = setup_test_app().await;
    let id = create_cargo(&app).await;

    let (status, _) = app
        .request(
            "PUT",
            &format!("/cargo/{}/status", id),
            Some(serde_json::json!({"status": "AWAITING_PICKUP"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let events_before = app.events.count();
    let history_before = app
        .cargo_service
        .tracking_history(CargoId::new(id))
        .await
        .unwrap()
        .len();

    // Second identical update: no tracking entry, no event.
    let (status, body) = app
        .request(
            "PUT",
            &format!("/cargo/{}/status", id),
            Some(serde_json::json!({"status": "AWAITING_PICKUP"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "AWAITING_PICKUP");

    assert_eq!(app.events.count(), events_before);
    let history_after = app
        .cargo_service
        .tracking_history(CargoId::new(id))
        .await
        .unwrap()
        .len();
    assert_eq!(history_after, history_before);
}

#[tokio::test]
async fn test_delivered_sets_timestamp_and_review_eligibility() {
    let app = setup_test_app().await;
    let id = create_cargo(&app).await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/cargo/{}/status", id),
            Some(serde_json::json!({"status": "DELIVERED"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "DELIVERED");
    assert_eq!(body["reviewEligible"], true);
    assert!(!body["deliveredAt"].is_null());

    let history = app
        .cargo_service
        .tracking_history(CargoId::new(id))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);

    // Status update, commission trigger, review invitation.
    let names: Vec<&str> = app.events.recorded().iter().map(|e| e.name()).collect();
    assert!(names.contains(&"cargo.status.updated"));
    assert!(names.contains(&"cargo.apply.commissions"));
    assert!(names.contains(&"new.cargo.supplier.review"));
}

#[tokio::test]
async fn test_supplier_scoped_update_misses_other_suppliers() {
    let app = setup_test_app().await;
    let id = create_cargo(&app).await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/cargo/supplier/999/cargo-detail/{}", id),
            Some(serde_json::json!({"status": "RECEIVED"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = app
        .request(
            "PUT",
            &format!(
                "/cargo/supplier/{}/cargo-detail/{}",
                app.supplier_id.as_i64(),
                id
            ),
            Some(serde_json::json!({"status": "RECEIVED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "RECEIVED");
}

#[tokio::test]
async fn test_update_by_tracking_number() {
    let app = setup_test_app().await;

    let (status, created) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    assert_eq!(status, StatusCode::OK);
    let tracking_number = created["trackingNumber"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/cargo/tracking/{}/status", tracking_number),
            Some(serde_json::json!({"status": "AWAITING_PICKUP"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "AWAITING_PICKUP");

    let (status, _) = app
        .request(
            "PUT",
            "/cargo/tracking/CM0000000000000/status",
            Some(serde_json::json!({"status": "AWAITING_PICKUP"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transition_table_exposed_for_display() {
    let app = setup_test_app().await;

    let (status, body) = app.request("GET", "/cargo-status/transitions", None).await;
    assert_eq!(status, StatusCode::OK);

    let new_request = &body["NEW_REQUEST"];
    assert!(new_request["toStatuses"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("AWAITING_PICKUP")));
    assert!(new_request["toStatuses"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("CANCELLED")));
    assert!(!new_request["confirmationMessage"].as_str().unwrap().is_empty());

    // Terminal states offer no onward moves.
    assert!(body["DELIVERED"]["toStatuses"].as_array().unwrap().is_empty());
}

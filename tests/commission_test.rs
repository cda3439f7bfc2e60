mod common;

use axum::http::StatusCode;
use cargomarket::domain::{CargoId, Decimal, PaymentStatus};
use common::setup_test_app;

async fn create_delivered_cargo(app: &common::TestApp) -> CargoId {
    let (status, body) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            "PUT",
            &format!("/cargo/{}/status", id),
            Some(serde_json::json!({"status": "DELIVERED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    CargoId::new(id)
}

#[tokio::test]
async fn test_apply_commissions_derives_payment() {
    let app = setup_test_app().await;
    let cargo_id = create_delivered_cargo(&app).await;

    let inserted = app
        .commission_service
        .apply_commissions(cargo_id)
        .await
        .unwrap();
    assert!(inserted);

    let payment = app
        .repo
        .get_payment_for_cargo(cargo_id)
        .await
        .unwrap()
        .unwrap();

    // 15 kg at commission rate 0.5/kg.
    assert_eq!(payment.supplier_commission, Decimal::scaled(75, 1));
    // revenue = total fee, customer commission = service fee.
    assert_eq!(payment.revenue, Decimal::from_i64(33));
    assert_eq!(payment.customer_commission, Decimal::from_i64(3));
    // profit = goods fee minus supplier commission.
    assert_eq!(payment.profit, Decimal::scaled(225, 1));
    assert_eq!(payment.commission, Decimal::scaled(105, 1));
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.period.is_none());
}

#[tokio::test]
async fn test_apply_commissions_once_per_cargo() {
    let app = setup_test_app().await;
    let cargo_id = create_delivered_cargo(&app).await;

    assert!(app.commission_service.apply_commissions(cargo_id).await.unwrap());
    assert!(!app.commission_service.apply_commissions(cargo_id).await.unwrap());
}

#[tokio::test]
async fn test_assign_period_endpoint_idempotent() {
    let app = setup_test_app().await;
    let cargo_id = create_delivered_cargo(&app).await;
    app.commission_service
        .apply_commissions(cargo_id)
        .await
        .unwrap();

    let uri = format!("/supplier/{}/assign-period", app.supplier_id.as_i64());
    let body = serde_json::json!({"period": "2030-01-01"});

    let (status, response) = app.request("POST", &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK, "body: {}", response);
    assert_eq!(response["assigned"], 1);

    // Re-running the same period touches nothing.
    let (status, response) = app.request("POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["assigned"], 0);
}

#[tokio::test]
async fn test_assign_period_rejects_non_boundary_date() {
    let app = setup_test_app().await;

    let uri = format!("/supplier/{}/assign-period", app.supplier_id.as_i64());
    let (status, response) = app
        .request("POST", &uri, Some(serde_json::json!({"period": "2030-01-02"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_period_time_of_day_truncated() {
    let app = setup_test_app().await;
    let cargo_id = create_delivered_cargo(&app).await;
    app.commission_service
        .apply_commissions(cargo_id)
        .await
        .unwrap();

    // Mid-day timestamp on the 15th still anchors the period at the date.
    let uri = format!("/supplier/{}/assign-period", app.supplier_id.as_i64());
    let (status, response) = app
        .request(
            "POST",
            &uri,
            Some(serde_json::json!({"period": "2030-01-15T13:45:00+00:00"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", response);
    assert_eq!(response["assigned"], 1);

    let payment = app
        .repo
        .get_payment_for_cargo(cargo_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.period.unwrap().to_string(), "2030-01-15");
}

#[tokio::test]
async fn test_period_status_and_aggregate_fold() {
    let app = setup_test_app().await;

    // Two delivered cargos, two payments in the same period.
    let first = create_delivered_cargo(&app).await;
    let second = create_delivered_cargo(&app).await;
    app.commission_service.apply_commissions(first).await.unwrap();
    app.commission_service.apply_commissions(second).await.unwrap();

    let assign_uri = format!("/supplier/{}/assign-period", app.supplier_id.as_i64());
    let (status, response) = app
        .request("POST", &assign_uri, Some(serde_json::json!({"period": "2030-01-01"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["assigned"], 2);

    // Both pending: the period folds to PENDING.
    let periods_uri = format!(
        "/supplier/{}/payment-periods",
        app.supplier_id.as_i64()
    );
    let (status, body) = app.request("GET", &periods_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let periods = body.as_array().unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["status"], "PENDING");
    assert_eq!(periods[0]["paymentCount"], 2);
    assert_eq!(periods[0]["revenue"], serde_json::json!(66.0));

    // Mark the whole period paid: fold flips to PAID.
    let (status, response) = app
        .request(
            "POST",
            "/payment-period/status",
            Some(serde_json::json!({"period": "2030-01-01", "status": "PAID"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["updated"], 2);

    let (_, body) = app.request("GET", &periods_uri, None).await;
    assert_eq!(body.as_array().unwrap()[0]["status"], "PAID");
}

#[tokio::test]
async fn test_single_pending_payment_forces_period_pending() {
    let app = setup_test_app().await;

    let first = create_delivered_cargo(&app).await;
    app.commission_service.apply_commissions(first).await.unwrap();

    let assign_uri = format!("/supplier/{}/assign-period", app.supplier_id.as_i64());
    app.request("POST", &assign_uri, Some(serde_json::json!({"period": "2030-01-01"})))
        .await;
    app.request(
        "POST",
        "/payment-period/status",
        Some(serde_json::json!({"period": "2030-01-01", "status": "PAID"})),
    )
    .await;

    // A later payment lands in the same period still pending.
    let second = create_delivered_cargo(&app).await;
    app.commission_service.apply_commissions(second).await.unwrap();
    app.request("POST", &assign_uri, Some(serde_json::json!({"period": "2030-01-01"})))
        .await;

    let periods_uri = format!(
        "/supplier/{}/payment-periods",
        app.supplier_id.as_i64()
    );
    let (_, body) = app.request("GET", &periods_uri, None).await;
    let periods = body.as_array().unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["status"], "PENDING");
}

#[tokio::test]
async fn test_supplier_stats() {
    let app = setup_test_app().await;

    // One delivered (with commission applied), one new, one shipped.
    let delivered = create_delivered_cargo(&app).await;
    app.commission_service
        .apply_commissions(delivered)
        .await
        .unwrap();

    let (_, body) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    let _new_id = body["id"].as_i64().unwrap();

    let (_, body) = app.request("POST", "/cargo", Some(app.create_cargo_body())).await;
    let shipped_id = body["id"].as_i64().unwrap();
    app.request(
        "PUT",
        &format!("/cargo/{}/status", shipped_id),
        Some(serde_json::json!({"status": "SHIPPED"})),
    )
    .await;

    let (status, stats) = app
        .request(
            "GET",
            &format!("/supplier/{}/stats", app.supplier_id.as_i64()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", stats);
    assert_eq!(stats["totalCargos"], 3);
    assert_eq!(stats["newCargos"], 1);
    assert_eq!(stats["deliveredCargos"], 1);
    assert_eq!(stats["inProgressCargos"], 1);
    // One payment: profit 22.5, commission 10.5.
    assert_eq!(stats["profit"], serde_json::json!(22.5));
    assert_eq!(stats["commissionPayments"], serde_json::json!(10.5));
}

#[tokio::test]
async fn test_close_period_for_all_suppliers() {
    let app = setup_test_app().await;

    let cargo_id = create_delivered_cargo(&app).await;
    app.commission_service
        .apply_commissions(cargo_id)
        .await
        .unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
    let assigned = app
        .commission_service
        .close_period_for_all(date)
        .await
        .unwrap();
    assert_eq!(assigned, 1);

    // Re-entrant: a duplicate run assigns nothing.
    let assigned = app
        .commission_service
        .close_period_for_all(date)
        .await
        .unwrap();
    assert_eq!(assigned, 0);
}

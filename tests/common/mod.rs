//! Shared test harness: tempfile database, seeded catalog, mock event sink,
//! and a router built over the full service graph.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cargomarket::api::{self, AppState};
use cargomarket::config::Config;
use cargomarket::db::init_db;
use cargomarket::domain::{
    AddressId, CargoMethod, CargoPricing, CargoTypeId, Decimal, LocationId, PriceField,
    PricingId, PricingMode, RandomTrackingGenerator, SupplierId, UserId,
};
use cargomarket::db::repo::{NewAddress, NewSupplier};
use cargomarket::notify::MockEventSink;
use cargomarket::service::{
    Actor, CargoService, CommissionService, CouponService, PricingService,
};
use cargomarket::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const SUPPLIER_AUTH_TOKEN: &str = "sup-token";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<Repository>,
    pub events: Arc<MockEventSink>,
    pub cargo_service: Arc<CargoService>,
    pub commission_service: Arc<CommissionService>,
    pub pricing_service: Arc<PricingService>,
    pub user_id: UserId,
    pub supplier_id: SupplierId,
    pub source: LocationId,
    pub destination: LocationId,
    pub weight_type: CargoTypeId,
    pub item_type: CargoTypeId,
    pub parent_type: CargoTypeId,
    pub pickup_address: AddressId,
    pub delivery_address: AddressId,
    _temp: TempDir,
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let events = Arc::new(MockEventSink::new());
    let tracking = Arc::new(RandomTrackingGenerator::with_seed(42));

    let config = Config {
        port: 0,
        database_path: db_path,
        sms_gateway_url: None,
        tracking_base_url: "http://localhost:8080/track-cargo".to_string(),
        tracking_seed: Some(42),
        settlement_job_enabled: false,
    };

    let cargo_service = Arc::new(CargoService::new(
        repo.clone(),
        events.clone(),
        tracking,
        config.tracking_base_url.clone(),
    ));
    let pricing_service = Arc::new(PricingService::new(repo.clone()));
    let coupon_service = Arc::new(CouponService::new(repo.clone()));
    let commission_service = Arc::new(CommissionService::new(repo.clone()));

    // Seed the catalog: one supplier, one route, a parent type with a leaf
    // child, and a second standalone leaf type.
    let supplier_id = repo
        .insert_supplier(&NewSupplier {
            name: "Baltic Freight".to_string(),
            phone: "5557770000".to_string(),
            min_weight: Decimal::from_i64(12),
            delivery_estimation_min: 3,
            delivery_estimation_max: 7,
            auth_token: SUPPLIER_AUTH_TOKEN.to_string(),
            active: true,
        })
        .await
        .unwrap();

    let source = repo.insert_location("Hamburg").await.unwrap();
    let destination = repo.insert_location("Valletta").await.unwrap();

    let parent_type = repo.insert_cargo_type("Electronics", None).await.unwrap();
    let weight_type = repo
        .insert_cargo_type("Textiles", None)
        .await
        .unwrap();
    let item_type = repo
        .insert_cargo_type("Phones", Some(parent_type))
        .await
        .unwrap();

    let user_id = UserId::new(7);
    let pickup_address = repo
        .insert_address(&NewAddress {
            user_id,
            contact_name: "Ada".to_string(),
            contact_surname: "Marsh".to_string(),
            phone: "5550001122".to_string(),
            line: "12 Dock Rd".to_string(),
            city: "Hamburg".to_string(),
            location_id: source,
        })
        .await
        .unwrap();
    let delivery_address = repo
        .insert_address(&NewAddress {
            user_id,
            contact_name: "Grace".to_string(),
            contact_surname: "Hollis".to_string(),
            phone: "5553334455".to_string(),
            line: "4 Harbour Sq".to_string(),
            city: "Valletta".to_string(),
            location_id: destination,
        })
        .await
        .unwrap();

    pricing_service
        .create_pricing(
            CargoPricing {
                id: PricingId::new(0),
                supplier_id,
                cargo_method: CargoMethod::Air,
                price_fields: vec![
                    PriceField {
                        cargo_type: weight_type,
                        pricing_mode: PricingMode::PerWeight,
                        price: Decimal::from_i64(2),
                        commission_rate: Decimal::scaled(5, 1),
                        courier_pickup: true,
                    },
                    PriceField {
                        cargo_type: item_type,
                        pricing_mode: PricingMode::PerItem,
                        price: Decimal::from_i64(5),
                        commission_rate: Decimal::from_i64(1),
                        courier_pickup: false,
                    },
                ],
                source_locations: vec![source],
                destination_locations: vec![destination],
            },
            Actor::Admin,
        )
        .await
        .unwrap();

    let state = AppState {
        repo: repo.clone(),
        config,
        cargo_service: cargo_service.clone(),
        pricing_service: pricing_service.clone(),
        coupon_service,
        commission_service: commission_service.clone(),
    };

    TestApp {
        router: api::create_router(state),
        repo,
        events,
        cargo_service,
        commission_service,
        pricing_service,
        user_id,
        supplier_id,
        source,
        destination,
        weight_type,
        item_type,
        parent_type,
        pickup_address,
        delivery_address,
        _temp: temp_dir,
    }
}

impl TestApp {
    /// Standard creation body: one 15 kg per-weight item, no coupon.
    pub fn create_cargo_body(&self) -> serde_json::Value {
        serde_json::json!({
            "userId": self.user_id.as_i64(),
            "supplierId": self.supplier_id.as_i64(),
            "cargoMethod": "air",
            "pickupAddressId": self.pickup_address.as_i64(),
            "deliveryAddressId": self.delivery_address.as_i64(),
            "sourceLocation": self.source.as_i64(),
            "destinationLocation": self.destination.as_i64(),
            "items": [
                {"cargoType": self.weight_type.as_i64(), "weight": 15.0, "qty": 1}
            ]
        })
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }
}

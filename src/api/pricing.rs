use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::domain::{
    CargoMethod, CargoPricing, LocationId, PriceField, PricingId, SupplierId,
};
use crate::error::AppError;
use crate::service::Actor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBody {
    pub supplier_id: i64,
    pub cargo_method: CargoMethod,
    pub price_fields: Vec<PriceField>,
    pub source_locations: Vec<i64>,
    pub destination_locations: Vec<i64>,
    /// When set, the mutation runs as this supplier; absent means admin.
    pub acting_supplier_id: Option<i64>,
}

impl PricingBody {
    fn into_parts(self) -> (CargoPricing, Actor) {
        let actor = match self.acting_supplier_id {
            Some(id) => Actor::Supplier(SupplierId::new(id)),
            None => Actor::Admin,
        };
        let pricing = CargoPricing {
            id: PricingId::new(0),
            supplier_id: SupplierId::new(self.supplier_id),
            cargo_method: self.cargo_method,
            price_fields: self.price_fields,
            source_locations: self.source_locations.into_iter().map(LocationId::new).collect(),
            destination_locations: self
                .destination_locations
                .into_iter()
                .map(LocationId::new)
                .collect(),
        };
        (pricing, actor)
    }
}

pub async fn create_pricing(
    State(state): State<AppState>,
    Json(body): Json<PricingBody>,
) -> Result<Json<CargoPricing>, AppError> {
    let (pricing, actor) = body.into_parts();
    let stored = state.pricing_service.create_pricing(pricing, actor).await?;
    Ok(Json(stored))
}

pub async fn update_pricing(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<PricingBody>,
) -> Result<Json<CargoPricing>, AppError> {
    let (pricing, actor) = body.into_parts();
    let stored = state
        .pricing_service
        .update_pricing(PricingId::new(id), pricing, actor)
        .await?;
    Ok(Json(stored))
}

pub async fn list_for_supplier(
    Path(supplier_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CargoPricing>>, AppError> {
    let rows = state
        .pricing_service
        .list_for_supplier(SupplierId::new(supplier_id))
        .await?;
    Ok(Json(rows))
}

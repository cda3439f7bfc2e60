use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::domain::{
    AddressId, Cargo, CargoId, CargoItem, CargoMethod, CargoStatus, LocationId, SupplierId,
    TrackingNumber, UserId,
};
use crate::engine::TransitionTable;
use crate::error::AppError;
use crate::service::{CargoSelector, CreateCargoRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCargoBody {
    pub user_id: i64,
    pub supplier_id: i64,
    pub cargo_method: CargoMethod,
    pub pickup_address_id: i64,
    pub delivery_address_id: i64,
    pub source_location: i64,
    pub destination_location: i64,
    pub items: Vec<CargoItem>,
    pub coupon_code: Option<String>,
}

pub async fn create_cargo(
    State(state): State<AppState>,
    Json(body): Json<CreateCargoBody>,
) -> Result<Json<Cargo>, AppError> {
    let request = CreateCargoRequest {
        supplier_id: SupplierId::new(body.supplier_id),
        cargo_method: body.cargo_method,
        pickup_address_id: AddressId::new(body.pickup_address_id),
        delivery_address_id: AddressId::new(body.delivery_address_id),
        source_location: LocationId::new(body.source_location),
        destination_location: LocationId::new(body.destination_location),
        items: body.items,
        coupon_code: body.coupon_code,
    };

    let cargo = state
        .cargo_service
        .create_cargo(request, UserId::new(body.user_id))
        .await?;
    Ok(Json(cargo))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: i64,
}

pub async fn get_cargo(
    Path(id): Path<i64>,
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<Cargo>, AppError> {
    let cargo = state
        .cargo_service
        .get_cargo_for_user(CargoId::new(id), UserId::new(query.user_id))
        .await?;
    Ok(Json(cargo))
}

pub async fn list_cargos(
    Query(query): Query<OwnerQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Cargo>>, AppError> {
    let cargos = state
        .cargo_service
        .list_cargos_for_user(UserId::new(query.user_id))
        .await?;
    Ok(Json(cargos))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub status: CargoStatus,
    pub note: Option<String>,
}

pub async fn update_status(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Cargo>, AppError> {
    let cargo = state
        .cargo_service
        .update_cargo_status(
            CargoSelector::Id(CargoId::new(id)),
            body.status,
            body.note,
            None,
        )
        .await?;
    Ok(Json(cargo))
}

pub async fn update_status_by_tracking(
    Path(tracking_number): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Cargo>, AppError> {
    let cargo = state
        .cargo_service
        .update_cargo_status(
            CargoSelector::Tracking(TrackingNumber::new(tracking_number)),
            body.status,
            body.note,
            None,
        )
        .await?;
    Ok(Json(cargo))
}

/// Supplier-scoped status update: the cargo must belong to the supplier in
/// the path or the lookup misses.
pub async fn supplier_update_status(
    Path((supplier_id, cargo_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Cargo>, AppError> {
    let cargo = state
        .cargo_service
        .update_cargo_status(
            CargoSelector::Id(CargoId::new(cargo_id)),
            body.status,
            body.note,
            Some(SupplierId::new(supplier_id)),
        )
        .await?;
    Ok(Json(cargo))
}

/// The advisory transition table, keyed by current status.
pub async fn transition_table() -> Result<Json<serde_json::Value>, AppError> {
    let table = TransitionTable::standard();
    let value = serde_json::to_value(table.rules())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(value))
}

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Cargo, CargoTracking, TrackingNumber};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub cargo: Cargo,
    pub history: Vec<CargoTracking>,
}

/// Public, unauthenticated tracking lookup. Contact and address fields are
/// partially masked unless a valid supplier auth token is supplied.
pub async fn track_cargo(
    Path(tracking_number): Path<String>,
    Query(query): Query<TrackQuery>,
    State(state): State<AppState>,
) -> Result<Json<TrackResponse>, AppError> {
    let tracked = state
        .cargo_service
        .track(
            &TrackingNumber::new(tracking_number),
            query.auth_token.as_deref(),
        )
        .await?;

    Ok(Json(TrackResponse {
        cargo: tracked.cargo,
        history: tracked.history,
    }))
}

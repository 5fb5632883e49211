use axum::{
    extract::{Query, State},
    Json,
};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::geo::Coordinate;
use crate::query::{parse_tolerance, rank_proximity, resolve_snapshot_str, Neighbor};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    pub time: String,
    #[serde(default)]
    pub tolerance: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub time: String,
    pub positions: BTreeMap<String, Coordinate>,
}

#[derive(Debug, Deserialize)]
pub struct ProximityQuery {
    pub time: String,
    pub target: String,
    #[serde(default)]
    pub max_distance: Option<f64>,
    #[serde(default)]
    pub tolerance: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProximityResponse {
    pub time: String,
    pub target: String,
    /// False when the target had no sample within tolerance of `time`.
    pub target_found: bool,
    pub max_distance_m: f64,
    pub neighbors: Vec<Neighbor>,
}

#[utoipa::path(
    get,
    path = "/api/snapshot",
    tag = "query",
    params(
        ("time" = String, Query, description = "Query instant (ISO-8601, UTC when no offset)"),
        ("tolerance" = Option<String>, Query, description = "Maximum sample gap, e.g. 1s or 500ms")
    ),
    responses(
        (status = 200, description = "Resolved positions", body = SnapshotResponse),
        (status = 400, description = "Invalid tolerance", body = ErrorResponse)
    )
)]
pub async fn snapshot(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> ApiResult<Json<SnapshotResponse>> {
    let tolerance = tolerance_or_default(&state, query.tolerance.as_deref())?;
    let loaded = state.current().await;
    let snapshot = resolve_snapshot_str(&loaded.dataset, &query.time, tolerance);

    Ok(Json(SnapshotResponse {
        time: query.time,
        positions: snapshot.positions().clone(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/proximity",
    tag = "query",
    params(
        ("time" = String, Query, description = "Query instant (ISO-8601, UTC when no offset)"),
        ("target" = String, Query, description = "Entity to measure from"),
        ("max_distance" = Option<f64>, Query, description = "Proximity radius in meters"),
        ("tolerance" = Option<String>, Query, description = "Maximum sample gap, e.g. 1s or 500ms")
    ),
    responses(
        (status = 200, description = "Neighbors nearest first", body = ProximityResponse),
        (status = 400, description = "Invalid radius or tolerance", body = ErrorResponse)
    )
)]
pub async fn proximity(
    State(state): State<AppState>,
    Query(query): Query<ProximityQuery>,
) -> ApiResult<Json<ProximityResponse>> {
    let tolerance = tolerance_or_default(&state, query.tolerance.as_deref())?;
    let max_distance_m = query
        .max_distance
        .unwrap_or(state.config.query.max_distance_m);
    if max_distance_m.is_nan() || max_distance_m < 0.0 {
        return Err(ApiError::Validation(format!(
            "max_distance must be a non-negative number, got {max_distance_m}"
        )));
    }

    let loaded = state.current().await;
    let snapshot = resolve_snapshot_str(&loaded.dataset, &query.time, tolerance);
    let target_found = snapshot.contains(&query.target);
    let neighbors = rank_proximity(&snapshot, &query.target, max_distance_m);

    Ok(Json(ProximityResponse {
        time: query.time,
        target: query.target,
        target_found,
        max_distance_m,
        neighbors,
    }))
}

fn tolerance_or_default(state: &AppState, raw: Option<&str>) -> ApiResult<TimeDelta> {
    match raw {
        Some(s) => parse_tolerance(s).map_err(ApiError::Validation),
        None => Ok(state.config.query.tolerance),
    }
}

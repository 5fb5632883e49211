use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ingest::IngestStats;
use crate::pipeline::{load_dataset, LoadedDataset};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct EntitySummary {
    pub name: String,
    pub samples: usize,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntitiesResponse {
    pub entities: Vec<EntitySummary>,
    pub stats: IngestStats,
}

impl From<&LoadedDataset> for EntitiesResponse {
    fn from(loaded: &LoadedDataset) -> Self {
        let entities = loaded
            .dataset
            .tracks()
            .map(|track| EntitySummary {
                name: track.name().to_string(),
                samples: track.len(),
                first: track.first().map(|s| s.timestamp),
                last: track.last().map(|s| s.timestamp),
            })
            .collect();

        EntitiesResponse {
            entities,
            stats: loaded.stats,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/entities",
    tag = "dataset",
    responses(
        (status = 200, description = "Tracked entities", body = EntitiesResponse)
    )
)]
pub async fn list_entities(State(state): State<AppState>) -> Json<EntitiesResponse> {
    let loaded = state.current().await;
    Json(EntitiesResponse::from(loaded.as_ref()))
}

#[utoipa::path(
    post,
    path = "/api/reload",
    tag = "dataset",
    responses(
        (status = 200, description = "Dataset rebuilt from the data directory", body = EntitiesResponse),
        (status = 500, description = "Data directory could not be loaded", body = ErrorResponse)
    )
)]
pub async fn reload(State(state): State<AppState>) -> ApiResult<Json<EntitiesResponse>> {
    let directory = state.config.data.directory.clone();
    let loaded = tokio::task::spawn_blocking(move || load_dataset(&directory))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let response = EntitiesResponse::from(&loaded);
    state.replace(loaded).await;
    log::info!("Dataset reloaded: {} entities", response.entities.len());

    Ok(Json(response))
}

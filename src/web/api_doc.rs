use utoipa::OpenApi;

use super::api::dataset::{EntitiesResponse, EntitySummary};
use super::api::error::ErrorResponse;
use super::api::proximity::{ProximityResponse, SnapshotResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::dataset::list_entities,
        super::api::dataset::reload,
        super::api::proximity::snapshot,
        super::api::proximity::proximity,
    ),
    components(
        schemas(
            EntitiesResponse,
            EntitySummary,
            SnapshotResponse,
            ProximityResponse,
            ErrorResponse,
            crate::geo::Coordinate,
            crate::query::Neighbor,
            crate::ingest::IngestStats,
        )
    ),
    info(
        title = "Prox-O-Mat API",
        description = "Who was near whom, and when",
        version = "0.1.0"
    ),
    tags(
        (name = "dataset", description = "Loaded tracks"),
        (name = "query", description = "Point-in-time position and proximity queries")
    )
)]
pub struct ApiDoc;

use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::pipeline::{load_dataset, LoadedDataset};

use super::api::dataset as dataset_handlers;
use super::api::proximity as proximity_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/entities", get(dataset_handlers::list_entities))
        .route("/api/reload", post(dataset_handlers::reload))
        .route("/api/snapshot", get(proximity_handlers::snapshot))
        .route("/api/proximity", get(proximity_handlers::proximity))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let directory = config.data.directory.clone();

    let loaded = match tokio::task::spawn_blocking(move || load_dataset(&directory)).await {
        Ok(Ok(loaded)) => loaded,
        Ok(Err(e)) => {
            log::warn!("Failed to load dataset, starting empty: {}", e);
            LoadedDataset::default()
        }
        Err(e) => return Err(std::io::Error::other(e)),
    };

    let app = router(AppState::new(config, loaded));

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{http::HeaderValue, routing::get, Router};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{api, datasets, documents, health, observations};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub datasets_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub ontology_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            datasets_dir: config.datasets_dir.clone(),
            catalog_path: config.catalog_path.clone(),
            ontology_path: config.ontology_path.clone(),
        }
    }
}

pub fn create_app(db: DatabaseConnection, config: &AppConfig) -> Result<Router> {
    let state = AppState::new(db, config);

    let cors = match config.cors_origin.as_deref() {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(datasets::overview))
        .route("/health", get(health::health_check))
        // Catalog documents
        .route("/catalog.ttl", get(documents::serve_catalog))
        .route("/ontology.ttl", get(documents::serve_ontology))
        // Dataset pages, downloads and per-table queries
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets/:dataset_id", get(datasets::dataset_detail))
        .route(
            "/datasets/:dataset_id/files/:filename",
            get(datasets::download_file),
        )
        .route(
            "/datasets/:dataset_id/:table_name",
            get(observations::query_observations),
        )
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/observations", get(observations::observations_api))
        .route("/datasets", get(api::list_datasets))
        .route("/datasets/:dataset_id", get(api::get_dataset))
        .route("/compute-nodes", get(api::list_compute_nodes))
        .route("/sensors", get(api::list_sensors))
        .route("/observable-properties", get(api::list_observable_properties))
}

use std::path::Path;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::server::app::AppState;

const TURTLE: &str = "text/turtle; charset=utf-8";

pub async fn serve_catalog(State(state): State<AppState>) -> Response {
    serve_turtle(&state.catalog_path, "catalog.ttl", "Catalog file not found").await
}

pub async fn serve_ontology(State(state): State<AppState>) -> Response {
    match state.ontology_path {
        Some(path) => serve_turtle(&path, "datacenter-ontology.ttl", "Ontology file not found").await,
        None => (StatusCode::NOT_FOUND, "Ontology file not found").into_response(),
    }
}

async fn serve_turtle(path: &Path, filename: &'static str, missing: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(content) => {
            let disposition = format!("inline; filename=\"{}\"", filename);
            (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(TURTLE)),
                    (
                        header::CONTENT_DISPOSITION,
                        HeaderValue::from_str(&disposition)
                            .unwrap_or_else(|_| HeaderValue::from_static("inline")),
                    ),
                ],
                content,
            )
                .into_response()
        }
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            (StatusCode::NOT_FOUND, missing).into_response()
        }
    }
}

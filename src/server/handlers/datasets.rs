use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::errors::QueryError;
use crate::server::app::AppState;
use crate::services::{CatalogOverview, CatalogService, DatasetDetail, ObservationService};

pub async fn overview(State(state): State<AppState>) -> Result<Json<CatalogOverview>, QueryError> {
    let overview = CatalogService::new(state.db).overview().await?;
    Ok(Json(overview))
}

/// Redirect to the first dataset, or an empty listing when there is none.
pub async fn list_datasets(State(state): State<AppState>) -> Result<Response, QueryError> {
    let first = CatalogService::new(state.db).first_dataset().await?;

    match first {
        Some(dataset) => {
            let location = header_value(&format!("/datasets/{}", dataset.dataset_id))?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        None => Ok(Json(json!({ "datasets": [] })).into_response()),
    }
}

pub async fn dataset_detail(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Result<Json<DatasetDetail>, QueryError> {
    let detail = CatalogService::new(state.db)
        .dataset_detail(&dataset_id)
        .await?;
    Ok(Json(detail))
}

pub async fn download_file(
    State(state): State<AppState>,
    Path((dataset_id, filename)): Path<(String, String)>,
) -> Result<Response, QueryError> {
    let resolved = ObservationService::new(state.db, state.datasets_dir)
        .resolve_registered_file(&dataset_id, &filename)
        .await?;
    let body = tokio::fs::read(&resolved.path).await?;

    let disposition = header_value(&format!(
        "attachment; filename=\"{}\"",
        resolved.filename
    ))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub(super) fn header_value(value: &str) -> Result<HeaderValue, QueryError> {
    HeaderValue::from_str(value).map_err(|e| QueryError::Read(e.to_string()))
}

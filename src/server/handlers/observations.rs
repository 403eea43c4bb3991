use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};

use super::datasets::header_value;
use crate::errors::QueryError;
use crate::observations::{FileQueryResponse, QueryParams};
use crate::server::app::AppState;
use crate::services::{DatasetQueryOutput, ObservationService};

/// `GET /datasets/:dataset_id/:table_name`
pub async fn query_observations(
    State(state): State<AppState>,
    Path((dataset_id, table_name)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, QueryError> {
    let params = QueryParams::new(params);
    let output = ObservationService::new(state.db, state.datasets_dir)
        .query_dataset(&dataset_id, &table_name, &params)
        .await?;

    match output {
        DatasetQueryOutput::Json(body) => Ok(Json(body).into_response()),
        DatasetQueryOutput::Csv { filename, body } => {
            let disposition = header_value(&format!("attachment; filename=\"{}\"", filename))?;
            Ok((
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
    }
}

/// `GET /api/observations?file=...`
pub async fn observations_api(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<FileQueryResponse>, QueryError> {
    let params = QueryParams::new(params);
    let response = ObservationService::new(state.db, state.datasets_dir)
        .query_file(&params)
        .await?;
    Ok(Json(response))
}

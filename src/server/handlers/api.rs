use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::database::compute_nodes;
use crate::errors::QueryError;
use crate::server::app::AppState;
use crate::services::{
    CatalogService, ComputeNodeFilter, DatasetFilter, DatasetView, ObservablePropertyView,
    PropertyFilter, SensorFilter, SensorView,
};

pub async fn list_datasets(
    State(state): State<AppState>,
    Query(filter): Query<DatasetFilter>,
) -> Result<Json<Vec<DatasetView>>, QueryError> {
    let datasets = CatalogService::new(state.db).list_datasets(&filter).await?;
    Ok(Json(datasets))
}

pub async fn get_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Result<Json<DatasetView>, QueryError> {
    let dataset = CatalogService::new(state.db).dataset(&dataset_id).await?;
    Ok(Json(dataset))
}

pub async fn list_compute_nodes(
    State(state): State<AppState>,
    Query(filter): Query<ComputeNodeFilter>,
) -> Result<Json<Vec<compute_nodes::Model>>, QueryError> {
    let nodes = CatalogService::new(state.db)
        .list_compute_nodes(&filter)
        .await?;
    Ok(Json(nodes))
}

pub async fn list_sensors(
    State(state): State<AppState>,
    Query(filter): Query<SensorFilter>,
) -> Result<Json<Vec<SensorView>>, QueryError> {
    let sensors = CatalogService::new(state.db).list_sensors(&filter).await?;
    Ok(Json(sensors))
}

pub async fn list_observable_properties(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<ObservablePropertyView>>, QueryError> {
    let properties = CatalogService::new(state.db)
        .list_observable_properties(&filter)
        .await?;
    Ok(Json(properties))
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A file holding observations for a dataset (DCAT Distribution).
///
/// Unique per (`dataset_id`, `filename`). `file_size` and `row_count` are
/// computed once at ingestion and stay null when the file was absent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dataset_id: i32,
    pub filename: String,
    pub file_format: String,
    pub media_type: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub row_count: Option<i64>,
    pub description: String,
    pub sensor_type_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monitoring_datasets::Entity",
        from = "Column::DatasetId",
        to = "super::monitoring_datasets::Column::Id",
        on_delete = "Cascade"
    )]
    MonitoringDatasets,
    #[sea_orm(
        belongs_to = "super::sensor_types::Entity",
        from = "Column::SensorTypeId",
        to = "super::sensor_types::Column::Id",
        on_delete = "Restrict"
    )]
    SensorTypes,
}

impl Related<super::monitoring_datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoringDatasets.def()
    }
}

impl Related<super::sensor_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

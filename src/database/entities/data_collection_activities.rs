use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Provenance of a data collection run (PROV-O Activity)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_collection_activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub activity_id: String,
    pub activity_type: String,
    pub start_time: Option<ChronoDateTimeUtc>,
    pub end_time: Option<ChronoDateTimeUtc>,
    pub description: String,
    pub dataset_id: i32,
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
    #[sea_orm(has_many = "super::activity_agents::Entity")]
    ActivityAgents,
}

impl Related<super::monitoring_datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoringDatasets.def()
    }
}

impl Related<super::activity_agents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityAgents.def()
    }
}

impl Related<super::agents::Entity> for Entity {
    fn to() -> RelationDef {
        super::activity_agents::Relation::Agents.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::activity_agents::Relation::Activities.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

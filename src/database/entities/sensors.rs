use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sensor instance deployed on a compute node (SOSA Sensor)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sensor_id: String,
    pub sensor_type_id: i32,
    pub compute_node_id: i32,
    pub device_name: String,
    pub interface_name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sensor_types::Entity",
        from = "Column::SensorTypeId",
        to = "super::sensor_types::Column::Id",
        on_delete = "Restrict"
    )]
    SensorTypes,
    #[sea_orm(
        belongs_to = "super::compute_nodes::Entity",
        from = "Column::ComputeNodeId",
        to = "super::compute_nodes::Column::Id",
        on_delete = "Cascade"
    )]
    ComputeNodes,
}

impl Related<super::sensor_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorTypes.def()
    }
}

impl Related<super::compute_nodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComputeNodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

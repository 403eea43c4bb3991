use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Software, person or organisation taking part in an activity (PROV-O Agent)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub agent_id: String,
    pub name: String,
    pub agent_type: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activity_agents::Entity")]
    ActivityAgents,
}

impl Related<super::activity_agents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityAgents.def()
    }
}

impl Related<super::data_collection_activities::Entity> for Entity {
    fn to() -> RelationDef {
        super::activity_agents::Relation::Activities.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::activity_agents::Relation::Agents.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentType {
    Software,
    Person,
    Organization,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Software => "SOFTWARE",
            AgentType::Person => "PERSON",
            AgentType::Organization => "ORGANIZATION",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

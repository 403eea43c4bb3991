use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// A collection of monitoring data (DCAT Dataset)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monitoring_datasets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub dataset_id: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<ChronoDate>,
    pub end_date: Option<ChronoDate>,
    pub issued: ChronoDate,
    pub modified: ChronoDateTimeUtc,
    pub license_name: String,
    pub license_url: String,
    pub creator_name: String,
    pub creator_email: String,
    pub publisher_name: String,
    pub keywords: String, // comma separated
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::data_files::Entity")]
    DataFiles,
    #[sea_orm(has_many = "super::data_collection_activities::Entity")]
    Activities,
}

impl Related<super::data_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataFiles.def()
    }
}

impl Related<super::data_collection_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

/// `issued` is stamped once on insert and `modified` on every save; callers
/// never set either.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.issued = Set(now.date_naive());
        }
        self.modified = Set(now);
        Ok(self)
    }
}

impl Model {
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }
}

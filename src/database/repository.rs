use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

use super::entities::{
    activity_agents, agents, compute_nodes, data_collection_activities, data_files,
    monitoring_datasets, observable_properties, sensor_types, sensors, AgentType, DataType,
    SensorKind,
};

/// Catalog rows keyed on their external identifiers.
///
/// Every write is an explicit lookup followed by an insert (or, for
/// datasets, an update). The returned flag is `true` when a row was created.
#[derive(Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewComputeNode {
    pub hostname: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewObservableProperty {
    pub property_name: String,
    pub label: String,
    pub description: String,
    pub unit: String,
    pub qudt_unit_uri: String,
    pub data_type: DataType,
    pub sensor_type_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewAgent {
    pub agent_id: String,
    pub name: String,
    pub agent_type: AgentType,
}

#[derive(Debug, Clone)]
pub struct NewSensor {
    pub sensor_id: String,
    pub sensor_type_id: i32,
    pub compute_node_id: i32,
    pub device_name: String,
    pub description: String,
}

/// Dataset attributes written on every ingestion run
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetFields {
    pub dataset_id: String,
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub license_name: String,
    pub license_url: String,
    pub creator_name: String,
    pub creator_email: String,
    pub publisher_name: String,
    pub keywords: String,
}

#[derive(Debug, Clone)]
pub struct NewDataFile {
    pub filename: String,
    pub file_format: String,
    pub media_type: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub row_count: Option<i64>,
    pub description: String,
    pub sensor_type_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_id: String,
    pub activity_type: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub description: String,
}

impl CatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_or_create_compute_node(
        &self,
        node: NewComputeNode,
    ) -> Result<(compute_nodes::Model, bool), DbErr> {
        if let Some(existing) = self.find_compute_node(&node.hostname).await? {
            return Ok((existing, false));
        }

        let created = compute_nodes::ActiveModel {
            hostname: Set(node.hostname),
            location: Set(node.location),
            description: Set(node.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    pub async fn find_compute_node(
        &self,
        hostname: &str,
    ) -> Result<Option<compute_nodes::Model>, DbErr> {
        compute_nodes::Entity::find()
            .filter(compute_nodes::Column::Hostname.eq(hostname))
            .one(&self.db)
            .await
    }

    pub async fn get_or_create_sensor_type(
        &self,
        kind: SensorKind,
    ) -> Result<(sensor_types::Model, bool), DbErr> {
        if let Some(existing) = self.find_sensor_type(kind).await? {
            return Ok((existing, false));
        }

        let created = sensor_types::ActiveModel {
            name: Set(kind.as_str().to_string()),
            description: Set(kind.description().to_string()),
            sosa_uri: Set(String::new()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    pub async fn find_sensor_type(
        &self,
        kind: SensorKind,
    ) -> Result<Option<sensor_types::Model>, DbErr> {
        sensor_types::Entity::find()
            .filter(sensor_types::Column::Name.eq(kind.as_str()))
            .one(&self.db)
            .await
    }

    pub async fn get_or_create_observable_property(
        &self,
        property: NewObservableProperty,
    ) -> Result<(observable_properties::Model, bool), DbErr> {
        let existing = observable_properties::Entity::find()
            .filter(observable_properties::Column::PropertyName.eq(property.property_name.as_str()))
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        let created = observable_properties::ActiveModel {
            property_name: Set(property.property_name),
            label: Set(property.label),
            description: Set(property.description),
            unit: Set(property.unit),
            qudt_unit_uri: Set(property.qudt_unit_uri),
            data_type: Set(property.data_type.as_str().to_string()),
            sensor_type_id: Set(property.sensor_type_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    pub async fn get_or_create_agent(
        &self,
        agent: NewAgent,
    ) -> Result<(agents::Model, bool), DbErr> {
        if let Some(existing) = self.find_agent(&agent.agent_id).await? {
            return Ok((existing, false));
        }

        let created = agents::ActiveModel {
            agent_id: Set(agent.agent_id),
            name: Set(agent.name),
            agent_type: Set(agent.agent_type.as_str().to_string()),
            version: Set(String::new()),
            description: Set(String::new()),
            homepage: Set(String::new()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    pub async fn find_agent(&self, agent_id: &str) -> Result<Option<agents::Model>, DbErr> {
        agents::Entity::find()
            .filter(agents::Column::AgentId.eq(agent_id))
            .one(&self.db)
            .await
    }

    pub async fn get_or_create_sensor(
        &self,
        sensor: NewSensor,
    ) -> Result<(sensors::Model, bool), DbErr> {
        let existing = sensors::Entity::find()
            .filter(sensors::Column::SensorId.eq(sensor.sensor_id.as_str()))
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        let created = sensors::ActiveModel {
            sensor_id: Set(sensor.sensor_id),
            sensor_type_id: Set(sensor.sensor_type_id),
            compute_node_id: Set(sensor.compute_node_id),
            device_name: Set(sensor.device_name),
            interface_name: Set(String::new()),
            description: Set(sensor.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    /// Upsert keyed on `dataset_id`; an existing row is updated in place.
    pub async fn update_or_create_dataset(
        &self,
        fields: DatasetFields,
    ) -> Result<(monitoring_datasets::Model, bool), DbErr> {
        let existing = self.find_dataset(&fields.dataset_id).await?;

        match existing {
            Some(existing) => {
                let mut dataset = existing.into_active_model();
                dataset.title = Set(fields.title);
                dataset.description = Set(fields.description);
                dataset.start_date = Set(fields.start_date);
                dataset.end_date = Set(fields.end_date);
                dataset.license_name = Set(fields.license_name);
                dataset.license_url = Set(fields.license_url);
                dataset.creator_name = Set(fields.creator_name);
                dataset.creator_email = Set(fields.creator_email);
                dataset.publisher_name = Set(fields.publisher_name);
                dataset.keywords = Set(fields.keywords);
                Ok((dataset.update(&self.db).await?, false))
            }
            None => {
                let created = monitoring_datasets::ActiveModel {
                    dataset_id: Set(fields.dataset_id),
                    title: Set(fields.title),
                    description: Set(fields.description),
                    start_date: Set(fields.start_date),
                    end_date: Set(fields.end_date),
                    license_name: Set(fields.license_name),
                    license_url: Set(fields.license_url),
                    creator_name: Set(fields.creator_name),
                    creator_email: Set(fields.creator_email),
                    publisher_name: Set(fields.publisher_name),
                    keywords: Set(fields.keywords),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                Ok((created, true))
            }
        }
    }

    pub async fn find_dataset(
        &self,
        dataset_id: &str,
    ) -> Result<Option<monitoring_datasets::Model>, DbErr> {
        monitoring_datasets::Entity::find()
            .filter(monitoring_datasets::Column::DatasetId.eq(dataset_id))
            .one(&self.db)
            .await
    }

    /// Keyed on (dataset, filename). Stats of an existing row are left alone.
    pub async fn get_or_create_data_file(
        &self,
        dataset: &monitoring_datasets::Model,
        file: NewDataFile,
    ) -> Result<(data_files::Model, bool), DbErr> {
        if let Some(existing) = self.find_data_file(dataset.id, &file.filename).await? {
            return Ok((existing, false));
        }

        let created = data_files::ActiveModel {
            dataset_id: Set(dataset.id),
            filename: Set(file.filename),
            file_format: Set(file.file_format),
            media_type: Set(file.media_type),
            file_path: Set(file.file_path),
            file_size: Set(file.file_size),
            row_count: Set(file.row_count),
            description: Set(file.description),
            sensor_type_id: Set(file.sensor_type_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    pub async fn find_data_file(
        &self,
        dataset_pk: i32,
        filename: &str,
    ) -> Result<Option<data_files::Model>, DbErr> {
        data_files::Entity::find()
            .filter(data_files::Column::DatasetId.eq(dataset_pk))
            .filter(data_files::Column::Filename.eq(filename))
            .one(&self.db)
            .await
    }

    /// Keyed on `activity_id`; the dataset only matters when the row is created.
    pub async fn get_or_create_activity(
        &self,
        dataset: &monitoring_datasets::Model,
        activity: NewActivity,
    ) -> Result<(data_collection_activities::Model, bool), DbErr> {
        let existing = data_collection_activities::Entity::find()
            .filter(data_collection_activities::Column::ActivityId.eq(activity.activity_id.as_str()))
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        let created = data_collection_activities::ActiveModel {
            activity_id: Set(activity.activity_id),
            activity_type: Set(activity.activity_type),
            start_time: Set(activity.start_time),
            end_time: Set(activity.end_time),
            description: Set(activity.description),
            dataset_id: Set(dataset.id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok((created, true))
    }

    /// Returns `false` when the link already existed.
    pub async fn link_agent(
        &self,
        activity: &data_collection_activities::Model,
        agent: &agents::Model,
    ) -> Result<bool, DbErr> {
        let existing = activity_agents::Entity::find_by_id((activity.id, agent.id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        activity_agents::ActiveModel {
            activity_id: Set(activity.id),
            agent_id: Set(agent.id),
        }
        .insert(&self.db)
        .await?;

        Ok(true)
    }

    /// Delete every catalog row, children before parents.
    pub async fn clear_all(&self) -> Result<(), DbErr> {
        activity_agents::Entity::delete_many().exec(&self.db).await?;
        data_collection_activities::Entity::delete_many()
            .exec(&self.db)
            .await?;
        data_files::Entity::delete_many().exec(&self.db).await?;
        monitoring_datasets::Entity::delete_many()
            .exec(&self.db)
            .await?;
        sensors::Entity::delete_many().exec(&self.db).await?;
        observable_properties::Entity::delete_many()
            .exec(&self.db)
            .await?;
        sensor_types::Entity::delete_many().exec(&self.db).await?;
        agents::Entity::delete_many().exec(&self.db).await?;
        compute_nodes::Entity::delete_many().exec(&self.db).await?;
        Ok(())
    }
}

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order, QueryFilter,
    QueryOrder, Select,
};
use serde::{Deserialize, Serialize};

use crate::database::entities::{
    agents, compute_nodes, data_collection_activities, data_files, monitoring_datasets,
    observable_properties, sensor_types, sensors,
};
use crate::errors::{QueryError, QueryResult};

/// Keywords with a curated reference page; others link to Wikipedia.
const KEYWORD_URLS: &[(&str, &str)] = &[
    (
        "IPMI",
        "https://en.wikipedia.org/wiki/Intelligent_Platform_Management_Interface",
    ),
    ("InfiniBand", "https://en.wikipedia.org/wiki/InfiniBand"),
    ("QuestDB", "https://questdb.com/"),
    ("Telegraf", "https://github.com/influxdata/telegraf"),
    ("monitoring", "https://en.wikipedia.org/wiki/System_monitor"),
    ("network", "https://en.wikipedia.org/wiki/Computer_network"),
    ("disk", "https://en.wikipedia.org/wiki/Disk_storage"),
    ("memory", "https://en.wikipedia.org/wiki/Random-access_memory"),
];

const WIKIPEDIA_BASE: &str = "https://en.wikipedia.org/wiki/";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataFileView {
    pub id: i32,
    pub filename: String,
    pub file_format: String,
    pub media_type: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub row_count: Option<i64>,
    pub description: String,
}

impl From<data_files::Model> for DataFileView {
    fn from(file: data_files::Model) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            file_format: file.file_format,
            media_type: file.media_type,
            file_path: file.file_path,
            file_size: file.file_size,
            row_count: file.row_count,
            description: file.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityView {
    pub id: i32,
    pub activity_id: String,
    pub activity_type: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub description: String,
    pub agents: Vec<agents::Model>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetView {
    #[serde(flatten)]
    pub dataset: monitoring_datasets::Model,
    pub data_files: Vec<DataFileView>,
    pub activities: Vec<ActivityView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeywordLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetDetail {
    #[serde(flatten)]
    pub view: DatasetView,
    pub keyword_links: Vec<KeywordLink>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetSummary {
    pub dataset_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogOverview {
    pub datasets: Vec<DatasetSummary>,
    pub compute_nodes: Vec<compute_nodes::Model>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensorView {
    pub id: i32,
    pub sensor_id: String,
    pub sensor_type: i32,
    pub sensor_type_name: String,
    pub compute_node: i32,
    pub hostname: String,
    pub device_name: String,
    pub interface_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObservablePropertyView {
    pub id: i32,
    pub property_name: String,
    pub label: String,
    pub description: String,
    pub unit: String,
    pub qudt_unit_uri: String,
    pub data_type: String,
    pub sensor_type: i32,
    pub sensor_type_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetFilter {
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub issued: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputeNodeFilter {
    pub search: Option<String>,
}

/// `sensor_type` and `compute_node` accept a row id or a name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorFilter {
    pub sensor_type: Option<String>,
    pub compute_node: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilter {
    pub sensor_type: Option<String>,
}

/// Read-only views over the catalog tables.
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn overview(&self) -> QueryResult<CatalogOverview> {
        let datasets = monitoring_datasets::Entity::find()
            .order_by_asc(monitoring_datasets::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|dataset| DatasetSummary {
                dataset_id: dataset.dataset_id,
                title: dataset.title,
                description: dataset.description,
            })
            .collect();
        let compute_nodes = compute_nodes::Entity::find()
            .order_by_asc(compute_nodes::Column::Hostname)
            .all(&self.db)
            .await?;

        Ok(CatalogOverview {
            datasets,
            compute_nodes,
        })
    }

    pub async fn first_dataset(&self) -> QueryResult<Option<monitoring_datasets::Model>> {
        Ok(monitoring_datasets::Entity::find()
            .order_by_asc(monitoring_datasets::Column::Id)
            .one(&self.db)
            .await?)
    }

    pub async fn list_datasets(&self, filter: &DatasetFilter) -> QueryResult<Vec<DatasetView>> {
        let mut query = monitoring_datasets::Entity::find();

        if let Some(term) = non_empty(&filter.search) {
            query = query.filter(
                Condition::any()
                    .add(monitoring_datasets::Column::Title.contains(term))
                    .add(monitoring_datasets::Column::Description.contains(term))
                    .add(monitoring_datasets::Column::Keywords.contains(term))
                    .add(monitoring_datasets::Column::DatasetId.contains(term)),
            );
        }
        if let Some(date) = parse_date_param("start_date", &filter.start_date)? {
            query = query.filter(monitoring_datasets::Column::StartDate.eq(date));
        }
        if let Some(date) = parse_date_param("end_date", &filter.end_date)? {
            query = query.filter(monitoring_datasets::Column::EndDate.eq(date));
        }
        if let Some(date) = parse_date_param("issued", &filter.issued)? {
            query = query.filter(monitoring_datasets::Column::Issued.eq(date));
        }

        let query = apply_ordering(query, filter.ordering.as_deref());

        let mut views = Vec::new();
        for dataset in query.all(&self.db).await? {
            views.push(self.dataset_view(dataset).await?);
        }
        Ok(views)
    }

    pub async fn dataset(&self, dataset_id: &str) -> QueryResult<DatasetView> {
        let dataset = monitoring_datasets::Entity::find()
            .filter(monitoring_datasets::Column::DatasetId.eq(dataset_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| QueryError::DatasetNotFound(dataset_id.to_string()))?;
        self.dataset_view(dataset).await
    }

    pub async fn dataset_detail(&self, dataset_id: &str) -> QueryResult<DatasetDetail> {
        let view = self.dataset(dataset_id).await?;
        let keyword_links = view
            .dataset
            .keyword_list()
            .into_iter()
            .map(|keyword| KeywordLink {
                text: keyword.to_string(),
                url: keyword_url(keyword),
            })
            .collect();
        Ok(DatasetDetail {
            view,
            keyword_links,
        })
    }

    async fn dataset_view(&self, dataset: monitoring_datasets::Model) -> QueryResult<DatasetView> {
        let data_files = dataset
            .find_related(data_files::Entity)
            .order_by_asc(data_files::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(DataFileView::from)
            .collect();

        let mut activities = Vec::new();
        for activity in dataset
            .find_related(data_collection_activities::Entity)
            .order_by_asc(data_collection_activities::Column::Id)
            .all(&self.db)
            .await?
        {
            let agents = activity
                .find_related(agents::Entity)
                .order_by_asc(agents::Column::Id)
                .all(&self.db)
                .await?;
            activities.push(ActivityView {
                id: activity.id,
                activity_id: activity.activity_id,
                activity_type: activity.activity_type,
                start_time: activity.start_time,
                end_time: activity.end_time,
                description: activity.description,
                agents,
            });
        }

        Ok(DatasetView {
            dataset,
            data_files,
            activities,
        })
    }

    pub async fn list_compute_nodes(
        &self,
        filter: &ComputeNodeFilter,
    ) -> QueryResult<Vec<compute_nodes::Model>> {
        let mut query = compute_nodes::Entity::find().order_by_asc(compute_nodes::Column::Id);
        if let Some(term) = non_empty(&filter.search) {
            query = query.filter(compute_nodes::Column::Hostname.contains(term));
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn list_sensors(&self, filter: &SensorFilter) -> QueryResult<Vec<SensorView>> {
        let types = self.sensor_types_by_id().await?;
        let nodes: HashMap<i32, compute_nodes::Model> = compute_nodes::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|node| (node.id, node))
            .collect();

        let mut query = sensors::Entity::find().order_by_asc(sensors::Column::Id);

        if let Some(value) = non_empty(&filter.sensor_type) {
            let ids = matching_ids(value, types.values().map(|t| (t.id, t.name.as_str())));
            query = query.filter(sensors::Column::SensorTypeId.is_in(ids));
        }
        if let Some(value) = non_empty(&filter.compute_node) {
            let ids = matching_ids(value, nodes.values().map(|n| (n.id, n.hostname.as_str())));
            query = query.filter(sensors::Column::ComputeNodeId.is_in(ids));
        }
        if let Some(term) = non_empty(&filter.search) {
            let lowered = term.to_lowercase();
            let type_ids: Vec<i32> = types
                .values()
                .filter(|t| t.name.to_lowercase().contains(&lowered))
                .map(|t| t.id)
                .collect();
            query = query.filter(
                Condition::any()
                    .add(sensors::Column::SensorId.contains(term))
                    .add(sensors::Column::SensorTypeId.is_in(type_ids)),
            );
        }

        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|sensor| SensorView {
                id: sensor.id,
                sensor_type_name: types
                    .get(&sensor.sensor_type_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                hostname: nodes
                    .get(&sensor.compute_node_id)
                    .map(|n| n.hostname.clone())
                    .unwrap_or_default(),
                sensor_id: sensor.sensor_id,
                sensor_type: sensor.sensor_type_id,
                compute_node: sensor.compute_node_id,
                device_name: sensor.device_name,
                interface_name: sensor.interface_name,
                description: sensor.description,
            })
            .collect())
    }

    pub async fn list_observable_properties(
        &self,
        filter: &PropertyFilter,
    ) -> QueryResult<Vec<ObservablePropertyView>> {
        let types = self.sensor_types_by_id().await?;

        let mut query =
            observable_properties::Entity::find().order_by_asc(observable_properties::Column::Id);
        if let Some(value) = non_empty(&filter.sensor_type) {
            let ids = matching_ids(value, types.values().map(|t| (t.id, t.name.as_str())));
            query = query.filter(observable_properties::Column::SensorTypeId.is_in(ids));
        }

        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|property| ObservablePropertyView {
                id: property.id,
                sensor_type_name: types
                    .get(&property.sensor_type_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                property_name: property.property_name,
                label: property.label,
                description: property.description,
                unit: property.unit,
                qudt_unit_uri: property.qudt_unit_uri,
                data_type: property.data_type,
                sensor_type: property.sensor_type_id,
            })
            .collect())
    }

    async fn sensor_types_by_id(&self) -> QueryResult<HashMap<i32, sensor_types::Model>> {
        Ok(sensor_types::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|sensor_type| (sensor_type.id, sensor_type))
            .collect())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date_param(name: &str, value: &Option<String>) -> QueryResult<Option<NaiveDate>> {
    match non_empty(value) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::invalid(name, raw)),
        None => Ok(None),
    }
}

/// Ids whose row id equals `value` when numeric, otherwise whose name does
/// (case-insensitively).
fn matching_ids<'a>(value: &str, rows: impl Iterator<Item = (i32, &'a str)>) -> Vec<i32> {
    let id = value.parse::<i32>().ok();
    rows.filter(|(row_id, name)| Some(*row_id) == id || name.eq_ignore_ascii_case(value))
        .map(|(row_id, _)| row_id)
        .collect()
}

/// Comma separated fields, `-` prefix for descending. Unknown fields are
/// ignored; with none left the newest datasets come first.
fn apply_ordering(
    mut query: Select<monitoring_datasets::Entity>,
    ordering: Option<&str>,
) -> Select<monitoring_datasets::Entity> {
    let mut applied = false;
    for field in ordering.unwrap_or_default().split(',').map(str::trim) {
        let (name, order) = match field.strip_prefix('-') {
            Some(name) => (name, Order::Desc),
            None => (field, Order::Asc),
        };
        let column = match name {
            "issued" => monitoring_datasets::Column::Issued,
            "modified" => monitoring_datasets::Column::Modified,
            "start_date" => monitoring_datasets::Column::StartDate,
            "end_date" => monitoring_datasets::Column::EndDate,
            "title" => monitoring_datasets::Column::Title,
            _ => continue,
        };
        query = query.order_by(column, order);
        applied = true;
    }

    if !applied {
        query = query.order_by_desc(monitoring_datasets::Column::Issued);
    }
    query.order_by_asc(monitoring_datasets::Column::Id)
}

pub fn keyword_url(keyword: &str) -> String {
    if let Some((_, url)) = KEYWORD_URLS.iter().find(|(known, _)| *known == keyword) {
        return url.to_string();
    }
    // Article titles keep '/' literal
    let article = urlencoding::encode(&keyword.replace(' ', "_")).replace("%2F", "/");
    format!("{}{}", WIKIPEDIA_BASE, article)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_urls() {
        assert_eq!(keyword_url("IPMI"), KEYWORD_URLS[0].1);
        assert_eq!(
            keyword_url("time series"),
            "https://en.wikipedia.org/wiki/time_series"
        );
        assert_eq!(keyword_url("C++"), "https://en.wikipedia.org/wiki/C%2B%2B");
        assert_eq!(keyword_url("TCP/IP"), "https://en.wikipedia.org/wiki/TCP/IP");
        assert_eq!(keyword_url("a~b"), "https://en.wikipedia.org/wiki/a~b");
        assert_eq!(keyword_url("x*y"), "https://en.wikipedia.org/wiki/x%2Ay");
    }

    #[test]
    fn test_matching_ids_by_id_or_name() {
        let rows = [(1, "CPU"), (2, "MEMORY"), (3, "LINUX_CPU")];
        assert_eq!(matching_ids("2", rows.iter().copied()), vec![2]);
        assert_eq!(matching_ids("cpu", rows.iter().copied()), vec![1]);
        assert!(matching_ids("DISK_IO", rows.iter().copied()).is_empty());
    }

    #[test]
    fn test_invalid_date_filter() {
        let err = parse_date_param("issued", &Some("yesterday".to_string())).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(parse_date_param("issued", &None).unwrap(), None);
    }
}

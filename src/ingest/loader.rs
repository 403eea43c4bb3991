use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::inference::{
    agent_type, license_name, parse_date, parse_datetime, sensor_kind_for_filename,
    sensor_kind_for_property, uri_tail, DEFAULT_LICENSE_URL,
};
use super::stats::file_stats;
use crate::database::repository::{
    DatasetFields, NewActivity, NewAgent, NewDataFile, NewObservableProperty, NewSensor,
};
use crate::database::seed_data::{seed_reference_data, KNOWN_COMPUTE_NODES};
use crate::database::{monitoring_datasets, CatalogRepository, DataType, SensorKind};
use crate::errors::{IngestError, IngestResult};
use crate::rdf::vocab::{dcat, dct, foaf, prov, qudt, sosa, DCM, RDFS_COMMENT, RDFS_LABEL};
use crate::rdf::{CatalogGraph, RdfTerm};

const DEFAULT_UNIT: &str = "dimensionless";
const DEFAULT_CREATOR: &str = "Unknown";
const DEFAULT_PUBLISHER: &str = "Area Science Park";
const DEFAULT_ACTIVITY_TYPE: &str = "Data Collection Activity";

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub catalog_path: PathBuf,
    pub datasets_dir: PathBuf,
    /// Delete every catalog row before loading
    pub clear: bool,
}

impl IngestOptions {
    /// Fail when the catalog or the data directory is missing. Needs no
    /// database, so callers can run it before opening the store.
    pub fn check_inputs(&self) -> IngestResult<()> {
        if !self.catalog_path.exists() {
            return Err(IngestError::CatalogNotFound(self.catalog_path.clone()));
        }
        if !self.datasets_dir.exists() {
            return Err(IngestError::DatasetsDirNotFound(self.datasets_dir.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub created: usize,
    /// Rows that already existed (updated in place for datasets)
    pub existing: usize,
    pub skipped: usize,
}

impl EntityCounts {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestFailure {
    pub entity: String,
    pub message: String,
}

/// What one ingestion run did.
#[derive(Debug, Default, Clone, Serialize)]
pub struct IngestReport {
    pub triples: usize,
    pub cleared: bool,
    pub compute_nodes: EntityCounts,
    pub sensor_types: EntityCounts,
    pub observable_properties: EntityCounts,
    pub agents: EntityCounts,
    pub sensors: EntityCounts,
    pub datasets: EntityCounts,
    pub data_files: EntityCounts,
    pub activities: EntityCounts,
    pub agent_links: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn fail(&mut self, entity: impl Into<String>, error: &IngestError) {
        let entity = entity.into();
        warn!("Failed to load {}: {}", entity, error);
        self.failures.push(IngestFailure {
            entity,
            message: error.to_string(),
        });
    }
}

/// Maps a Turtle catalog onto the relational store.
pub struct CatalogLoader {
    repo: CatalogRepository,
}

impl CatalogLoader {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    /// Check the inputs, optionally clear the store, then ingest the catalog.
    pub async fn load(&self, options: &IngestOptions) -> IngestResult<IngestReport> {
        options.check_inputs()?;

        info!("Loading catalog from {}", options.catalog_path.display());
        let graph = CatalogGraph::from_turtle_file(&options.catalog_path)?;
        info!("Loaded {} triples", graph.len());

        if options.clear {
            info!("Clearing existing data");
            self.repo.clear_all().await?;
        }

        let mut report = self.ingest_graph(&graph, &options.datasets_dir).await?;
        report.cleared = options.clear;
        Ok(report)
    }

    /// Ingest an already parsed catalog. Files are resolved under `datasets_dir`.
    pub async fn ingest_graph(
        &self,
        graph: &CatalogGraph,
        datasets_dir: &Path,
    ) -> IngestResult<IngestReport> {
        let mut report = IngestReport {
            triples: graph.len(),
            ..Default::default()
        };

        let seeded = seed_reference_data(&self.repo).await?;
        report.compute_nodes.created = seeded.compute_nodes_created;
        report.compute_nodes.existing = KNOWN_COMPUTE_NODES.len() - seeded.compute_nodes_created;
        report.sensor_types.created = seeded.sensor_types_created;
        report.sensor_types.existing = SensorKind::ALL.len() - seeded.sensor_types_created;

        let sensor_types = self.sensor_type_ids().await?;

        self.load_observable_properties(graph, &sensor_types, &mut report)
            .await;
        self.load_agents(graph, &mut report).await;
        self.load_sensors(graph, &sensor_types, &mut report).await;

        for subject in graph.subjects_of_type(dcat::DATASET) {
            let label = subject.value().to_string();
            if let Err(e) = self
                .load_dataset(graph, subject, datasets_dir, &sensor_types, &mut report)
                .await
            {
                report.fail(format!("dataset {}", label), &e);
            }
        }

        Ok(report)
    }

    async fn sensor_type_ids(&self) -> IngestResult<HashMap<SensorKind, i32>> {
        let mut ids = HashMap::new();
        for kind in SensorKind::ALL {
            let sensor_type = self
                .repo
                .find_sensor_type(kind)
                .await?
                .ok_or_else(|| IngestError::MissingSensorType(kind.to_string()))?;
            ids.insert(kind, sensor_type.id);
        }
        Ok(ids)
    }

    async fn load_observable_properties(
        &self,
        graph: &CatalogGraph,
        sensor_types: &HashMap<SensorKind, i32>,
        report: &mut IngestReport,
    ) {
        for subject in graph.subjects_of_type(sosa::OBSERVABLE_PROPERTY) {
            let Some(label) = graph.value(subject, RDFS_LABEL) else {
                continue;
            };
            let Some(kind) = sensor_kind_for_property(label) else {
                debug!("No sensor type matches property '{}', skipping", label);
                report.observable_properties.skipped += 1;
                continue;
            };

            let unit = graph.object(subject, qudt::HAS_UNIT);
            let property = NewObservableProperty {
                property_name: uri_tail(subject.value()).to_string(),
                label: label.to_string(),
                description: label.to_string(),
                unit: unit
                    .and_then(|unit| graph.value(unit, RDFS_LABEL))
                    .unwrap_or(DEFAULT_UNIT)
                    .to_string(),
                qudt_unit_uri: unit.map(RdfTerm::value).unwrap_or_default().to_string(),
                data_type: DataType::Float,
                sensor_type_id: sensor_types[&kind],
            };

            let name = property.property_name.clone();
            match self.repo.get_or_create_observable_property(property).await {
                Ok((_, created)) => report.observable_properties.record(created),
                Err(e) => report.fail(format!("observable property {}", name), &e.into()),
            }
        }

        info!(
            "Observable properties: {} created, {} skipped",
            report.observable_properties.created, report.observable_properties.skipped
        );
    }

    async fn load_agents(&self, graph: &CatalogGraph, report: &mut IngestReport) {
        for subject in graph.subjects_of_type(prov::AGENT) {
            let Some(iri) = subject.as_iri() else {
                continue;
            };
            let Some(name) = graph.value(subject, foaf::NAME) else {
                continue;
            };
            let types = graph
                .types(subject)
                .into_iter()
                .filter(|type_iri| *type_iri != prov::AGENT);

            let agent = NewAgent {
                agent_id: uri_tail(iri).to_string(),
                name: name.to_string(),
                agent_type: agent_type(types),
            };

            match self.repo.get_or_create_agent(agent).await {
                Ok((agent, created)) => {
                    if created {
                        info!("Created agent: {} ({})", agent.name, agent.agent_type);
                    }
                    report.agents.record(created);
                }
                Err(e) => report.fail(format!("agent {}", iri), &e.into()),
            }
        }
    }

    async fn load_sensors(
        &self,
        graph: &CatalogGraph,
        sensor_types: &HashMap<SensorKind, i32>,
        report: &mut IngestReport,
    ) {
        for subject in graph.subjects_of_type(sosa::SENSOR) {
            let Some(iri) = subject.as_iri() else {
                continue;
            };
            match self.load_sensor(graph, subject, iri, sensor_types).await {
                Ok(Some(created)) => report.sensors.record(created),
                Ok(None) => report.sensors.skipped += 1,
                Err(e) => report.fail(format!("sensor {}", iri), &e),
            }
        }
    }

    /// `Ok(None)` when the host is unknown or no sensor type can be inferred.
    async fn load_sensor(
        &self,
        graph: &CatalogGraph,
        subject: &RdfTerm,
        iri: &str,
        sensor_types: &HashMap<SensorKind, i32>,
    ) -> IngestResult<Option<bool>> {
        let sensor_id = uri_tail(iri);
        let label = graph.value(subject, RDFS_LABEL);

        let kind = label
            .and_then(sensor_kind_for_filename)
            .or_else(|| sensor_kind_for_filename(sensor_id));
        let Some(kind) = kind else {
            debug!("No sensor type matches sensor '{}', skipping", sensor_id);
            return Ok(None);
        };

        let mut node = None;
        for host in graph.objects(subject, sosa::IS_HOSTED_BY) {
            for candidate in host_names(graph, host) {
                if let Some(found) = self.repo.find_compute_node(candidate).await? {
                    node = Some(found);
                    break;
                }
            }
            if node.is_some() {
                break;
            }
        }
        let Some(node) = node else {
            debug!("Sensor '{}' is not hosted on a known compute node", sensor_id);
            return Ok(None);
        };

        let (_, created) = self
            .repo
            .get_or_create_sensor(NewSensor {
                sensor_id: sensor_id.to_string(),
                sensor_type_id: sensor_types[&kind],
                compute_node_id: node.id,
                device_name: label.unwrap_or_default().to_string(),
                description: graph
                    .value(subject, RDFS_COMMENT)
                    .unwrap_or_default()
                    .to_string(),
            })
            .await?;

        Ok(Some(created))
    }

    async fn load_dataset(
        &self,
        graph: &CatalogGraph,
        subject: &RdfTerm,
        datasets_dir: &Path,
        sensor_types: &HashMap<SensorKind, i32>,
        report: &mut IngestReport,
    ) -> IngestResult<()> {
        let (Some(title), Some(description)) = (
            graph.value(subject, dct::TITLE),
            graph.value(subject, dct::DESCRIPTION),
        ) else {
            debug!("Dataset {} has no title or description, skipping", subject.value());
            report.datasets.skipped += 1;
            return Ok(());
        };

        let fields = dataset_fields(graph, subject, title, description);
        let (dataset, created) = self.repo.update_or_create_dataset(fields).await?;
        if created {
            info!("Created dataset: {}", dataset.title);
        } else {
            info!("Updated dataset: {}", dataset.title);
        }
        report.datasets.record(created);

        self.load_data_files(graph, subject, &dataset, datasets_dir, sensor_types, report)
            .await;
        self.load_activities(graph, &dataset, report).await;

        Ok(())
    }

    async fn load_data_files(
        &self,
        graph: &CatalogGraph,
        subject: &RdfTerm,
        dataset: &monitoring_datasets::Model,
        datasets_dir: &Path,
        sensor_types: &HashMap<SensorKind, i32>,
        report: &mut IngestReport,
    ) {
        let members = graph.objects(subject, prov::HAD_MEMBER);
        debug!("Dataset {} lists {} members", dataset.dataset_id, members.len());

        for member in members {
            let (Some(filename), Some(media_type)) = (
                graph.value(member, dct::TITLE),
                graph.value(member, dct::FORMAT),
            ) else {
                continue;
            };

            let file_path = datasets_dir.join(filename);
            let stats = file_stats(&file_path);
            if stats.is_none() {
                warn!("Data file {} not found on disk", file_path.display());
            }

            let file_format = if media_type.to_lowercase().contains("csv") {
                "CSV"
            } else {
                "unknown"
            };

            let stored = self
                .repo
                .get_or_create_data_file(
                    dataset,
                    NewDataFile {
                        filename: filename.to_string(),
                        file_format: file_format.to_string(),
                        media_type: media_type.to_string(),
                        file_path: file_path.display().to_string(),
                        file_size: stats.map(|s| s.size),
                        row_count: stats.and_then(|s| s.row_count),
                        description: graph
                            .value(member, dct::DESCRIPTION)
                            .unwrap_or_default()
                            .to_string(),
                        sensor_type_id: sensor_kind_for_filename(filename)
                            .map(|kind| sensor_types[&kind]),
                    },
                )
                .await;
            match stored {
                Ok((file, created)) => {
                    if created {
                        info!("Added file: {} ({:?} rows)", file.filename, file.row_count);
                    }
                    report.data_files.record(created);
                }
                Err(e) => report.fail(format!("data file {}", filename), &e.into()),
            }
        }
    }

    /// Every activity in the catalog is attached to the first dataset that
    /// reaches it; the document does not scope activities per dataset.
    async fn load_activities(
        &self,
        graph: &CatalogGraph,
        dataset: &monitoring_datasets::Model,
        report: &mut IngestReport,
    ) {
        for subject in graph.subjects_of_type(prov::ACTIVITY) {
            let Some(iri) = subject.as_iri() else {
                continue;
            };
            if let Err(e) = self.load_activity(graph, subject, iri, dataset, report).await {
                report.fail(format!("activity {}", iri), &e);
            }
        }
    }

    async fn load_activity(
        &self,
        graph: &CatalogGraph,
        subject: &RdfTerm,
        iri: &str,
        dataset: &monitoring_datasets::Model,
        report: &mut IngestReport,
    ) -> IngestResult<()> {
        let activity = NewActivity {
            activity_id: uri_tail(iri).to_string(),
            activity_type: graph
                .value(subject, RDFS_LABEL)
                .unwrap_or(DEFAULT_ACTIVITY_TYPE)
                .to_string(),
            start_time: graph
                .value(subject, prov::STARTED_AT_TIME)
                .and_then(parse_datetime),
            end_time: graph
                .value(subject, prov::ENDED_AT_TIME)
                .and_then(parse_datetime),
            description: graph
                .value(subject, RDFS_COMMENT)
                .unwrap_or_default()
                .to_string(),
        };

        let (activity, created) = self.repo.get_or_create_activity(dataset, activity).await?;
        report.activities.record(created);
        if !created {
            return Ok(());
        }
        info!("Added activity: {}", activity.activity_id);

        let activity_node = RdfTerm::iri(format!("{}{}", DCM, activity.activity_id));
        for agent in graph.objects(&activity_node, prov::WAS_ASSOCIATED_WITH) {
            let agent_id = uri_tail(agent.value());
            match self.repo.find_agent(agent_id).await? {
                Some(agent) => {
                    if self.repo.link_agent(&activity, &agent).await? {
                        report.agent_links += 1;
                    }
                }
                None => debug!("Agent {} not found, not linked", agent_id),
            }
        }

        Ok(())
    }
}

fn dataset_fields(
    graph: &CatalogGraph,
    subject: &RdfTerm,
    title: &str,
    description: &str,
) -> DatasetFields {
    let dataset_id = graph
        .value(subject, dct::IDENTIFIER)
        .unwrap_or_else(|| uri_tail(subject.value()));

    let license_url = graph.value(subject, dct::LICENSE).unwrap_or(DEFAULT_LICENSE_URL);

    let keywords: BTreeSet<&str> = graph
        .objects(subject, dcat::KEYWORD)
        .iter()
        .chain(graph.objects(subject, dct::KEYWORD))
        .map(RdfTerm::value)
        .collect();

    DatasetFields {
        dataset_id: dataset_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        start_date: graph
            .path_value(subject, dct::TEMPORAL, dcat::START_DATE)
            .and_then(parse_date),
        end_date: graph
            .path_value(subject, dct::TEMPORAL, dcat::END_DATE)
            .and_then(parse_date),
        license_name: license_name(license_url).to_string(),
        license_url: license_url.to_string(),
        creator_name: graph
            .path_value(subject, dct::CREATOR, foaf::NAME)
            .unwrap_or(DEFAULT_CREATOR)
            .to_string(),
        creator_email: graph
            .path_value(subject, dct::CREATOR, foaf::MBOX)
            .map(|mbox| mbox.trim_start_matches("mailto:"))
            .unwrap_or_default()
            .to_string(),
        publisher_name: graph
            .path_value(subject, dct::PUBLISHER, foaf::NAME)
            .unwrap_or(DEFAULT_PUBLISHER)
            .to_string(),
        keywords: keywords.into_iter().collect::<Vec<_>>().join(", "),
    }
}

/// Names a host node may be known by: its labels, then its local name.
fn host_names<'a>(graph: &'a CatalogGraph, host: &'a RdfTerm) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for predicate in [RDFS_LABEL, foaf::NAME] {
        names.extend(graph.objects(host, predicate).iter().map(RdfTerm::value));
    }
    match host {
        RdfTerm::Literal { value, .. } => names.push(value),
        _ => names.push(uri_tail(host.value())),
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

<http://example.org/datasets/dc-2025> a dcat:Dataset ;
    dct:title "Monitoring" ;
    dct:description "Telegraf metrics" ;
    dct:license <https://creativecommons.org/licenses/by/4.0/> ;
    dct:temporal [ dcat:startDate "2025-01-01" ; dcat:endDate "not-a-date" ] ;
    dct:creator [ foaf:name "Ops" ; foaf:mbox <mailto:ops@example.org> ] ;
    dcat:keyword "hpc", "cpu", "hpc" ;
    dct:keyword "monitoring" .
"#;

    #[test]
    fn test_dataset_fields_defaults_and_fallbacks() {
        let graph = CatalogGraph::from_turtle_str(DATASET).unwrap();
        let subject = graph.subjects_of_type(dcat::DATASET)[0];
        let fields = dataset_fields(&graph, subject, "Monitoring", "Telegraf metrics");

        assert_eq!(fields.dataset_id, "dc-2025");
        assert_eq!(fields.license_name, "CC BY 4.0");
        assert_eq!(fields.start_date, chrono::NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(fields.end_date, None);
        assert_eq!(fields.creator_name, "Ops");
        assert_eq!(fields.creator_email, "ops@example.org");
        assert_eq!(fields.publisher_name, DEFAULT_PUBLISHER);
        assert_eq!(fields.keywords, "cpu, hpc, monitoring");
    }

    #[test]
    fn test_host_names_include_local_name() {
        let mut graph = CatalogGraph::new();
        let host = RdfTerm::iri("http://example.org/nodes/area-rob");
        graph.insert(host.clone(), RDFS_LABEL, RdfTerm::literal("Workstation"));
        assert_eq!(host_names(&graph, &host), vec!["Workstation", "area-rob"]);
    }
}

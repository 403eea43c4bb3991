//! Shared fixtures: a small catalog, its data directory and a migrated
//! SQLite database in a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use fairdatacenter::database::{open_database, CatalogRepository};
use fairdatacenter::ingest::{CatalogLoader, IngestOptions, IngestReport};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub const CATALOG: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix prov: <http://www.w3.org/ns/prov#> .
@prefix sosa: <http://www.w3.org/ns/sosa/> .
@prefix qudt: <http://qudt.org/schema/qudt/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix dcm: <http://areasciencepark.it/datacenter/ns#> .

dcm:telegraf a prov:Agent, prov:SoftwareAgent ;
    foaf:name "Telegraf" .

dcm:ops a prov:Agent, foaf:Person ;
    foaf:name "Ops Team" .

dcm:collection a prov:Activity ;
    rdfs:label "Telegraf collection" ;
    rdfs:comment "Metrics scraped every 10 seconds" ;
    prov:startedAtTime "2025-01-01T00:00:00Z" ;
    prov:endedAtTime "2025-01-31T23:59:59Z" ;
    prov:wasAssociatedWith dcm:telegraf, dcm:ops .

dcm:node1 rdfs:label "thin001.hpc.rd.areasciencepark.it" .

dcm:cpu_sensor a sosa:Sensor ;
    rdfs:label "linux_cpu" ;
    rdfs:comment "Per-core CPU counters" ;
    sosa:isHostedBy dcm:node1 .

dcm:kernel_sensor a sosa:Sensor ;
    rdfs:label "kernel" ;
    sosa:isHostedBy dcm:node1 .

dcm:orphan_sensor a sosa:Sensor ;
    rdfs:label "ipmi" ;
    sosa:isHostedBy dcm:unknown_node .

dcm:percent rdfs:label "percent" .

dcm:cpu_usage a sosa:ObservableProperty ;
    rdfs:label "CPU usage" ;
    qudt:hasUnit dcm:percent .

dcm:temperature a sosa:ObservableProperty ;
    rdfs:label "Temperature" .

dcm:dc-2025 a dcat:Dataset ;
    dct:identifier "dc-2025" ;
    dct:title "Data center monitoring" ;
    dct:description "Telegraf metrics from the HPC cluster" ;
    dct:license <https://creativecommons.org/licenses/by/4.0/> ;
    dct:temporal [ dcat:startDate "2025-01-01" ; dcat:endDate "2025-01-31" ] ;
    dct:creator [ foaf:name "Ops Team" ; foaf:mbox <mailto:ops@example.org> ] ;
    dcat:keyword "HPC", "monitoring" ;
    prov:hadMember dcm:cpu_file, dcm:ipmi_file, dcm:empty_file, dcm:ghost_file .

dcm:cpu_file dct:title "linux_cpu.csv" ; dct:format "text/csv" .
dcm:ipmi_file dct:title "ipmi_sensor.csv" ; dct:format "text/csv" ; dct:description "IPMI readings" .
dcm:empty_file dct:title "empty.csv" ; dct:format "text/csv" .
dcm:ghost_file dct:title "missing.csv" ; dct:format "text/csv" .

dcm:draft a dcat:Dataset ;
    dct:title "Draft without description" .

dcm:scratch-2024 a dcat:Dataset ;
    dct:title "Scratch" ;
    dct:description "Older scratch measurements" ;
    dct:license <https://opensource.org/licenses/MIT> ;
    prov:hadMember dcm:scratch_file .

dcm:scratch_file dct:title "scratch.csv" ; dct:format "application/octet-stream" .
"#;

pub const LINUX_CPU: &str = "\
time,host,cpu,usage_user,usage_system
2025-01-01T00:00:00Z,thin001.hpc.rd.areasciencepark.it,cpu0,12.5,3.0
2025-01-01T00:00:00Z,area-rob,cpu0,40.0,7.5
2025-01-01T00:00:10Z,thin001.hpc.rd.areasciencepark.it,cpu0,13.0,2.5
2025-01-01T00:00:10Z,area-rob,cpu0,41.5,8.0
2025-01-01T00:00:20Z,thin001.hpc.rd.areasciencepark.it,cpu0,,2.0
";

pub const IPMI_SENSOR: &str = "\
host,name,value,unit
thin001.hpc.rd.areasciencepark.it,Fan1,4800,RPM
thin001.hpc.rd.areasciencepark.it,Temp,42.5,degrees C
area-rob,Fan2,480,RPM
";

/// A catalog, data directory and database living in one temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub db: DatabaseConnection,
}

impl Fixture {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let datasets = dir.path().join("datasets");
        fs::create_dir(&datasets)?;
        fs::write(datasets.join("linux_cpu.csv"), LINUX_CPU)?;
        fs::write(datasets.join("ipmi_sensor.csv"), IPMI_SENSOR)?;
        fs::write(datasets.join("empty.csv"), "host,value\n")?;
        fs::write(datasets.join("scratch.csv"), "a,b\n1,2\n")?;
        fs::write(dir.path().join("catalog.ttl"), CATALOG)?;

        let database = dir.path().join("catalog.db");
        let db = open_database(&database.display().to_string()).await?;

        Ok(Self { dir, db })
    }

    /// A fixture whose catalog has already been ingested once.
    pub async fn loaded() -> Result<Self> {
        let fixture = Self::new().await?;
        fixture.ingest(false).await?;
        Ok(fixture)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("catalog.ttl")
    }

    pub fn datasets_dir(&self) -> PathBuf {
        self.dir.path().join("datasets")
    }

    pub fn options(&self, clear: bool) -> IngestOptions {
        IngestOptions {
            catalog_path: self.catalog_path(),
            datasets_dir: self.datasets_dir(),
            clear,
        }
    }

    pub async fn ingest(&self, clear: bool) -> Result<IngestReport> {
        let loader = CatalogLoader::new(CatalogRepository::new(self.db.clone()));
        Ok(loader.load(&self.options(clear)).await?)
    }
}

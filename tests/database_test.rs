//! Database functionality tests
//!
//! Tests for migrations, the repository's get-or-create semantics and the
//! timestamps maintained on datasets.

use anyhow::Result;
use fairdatacenter::database::entities::*;
use fairdatacenter::database::repository::{DatasetFields, NewActivity, NewAgent, NewDataFile};
use fairdatacenter::database::seed_data::seed_reference_data;
use fairdatacenter::database::{setup_database, AgentType, CatalogRepository, SensorKind};
use sea_orm::{Database, DatabaseConnection, EntityTrait};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

fn dataset_fields(dataset_id: &str, title: &str) -> DatasetFields {
    DatasetFields {
        dataset_id: dataset_id.to_string(),
        title: title.to_string(),
        description: "Telegraf metrics".to_string(),
        start_date: None,
        end_date: None,
        license_name: "CC BY 4.0".to_string(),
        license_url: "https://creativecommons.org/licenses/by/4.0/".to_string(),
        creator_name: "Unknown".to_string(),
        creator_email: String::new(),
        publisher_name: "Area Science Park".to_string(),
        keywords: "HPC, monitoring".to_string(),
    }
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    assert!(compute_nodes::Entity::find().all(&db).await?.is_empty());
    assert!(sensor_types::Entity::find().all(&db).await?.is_empty());
    assert!(sensors::Entity::find().all(&db).await?.is_empty());
    assert!(observable_properties::Entity::find().all(&db).await?.is_empty());
    assert!(agents::Entity::find().all(&db).await?.is_empty());
    assert!(monitoring_datasets::Entity::find().all(&db).await?.is_empty());
    assert!(data_files::Entity::find().all(&db).await?.is_empty());
    assert!(data_collection_activities::Entity::find().all(&db).await?.is_empty());
    assert!(activity_agents::Entity::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_seeding_is_idempotent() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = CatalogRepository::new(db.clone());

    let first = seed_reference_data(&repo).await?;
    assert_eq!(first.compute_nodes_created, 2);
    assert_eq!(first.sensor_types_created, SensorKind::ALL.len());

    let second = seed_reference_data(&repo).await?;
    assert_eq!(second.compute_nodes_created, 0);
    assert_eq!(second.sensor_types_created, 0);
    assert_eq!(sensor_types::Entity::find().all(&db).await?.len(), SensorKind::ALL.len());

    Ok(())
}

#[tokio::test]
async fn test_dataset_update_keeps_issued() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = CatalogRepository::new(db.clone());

    let (created, was_created) = repo
        .update_or_create_dataset(dataset_fields("dc-2025", "Monitoring"))
        .await?;
    assert!(was_created);

    let (updated, was_created) = repo
        .update_or_create_dataset(dataset_fields("dc-2025", "Monitoring, revised"))
        .await?;
    assert!(!was_created);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Monitoring, revised");
    assert_eq!(updated.issued, created.issued);
    assert!(updated.modified >= created.modified);
    assert_eq!(monitoring_datasets::Entity::find().all(&db).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_data_files_are_scoped_to_their_dataset() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = CatalogRepository::new(db.clone());

    let (first, _) = repo.update_or_create_dataset(dataset_fields("a", "A")).await?;
    let (second, _) = repo.update_or_create_dataset(dataset_fields("b", "B")).await?;

    let file = || NewDataFile {
        filename: "cpu.csv".to_string(),
        file_format: "CSV".to_string(),
        media_type: "text/csv".to_string(),
        file_path: "datasets/cpu.csv".to_string(),
        file_size: Some(10),
        row_count: Some(1),
        description: String::new(),
        sensor_type_id: None,
    };

    let (_, created) = repo.get_or_create_data_file(&first, file()).await?;
    assert!(created);
    let (_, created) = repo.get_or_create_data_file(&first, file()).await?;
    assert!(!created);
    let (_, created) = repo.get_or_create_data_file(&second, file()).await?;
    assert!(created);

    assert!(repo.find_data_file(first.id, "cpu.csv").await?.is_some());
    assert!(repo.find_data_file(first.id, "mem.csv").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_agent_links_are_not_duplicated() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let repo = CatalogRepository::new(db.clone());

    let (dataset, _) = repo.update_or_create_dataset(dataset_fields("a", "A")).await?;
    let (activity, _) = repo
        .get_or_create_activity(
            &dataset,
            NewActivity {
                activity_id: "collection".to_string(),
                activity_type: "Data Collection Activity".to_string(),
                start_time: None,
                end_time: None,
                description: String::new(),
            },
        )
        .await?;
    let (agent, _) = repo
        .get_or_create_agent(NewAgent {
            agent_id: "telegraf".to_string(),
            name: "Telegraf".to_string(),
            agent_type: AgentType::Software,
        })
        .await?;

    assert!(repo.link_agent(&activity, &agent).await?);
    assert!(!repo.link_agent(&activity, &agent).await?);
    assert_eq!(activity_agents::Entity::find().all(&db).await?.len(), 1);

    repo.clear_all().await?;
    assert!(agents::Entity::find().all(&db).await?.is_empty());
    assert!(monitoring_datasets::Entity::find().all(&db).await?.is_empty());

    Ok(())
}

pub mod app;
pub mod error;
pub mod handlers;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

use crate::config::AppConfig;
use crate::database::{connection::*, migrations::Migrator};
use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::{info, warn};

pub async fn start_server(config: &AppConfig) -> Result<()> {
    let database_url = get_database_url(Some(&config.database));
    let db = establish_connection(&database_url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    if !config.datasets_dir.exists() {
        warn!(
            "Datasets directory {} does not exist; observation queries will fail",
            config.datasets_dir.display()
        );
    }

    let app = app::create_app(db, config)?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("Endpoints:");
    info!("  /                                       - Catalog overview");
    info!("  /health                                 - Health check");
    info!("  /catalog.ttl, /ontology.ttl             - Turtle documents");
    info!("  /datasets/:dataset_id                   - Dataset detail");
    info!("  /datasets/:dataset_id/files/:filename   - Raw file download");
    info!("  /datasets/:dataset_id/:table_name       - Observation query (JSON or CSV)");
    info!("  /api/observations?file=...              - Observation query by file");
    info!("  /api/datasets, /api/compute-nodes, /api/sensors, /api/observable-properties");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use fairdatacenter::config::AppConfig;
use fairdatacenter::database::{open_database, CatalogRepository};
use fairdatacenter::ingest::{CatalogLoader, EntityCounts, IngestOptions, IngestReport};
use fairdatacenter::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// TOML configuration file (defaults to fairdatacenter.toml when present)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        datasets_dir: Option<PathBuf>,
        #[clap(long)]
        catalog: Option<PathBuf>,
        #[clap(long)]
        ontology: Option<PathBuf>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Load the Turtle catalog into the database
    LoadMetadata {
        #[clap(long)]
        catalog: Option<PathBuf>,
        #[clap(long)]
        datasets_dir: Option<PathBuf>,
        /// Delete existing catalog rows before loading
        #[clap(long)]
        clear: bool,
        #[clap(short, long)]
        database: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Serve {
            port,
            database,
            datasets_dir,
            catalog,
            ontology,
            cors_origin,
        } => {
            override_with(&mut config.port, port);
            override_with(&mut config.database, database);
            override_with(&mut config.datasets_dir, datasets_dir);
            override_with(&mut config.catalog_path, catalog);
            if ontology.is_some() {
                config.ontology_path = ontology;
            }
            if cors_origin.is_some() {
                config.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.port);
            server::start_server(&config).await?;
        }
        Commands::LoadMetadata {
            catalog,
            datasets_dir,
            clear,
            database,
        } => {
            override_with(&mut config.catalog_path, catalog);
            override_with(&mut config.datasets_dir, datasets_dir);
            override_with(&mut config.database, database);

            let options = IngestOptions {
                catalog_path: config.catalog_path.clone(),
                datasets_dir: config.datasets_dir.clone(),
                clear,
            };
            options.check_inputs()?;

            let db = open_database(&config.database).await?;
            let loader = CatalogLoader::new(CatalogRepository::new(db));
            let report = loader.load(&options).await?;

            print_report(&report);
            if report.has_failures() {
                bail!("{} catalog entities failed to load", report.failures.len());
            }
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                override_with(&mut config.database, database);
                info!("Initializing database: {}", config.database);
                server::migrate_database(&config.database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                override_with(&mut config.database, database);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&config.database, direction).await?;
            }
        },
    }

    Ok(())
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn print_report(report: &IngestReport) {
    println!();
    println!("{}", "Catalog loaded".green().bold());
    println!("  {:<24}{}", "triples", report.triples);
    if report.cleared {
        println!("  {:<24}{}", "cleared", "yes".yellow());
    }

    let rows: [(&str, &EntityCounts); 8] = [
        ("compute nodes", &report.compute_nodes),
        ("sensor types", &report.sensor_types),
        ("observable properties", &report.observable_properties),
        ("agents", &report.agents),
        ("sensors", &report.sensors),
        ("datasets", &report.datasets),
        ("data files", &report.data_files),
        ("activities", &report.activities),
    ];
    for (name, counts) in rows {
        println!(
            "  {:<24}{} created, {} existing, {} skipped",
            name,
            counts.created.to_string().green(),
            counts.existing,
            counts.skipped
        );
    }
    println!("  {:<24}{}", "agent links", report.agent_links);

    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            "failed".red().bold(),
            failure.entity,
            failure.message
        );
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "sqlx=warn,sea_orm_migration=warn,{}",
            log_level
        )))
        .without_time()
        .init();
}

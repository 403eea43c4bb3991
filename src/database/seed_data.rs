use sea_orm::DbErr;
use tracing::info;

use super::entities::SensorKind;
use super::repository::{CatalogRepository, NewComputeNode};

/// Hosts that the shipped monitoring datasets were collected on.
pub const KNOWN_COMPUTE_NODES: [(&str, &str, &str); 2] = [
    (
        "thin001.hpc.rd.areasciencepark.it",
        "Area Science Park HPC Cluster",
        "Compute node in HPC cluster",
    ),
    (
        "area-rob",
        "Area Science Park",
        "Development workstation",
    ),
];

/// Rows created by a seeding pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub compute_nodes_created: usize,
    pub sensor_types_created: usize,
}

/// Ensure the known compute nodes and one row per sensor kind exist.
pub async fn seed_reference_data(repo: &CatalogRepository) -> Result<SeedSummary, DbErr> {
    let mut summary = SeedSummary::default();

    for (hostname, location, description) in KNOWN_COMPUTE_NODES {
        let (_, created) = repo
            .get_or_create_compute_node(NewComputeNode {
                hostname: hostname.to_string(),
                location: location.to_string(),
                description: description.to_string(),
            })
            .await?;
        if created {
            info!("Created compute node: {}", hostname);
            summary.compute_nodes_created += 1;
        }
    }

    for kind in SensorKind::ALL {
        let (_, created) = repo.get_or_create_sensor_type(kind).await?;
        if created {
            info!("Created sensor type: {}", kind);
            summary.sensor_types_created += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{compute_nodes, sensor_types, establish_connection, setup_database};
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_seeding_is_idempotent() -> anyhow::Result<()> {
        let db = establish_connection("sqlite::memory:").await?;
        setup_database(&db).await?;
        let repo = CatalogRepository::new(db.clone());

        let first = seed_reference_data(&repo).await?;
        let second = seed_reference_data(&repo).await?;

        assert_eq!(first.compute_nodes_created, 2);
        assert_eq!(first.sensor_types_created, 11);
        assert_eq!(second, SeedSummary::default());

        assert_eq!(compute_nodes::Entity::find().count(&db).await?, 2);
        assert_eq!(sensor_types::Entity::find().count(&db).await?, 11);
        Ok(())
    }
}

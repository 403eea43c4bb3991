use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "fairdatacenter.toml";

/// Runtime configuration shared by the CLI commands.
///
/// Nothing here is global: the server copies what it needs into its state and
/// the loader receives its paths through `IngestOptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: String,
    pub datasets_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub ontology_path: Option<PathBuf>,
    pub port: u16,
    pub cors_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: "fairdatacenter.db".to_string(),
            datasets_dir: PathBuf::from("datasets"),
            catalog_path: PathBuf::from("catalog.ttl"),
            ontology_path: None,
            port: 8000,
            cors_origin: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the default file when present.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = AppConfig::from_toml("port = 9000").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "fairdatacenter.db");
        assert_eq!(config.datasets_dir, PathBuf::from("datasets"));
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_deserialization() {
        let content = r#"
database = "/var/lib/fdc/catalog.db"
datasets_dir = "/srv/datasets"
catalog_path = "/srv/catalog.ttl"
ontology_path = "/srv/datacenter-ontology.ttl"
cors_origin = "http://localhost:3000"
"#;

        let config = AppConfig::from_toml(content).unwrap();
        assert_eq!(config.database, "/var/lib/fdc/catalog.db");
        assert_eq!(config.datasets_dir, PathBuf::from("/srv/datasets"));
        assert_eq!(
            config.ontology_path,
            Some(PathBuf::from("/srv/datacenter-ontology.ttl"))
        );
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/fairdatacenter.toml")));
        assert!(result.is_err());
    }
}

use std::path::{Component, Path, PathBuf};

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;

use crate::database::entities::{data_files, monitoring_datasets};
use crate::errors::{QueryError, QueryResult};
use crate::observations::{
    run_query, DatasetQueryResponse, FileQueryResponse, MatchMode, ObservationTable,
    OutputFormat, QueryLinks, QueryParams,
};

/// Result of a dataset-scoped query in the requested format.
#[derive(Debug)]
pub enum DatasetQueryOutput {
    Json(DatasetQueryResponse),
    Csv { filename: String, body: Vec<u8> },
}

/// A registered data file resolved to its location on disk.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub dataset: monitoring_datasets::Model,
    pub filename: String,
    pub path: PathBuf,
}

pub struct ObservationService {
    db: DatabaseConnection,
    datasets_dir: PathBuf,
}

impl ObservationService {
    pub fn new(db: DatabaseConnection, datasets_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            datasets_dir: datasets_dir.into(),
        }
    }

    /// Check, in order, that the dataset exists, that the file is registered
    /// to it, and that the file is on disk. A malformed name is only
    /// rejected once the dataset is known.
    pub async fn resolve_registered_file(
        &self,
        dataset_id: &str,
        filename: &str,
    ) -> QueryResult<ResolvedFile> {
        let dataset = monitoring_datasets::Entity::find()
            .filter(monitoring_datasets::Column::DatasetId.eq(dataset_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| QueryError::DatasetNotFound(dataset_id.to_string()))?;

        let filename = validate_filename("file", filename)?;

        data_files::Entity::find()
            .filter(data_files::Column::DatasetId.eq(dataset.id))
            .filter(data_files::Column::Filename.eq(filename))
            .one(&self.db)
            .await?
            .ok_or_else(|| QueryError::FileNotRegistered {
                dataset_id: dataset_id.to_string(),
                filename: filename.to_string(),
            })?;

        let path = self.datasets_dir.join(filename);
        if !path.is_file() {
            return Err(QueryError::FileMissingOnDisk(filename.to_string()));
        }

        Ok(ResolvedFile {
            dataset,
            filename: filename.to_string(),
            path,
        })
    }

    /// Query a table of a dataset, matching filters by substring.
    pub async fn query_dataset(
        &self,
        dataset_id: &str,
        table_name: &str,
        params: &QueryParams,
    ) -> QueryResult<DatasetQueryOutput> {
        let filename = table_filename(table_name);
        let resolved = self.resolve_registered_file(dataset_id, &filename).await?;
        let table = load_table(resolved.path.clone()).await?;

        let page = run_query(&table, params, MatchMode::Substring)?;
        debug!(
            "Query on {}/{} matched {} of {} rows",
            dataset_id,
            filename,
            page.total,
            table.len()
        );

        match OutputFormat::from_params(params) {
            OutputFormat::Csv => Ok(DatasetQueryOutput::Csv {
                filename: format!("{}_query.csv", table_name),
                body: page.to_csv()?,
            }),
            OutputFormat::Json => {
                let links = QueryLinks::build(
                    dataset_id,
                    table_name,
                    &resolved.filename,
                    params,
                    page.pagination,
                    page.total,
                );
                Ok(DatasetQueryOutput::Json(DatasetQueryResponse {
                    file: resolved.filename,
                    dataset: resolved.dataset.dataset_id,
                    dataset_title: resolved.dataset.title,
                    total_rows: page.total,
                    returned_rows: page.rows.len(),
                    offset: page.pagination.offset,
                    limit: page.pagination.limit,
                    columns: page.columns().to_vec(),
                    data: page.records(),
                    links,
                }))
            }
        }
    }

    /// Query any file in the data directory by name. Numeric columns are
    /// compared by value.
    pub async fn query_file(&self, params: &QueryParams) -> QueryResult<FileQueryResponse> {
        let filename = params
            .get("file")
            .filter(|file| !file.is_empty())
            .ok_or(QueryError::MissingFileParameter)?;
        let filename = validate_filename("file", filename)?;

        let path = self.datasets_dir.join(filename);
        if !path.is_file() {
            return Err(QueryError::FileMissingOnDisk(filename.to_string()));
        }

        let table = load_table(path).await?;
        let page = run_query(&table, params, MatchMode::Typed)?;

        Ok(FileQueryResponse {
            file: filename.to_string(),
            total_matching: page.total,
            count: page.rows.len(),
            offset: page.pagination.offset,
            limit: page.pagination.limit,
            observations: page.records(),
        })
    }
}

/// `cpu` and `cpu.csv` name the same table.
pub fn table_filename(table_name: &str) -> String {
    if table_name.ends_with(".csv") {
        table_name.to_string()
    } else {
        format!("{}.csv", table_name)
    }
}

/// Accept only a bare file name: no separators, no `.` or `..`.
pub fn validate_filename<'a>(param: &str, filename: &'a str) -> QueryResult<&'a str> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !filename.contains(['/', '\\']) => Ok(filename),
        _ => Err(QueryError::invalid(param, filename)),
    }
}

async fn load_table(path: PathBuf) -> QueryResult<ObservationTable> {
    tokio::task::spawn_blocking(move || ObservationTable::from_path(&path))
        .await
        .map_err(|e| QueryError::Read(e.to_string()))?
}

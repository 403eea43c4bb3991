use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::filter::{FilterSet, MatchMode, DATASET_RESERVED};
use super::table::{Cell, ObservationTable};
use crate::errors::{QueryError, QueryResult};

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 10_000;

pub type Record = IndexMap<String, Value>;

/// Query string parameters in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Last value given for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// `limit` is clamped to `0..=MAX_LIMIT` and a negative `offset` reads
    /// as zero. Values that are not integers are rejected.
    pub fn from_params(params: &QueryParams) -> QueryResult<Self> {
        let limit = match params.get("limit") {
            Some(raw) => parse_integer("limit", raw)?.clamp(0, MAX_LIMIT as i64) as usize,
            None => DEFAULT_LIMIT,
        };
        let offset = match params.get("offset") {
            Some(raw) => parse_integer("offset", raw)?.max(0) as usize,
            None => 0,
        };
        Ok(Self { limit, offset })
    }

    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset.min(rows.len());
        let end = self.offset.saturating_add(self.limit).min(rows.len());
        &rows[start..end]
    }

    pub fn next_offset(&self, total: usize) -> Option<usize> {
        let next = self.offset.saturating_add(self.limit);
        (next < total).then_some(next)
    }

    pub fn prev_offset(&self) -> Option<usize> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }
}

fn parse_integer(name: &str, raw: &str) -> QueryResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| QueryError::invalid(name, raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_params(params: &QueryParams) -> Self {
        match params.get("format") {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}

/// One filtered, paginated slice of a table.
#[derive(Debug)]
pub struct QueryPage<'t> {
    pub table: &'t ObservationTable,
    /// Matching rows before pagination
    pub total: usize,
    pub pagination: Pagination,
    pub rows: Vec<&'t [Cell]>,
}

impl<'t> QueryPage<'t> {
    pub fn columns(&self) -> &'t [String] {
        self.table.columns()
    }

    pub fn records(&self) -> Vec<Record> {
        let columns = self.table.columns();
        self.rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(column, cell)| (column.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }

    pub fn to_csv(&self) -> QueryResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.table.columns())?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::to_csv_field))?;
        }
        writer
            .into_inner()
            .map_err(|e| QueryError::Read(e.to_string()))
    }
}

/// Filter, then paginate.
pub fn run_query<'t>(
    table: &'t ObservationTable,
    params: &QueryParams,
    mode: MatchMode,
) -> QueryResult<QueryPage<'t>> {
    let pagination = Pagination::from_params(params)?;
    let filters = FilterSet::from_params(table, params.pairs(), mode);
    let matching = filters.apply(table);
    let rows = pagination.window(&matching).to_vec();

    Ok(QueryPage {
        table,
        total: matching.len(),
        pagination,
        rows,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub download_csv: String,
    pub dataset: String,
}

impl QueryLinks {
    /// Navigation links for a dataset-scoped query. Filter parameters are
    /// carried over so `next` and `prev` stay within the same result set.
    pub fn build(
        dataset_id: &str,
        table_name: &str,
        filename: &str,
        params: &QueryParams,
        pagination: Pagination,
        total: usize,
    ) -> Self {
        let filters: Vec<(&str, &str)> = params
            .pairs()
            .filter(|(name, _)| !DATASET_RESERVED.contains(name))
            .collect();

        let page_link = |offset: usize| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            query.append_pair("limit", &pagination.limit.to_string());
            query.append_pair("offset", &offset.to_string());
            for (name, value) in &filters {
                query.append_pair(name, value);
            }
            format!("/datasets/{}/{}?{}", dataset_id, table_name, query.finish())
        };

        Self {
            self_link: page_link(pagination.offset),
            next: pagination.next_offset(total).map(page_link),
            prev: pagination.prev_offset().map(page_link),
            download_csv: format!("/datasets/{}/files/{}", dataset_id, filename),
            dataset: format!("/api/datasets/{}", dataset_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetQueryResponse {
    pub file: String,
    pub dataset: String,
    pub dataset_title: String,
    pub total_rows: usize,
    pub returned_rows: usize,
    pub offset: usize,
    pub limit: usize,
    pub columns: Vec<String>,
    pub data: Vec<Record>,
    pub links: QueryLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileQueryResponse {
    pub file: String,
    pub total_matching: usize,
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
    pub observations: Vec<Record>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn table(rows: usize) -> ObservationTable {
        let mut content = String::from("host,value\n");
        for i in 0..rows {
            let host = if i % 2 == 0 { "thin001" } else { "area-rob" };
            content.push_str(&format!("{},{}\n", host, i));
        }
        ObservationTable::from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_limit_is_clamped() {
        let pagination = Pagination::from_params(&params(&[("limit", "10000000")])).unwrap();
        assert_eq!(pagination.limit, MAX_LIMIT);

        let pagination = Pagination::from_params(&params(&[("limit", "-4"), ("offset", "-2")])).unwrap();
        assert_eq!(pagination, Pagination { limit: 0, offset: 0 });
    }

    #[test]
    fn test_non_numeric_pagination_is_rejected() {
        let err = Pagination::from_params(&params(&[("offset", "ten")])).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_offset_past_end_returns_nothing() {
        let table = table(5);
        let page = run_query(&table, &params(&[("offset", "50")]), MatchMode::Substring).unwrap();
        assert_eq!(page.total, 5);
        assert!(page.rows.is_empty());
        assert_eq!(page.pagination.next_offset(page.total), None);
        assert_eq!(page.pagination.prev_offset(), Some(0));
    }

    #[test]
    fn test_pagination_applies_after_filtering() {
        let table = table(10);
        let page = run_query(
            &table,
            &params(&[("host", "area"), ("limit", "2"), ("offset", "1")]),
            MatchMode::Substring,
        )
        .unwrap();
        assert_eq!(page.total, 5);
        let records = page.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["value"], serde_json::json!(3));
        assert_eq!(records[1]["value"], serde_json::json!(5));
    }

    #[test]
    fn test_links() {
        let query = params(&[("limit", "2"), ("offset", "2"), ("host", "thin 001")]);
        let pagination = Pagination::from_params(&query).unwrap();
        let links = QueryLinks::build("dc-2025", "cpu", "cpu.csv", &query, pagination, 5);

        assert_eq!(links.self_link, "/datasets/dc-2025/cpu?limit=2&offset=2&host=thin+001");
        assert_eq!(
            links.next.as_deref(),
            Some("/datasets/dc-2025/cpu?limit=2&offset=4&host=thin+001")
        );
        assert_eq!(
            links.prev.as_deref(),
            Some("/datasets/dc-2025/cpu?limit=2&offset=0&host=thin+001")
        );
        assert_eq!(links.download_csv, "/datasets/dc-2025/files/cpu.csv");
        assert_eq!(links.dataset, "/api/datasets/dc-2025");

        let last = QueryLinks::build("dc-2025", "cpu", "cpu.csv", &params(&[]), Pagination::default(), 5);
        assert_eq!(last.next, None);
        assert_eq!(last.prev, None);
    }

    #[test]
    fn test_csv_output_writes_nulls_empty() {
        let table = ObservationTable::from_reader("host,value\na,1.5\nb,\n".as_bytes()).unwrap();
        let page = run_query(&table, &params(&[]), MatchMode::Substring).unwrap();
        let csv = String::from_utf8(page.to_csv().unwrap()).unwrap();
        assert_eq!(csv, "host,value\na,1.5\nb,\n");
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_params(&params(&[("format", "csv")])), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_params(&params(&[("format", "xml")])), OutputFormat::Json);
        assert_eq!(OutputFormat::from_params(&params(&[])), OutputFormat::Json);
    }
}

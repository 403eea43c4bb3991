use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::errors::{QueryError, QueryResult};

/// Tokens read as a missing value, matching the usual dataframe defaults.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnType::Text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// String form used for substring matching. Missing values read as "nan".
    pub fn match_text(&self) -> String {
        match self {
            Cell::Null => "nan".to_string(),
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) => format_float(*value),
            Cell::Text(value) => value.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// JSON value; NaN and infinities become null.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Int(value) => Value::from(*value),
            Cell::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(value) => Value::String(value.clone()),
        }
    }

    /// CSV field; missing and non-finite values are written empty.
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Float(value) if !value.is_finite() => String::new(),
            Cell::Null => String::new(),
            Cell::Text(value) => value.clone(),
            other => other.match_text(),
        }
    }
}

/// Render a float the way a Python `str()` does for ordinary magnitudes.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else {
        format!("{:?}", value)
    }
}

/// A delimited file held fully in memory, with one inferred type per column.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Cell>>,
}

impl ObservationTable {
    pub fn from_path(path: &Path) -> QueryResult<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader(reader: impl Read) -> QueryResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect();
        if columns.is_empty() {
            return Err(QueryError::Read("No columns to parse from file".to_string()));
        }

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(QueryError::Read(format!(
                    "Expected {} fields in line {}, saw {}",
                    columns.len(),
                    line + 2,
                    record.len()
                )));
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            raw_rows.push(row);
        }

        let types: Vec<ColumnType> = (0..columns.len())
            .map(|index| infer_column_type(raw_rows.iter().map(|row| row[index].as_str())))
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&types)
                    .map(|(raw, column_type)| parse_cell(&raw, *column_type))
                    .collect()
            })
            .collect();

        Ok(Self {
            columns,
            types,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column_type(&self, index: usize) -> ColumnType {
        self.types[index]
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Integer when every present value is an integer and none is missing,
/// float when every present value is numeric, text otherwise.
fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut all_int = true;
    let mut any_missing = false;

    for raw in values {
        if is_na(raw) {
            any_missing = true;
            continue;
        }
        if all_int && parse_int(raw).is_some() {
            continue;
        }
        all_int = false;
        if parse_float(raw).is_none() {
            return ColumnType::Text;
        }
    }

    if all_int && !any_missing {
        ColumnType::Integer
    } else {
        ColumnType::Float
    }
}

fn parse_cell(raw: &str, column_type: ColumnType) -> Cell {
    if is_na(raw) {
        return Cell::Null;
    }
    match column_type {
        ColumnType::Integer => parse_int(raw).map(Cell::Int).unwrap_or(Cell::Null),
        ColumnType::Float => parse_float(raw).map(Cell::Float).unwrap_or(Cell::Null),
        ColumnType::Text => Cell::Text(raw.to_string()),
    }
}

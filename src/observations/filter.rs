//! Column filters for the two query entry points.
//!
//! The dataset-scoped query matches every column by case-insensitive
//! substring on its string form. The file-level query compares numeric
//! columns by value and only uses substring matching for text columns.

use super::table::{Cell, ObservationTable};

/// Parameters that never name a column on the dataset-scoped query.
pub const DATASET_RESERVED: &[&str] = &["limit", "offset", "format"];

/// Parameters that never name a column on the file-level query.
pub const FILE_RESERVED: &[&str] = &["file", "limit", "offset", "format"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring on every column
    Substring,
    /// Numeric equality on numeric columns, substring on text columns
    Typed,
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Contains(String),
    Equals(f64),
}

impl Predicate {
    fn matches(&self, cell: &Cell) -> bool {
        match self {
            Predicate::Contains(needle) => cell.match_text().to_lowercase().contains(needle),
            Predicate::Equals(expected) => cell.as_f64() == Some(*expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ColumnFilter {
    column: usize,
    predicate: Predicate,
}

/// Filters built from query parameters against one table's columns.
///
/// Parameters naming unknown columns are ignored, as are numeric filters
/// whose value does not parse as a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<ColumnFilter>,
}

impl FilterSet {
    pub fn from_params<'a>(
        table: &ObservationTable,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
        mode: MatchMode,
    ) -> Self {
        let reserved = match mode {
            MatchMode::Substring => DATASET_RESERVED,
            MatchMode::Typed => FILE_RESERVED,
        };

        let mut filters = Vec::new();
        for (name, value) in params {
            if reserved.contains(&name) {
                continue;
            }
            if mode == MatchMode::Typed && value.is_empty() {
                continue;
            }
            let Some(column) = table.column_index(name) else {
                continue;
            };

            let predicate = if mode == MatchMode::Typed && table.column_type(column).is_numeric() {
                match value.trim().parse::<f64>() {
                    Ok(number) => Predicate::Equals(number),
                    Err(_) => continue,
                }
            } else {
                Predicate::Contains(value.to_lowercase())
            };

            filters.push(ColumnFilter { column, predicate });
        }

        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, row: &[Cell]) -> bool {
        self.filters
            .iter()
            .all(|filter| filter.predicate.matches(&row[filter.column]))
    }

    /// Rows passing every filter, in file order.
    pub fn apply<'t>(&self, table: &'t ObservationTable) -> Vec<&'t [Cell]> {
        table
            .rows()
            .iter()
            .map(Vec::as_slice)
            .filter(|row| self.matches(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
host,name,value,unit
thin001.hpc.rd.areasciencepark.it,Fan1,4800,RPM
thin001.hpc.rd.areasciencepark.it,Temp,42.5,degrees C
area-rob,Fan2,480,RPM
area-rob,Temp,,degrees C
";

    fn table() -> ObservationTable {
        ObservationTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let table = table();
        let filters = FilterSet::from_params(&table, [("host", "THIN")], MatchMode::Substring);
        assert_eq!(filters.apply(&table).len(), 2);
    }

    #[test]
    fn test_unknown_column_is_ignored() {
        let table = table();
        let filters = FilterSet::from_params(&table, [("rack", "7")], MatchMode::Substring);
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&table).len(), 4);
    }

    #[test]
    fn test_reserved_parameters_are_not_filters() {
        let table = ObservationTable::from_reader("limit,offset\n1,2\n".as_bytes()).unwrap();
        let filters = FilterSet::from_params(&table, [("limit", "5")], MatchMode::Substring);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_substring_applies_to_numeric_columns() {
        let table = table();
        let filters = FilterSet::from_params(&table, [("value", "480")], MatchMode::Substring);
        // matches both 4800.0 and 480.0
        assert_eq!(filters.apply(&table).len(), 2);
    }

    #[test]
    fn test_missing_values_match_nan() {
        let table = table();
        let filters = FilterSet::from_params(&table, [("value", "nan")], MatchMode::Substring);
        assert_eq!(filters.apply(&table).len(), 1);
    }

    #[test]
    fn test_typed_mode_uses_numeric_equality() {
        let table = table();
        let filters = FilterSet::from_params(&table, [("value", "480")], MatchMode::Typed);
        let rows = filters.apply(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], Cell::Text("Fan2".to_string()));
    }

    #[test]
    fn test_typed_mode_skips_unparsable_and_empty_values() {
        let table = table();
        let filters = FilterSet::from_params(
            &table,
            [("value", "high"), ("unit", ""), ("file", "ipmi.csv")],
            MatchMode::Typed,
        );
        assert!(filters.is_empty());
    }

    #[test]
    fn test_filters_compose_with_and() {
        let table = table();
        let filters = FilterSet::from_params(
            &table,
            [("name", "fan"), ("unit", "rpm"), ("host", "rob")],
            MatchMode::Typed,
        );
        assert_eq!(filters.apply(&table).len(), 1);
    }
}

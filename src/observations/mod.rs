//! On-demand queries over the per-table CSV files.

pub mod filter;
pub mod query;
pub mod table;

pub use filter::{FilterSet, MatchMode};
pub use query::{
    run_query, DatasetQueryResponse, FileQueryResponse, OutputFormat, Pagination, QueryLinks,
    QueryPage, QueryParams, Record,
};
pub use table::{Cell, ColumnType, ObservationTable};

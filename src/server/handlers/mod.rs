pub mod api;
pub mod datasets;
pub mod documents;
pub mod health;
pub mod observations;

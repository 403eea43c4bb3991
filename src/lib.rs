pub mod config;
pub mod database;
pub mod errors;
pub mod ingest;
pub mod observations;
pub mod rdf;
pub mod services;

#[cfg(feature = "server")]
pub mod server;

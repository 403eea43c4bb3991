//! Turtle catalog loading and triple traversal.

pub mod graph;
pub mod vocab;

pub use graph::{CatalogGraph, RdfTerm};

pub mod catalog_service;
pub mod observation_service;

pub use catalog_service::*;
pub use observation_service::*;

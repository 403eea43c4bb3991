pub mod activity_agents;
pub mod agents;
pub mod compute_nodes;
pub mod data_collection_activities;
pub mod data_files;
pub mod monitoring_datasets;
pub mod observable_properties;
pub mod sensor_types;
pub mod sensors;

pub use agents::AgentType;
pub use observable_properties::DataType;
pub use sensor_types::SensorKind;

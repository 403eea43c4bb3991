use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub sosa_uri: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sensors::Entity")]
    Sensors,
    #[sea_orm(has_many = "super::observable_properties::Entity")]
    ObservableProperties,
    #[sea_orm(has_many = "super::data_files::Entity")]
    DataFiles,
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensors.def()
    }
}

impl Related<super::observable_properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ObservableProperties.def()
    }
}

impl Related<super::data_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The closed set of sensor types. Rows in `sensor_types` are seeded from
/// this list and never derived from the catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorKind {
    Cpu,
    LinuxCpu,
    Memory,
    DiskIo,
    Network,
    Infiniband,
    SmartDevice,
    SmartAttr,
    Ipmi,
    Procstat,
    Turbostat,
}

impl SensorKind {
    pub const ALL: [SensorKind; 11] = [
        SensorKind::Cpu,
        SensorKind::LinuxCpu,
        SensorKind::Memory,
        SensorKind::DiskIo,
        SensorKind::Network,
        SensorKind::Infiniband,
        SensorKind::SmartDevice,
        SensorKind::SmartAttr,
        SensorKind::Ipmi,
        SensorKind::Procstat,
        SensorKind::Turbostat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Cpu => "CPU",
            SensorKind::LinuxCpu => "LINUX_CPU",
            SensorKind::Memory => "MEMORY",
            SensorKind::DiskIo => "DISK_IO",
            SensorKind::Network => "NETWORK",
            SensorKind::Infiniband => "INFINIBAND",
            SensorKind::SmartDevice => "SMART_DEVICE",
            SensorKind::SmartAttr => "SMART_ATTR",
            SensorKind::Ipmi => "IPMI",
            SensorKind::Procstat => "PROCSTAT",
            SensorKind::Turbostat => "TURBOSTAT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SensorKind::Cpu => "CPU usage and performance metrics",
            SensorKind::LinuxCpu => "Linux CPU frequency and thermal metrics",
            SensorKind::Memory => "Memory usage statistics",
            SensorKind::DiskIo => "Disk read/write operations and throughput",
            SensorKind::Network => "Network interface statistics",
            SensorKind::Infiniband => "InfiniBand network performance",
            SensorKind::SmartDevice => "SMART device health metrics",
            SensorKind::SmartAttr => "SMART attribute details",
            SensorKind::Ipmi => "IPMI sensor readings (temperature, voltage, etc.)",
            SensorKind::Procstat => "Process statistics and resource usage",
            SensorKind::Turbostat => "CPU frequency and power state monitoring",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown sensor type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_kind_round_trips_through_names() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.as_str().parse::<SensorKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_sensor_kind_is_rejected() {
        assert!("GPU".parse::<SensorKind>().is_err());
        assert!("cpu".parse::<SensorKind>().is_err());
    }
}

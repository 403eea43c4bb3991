use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComputeNodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComputeNodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComputeNodes::Hostname)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ComputeNodes::Description).text().not_null().default(""))
                    .col(ColumnDef::new(ComputeNodes::Location).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SensorTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SensorTypes::Name)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SensorTypes::Description).text().not_null())
                    .col(ColumnDef::new(SensorTypes::SosaUri).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ObservableProperties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ObservableProperties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ObservableProperties::PropertyName)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ObservableProperties::Label).string().not_null())
                    .col(ColumnDef::new(ObservableProperties::Description).text().not_null())
                    .col(ColumnDef::new(ObservableProperties::Unit).string_len(64).not_null())
                    .col(
                        ColumnDef::new(ObservableProperties::QudtUnitUri)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ObservableProperties::DataType).string_len(32).not_null())
                    .col(ColumnDef::new(ObservableProperties::SensorTypeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-observable_properties-sensor_type_id")
                            .from(ObservableProperties::Table, ObservableProperties::SensorTypeId)
                            .to(SensorTypes::Table, SensorTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sensors::SensorId).string().not_null().unique_key())
                    .col(ColumnDef::new(Sensors::SensorTypeId).integer().not_null())
                    .col(ColumnDef::new(Sensors::ComputeNodeId).integer().not_null())
                    .col(ColumnDef::new(Sensors::DeviceName).string_len(128).not_null().default(""))
                    .col(ColumnDef::new(Sensors::InterfaceName).string_len(128).not_null().default(""))
                    .col(ColumnDef::new(Sensors::Description).text().not_null().default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sensors-sensor_type_id")
                            .from(Sensors::Table, Sensors::SensorTypeId)
                            .to(SensorTypes::Table, SensorTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sensors-compute_node_id")
                            .from(Sensors::Table, Sensors::ComputeNodeId)
                            .to(ComputeNodes::Table, ComputeNodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonitoringDatasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoringDatasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonitoringDatasets::DatasetId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MonitoringDatasets::Title).string_len(512).not_null())
                    .col(ColumnDef::new(MonitoringDatasets::Description).text().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::StartDate).date())
                    .col(ColumnDef::new(MonitoringDatasets::EndDate).date())
                    .col(ColumnDef::new(MonitoringDatasets::Issued).date().not_null())
                    .col(
                        ColumnDef::new(MonitoringDatasets::Modified)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonitoringDatasets::LicenseName).string().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::LicenseUrl).string().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::CreatorName).string().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::CreatorEmail).string().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::PublisherName).string().not_null())
                    .col(ColumnDef::new(MonitoringDatasets::Keywords).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DataFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataFiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataFiles::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DataFiles::Filename).string().not_null())
                    .col(ColumnDef::new(DataFiles::FileFormat).string_len(32).not_null())
                    .col(ColumnDef::new(DataFiles::MediaType).string_len(128).not_null())
                    .col(ColumnDef::new(DataFiles::FilePath).string_len(512).not_null())
                    .col(ColumnDef::new(DataFiles::FileSize).big_integer())
                    .col(ColumnDef::new(DataFiles::RowCount).big_integer())
                    .col(ColumnDef::new(DataFiles::Description).text().not_null().default(""))
                    .col(ColumnDef::new(DataFiles::SensorTypeId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-data_files-dataset_id")
                            .from(DataFiles::Table, DataFiles::DatasetId)
                            .to(MonitoringDatasets::Table, MonitoringDatasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-data_files-sensor_type_id")
                            .from(DataFiles::Table, DataFiles::SensorTypeId)
                            .to(SensorTypes::Table, SensorTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-data_files-dataset_id-filename")
                    .table(DataFiles::Table)
                    .col(DataFiles::DatasetId)
                    .col(DataFiles::Filename)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DataCollectionActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataCollectionActivities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DataCollectionActivities::ActivityId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DataCollectionActivities::ActivityType)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DataCollectionActivities::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(DataCollectionActivities::EndTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DataCollectionActivities::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(DataCollectionActivities::DatasetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-data_collection_activities-dataset_id")
                            .from(
                                DataCollectionActivities::Table,
                                DataCollectionActivities::DatasetId,
                            )
                            .to(MonitoringDatasets::Table, MonitoringDatasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Agents::AgentId).string().not_null().unique_key())
                    .col(ColumnDef::new(Agents::Name).string().not_null())
                    .col(ColumnDef::new(Agents::AgentType).string_len(32).not_null())
                    .col(ColumnDef::new(Agents::Version).string_len(64).not_null().default(""))
                    .col(ColumnDef::new(Agents::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Agents::Homepage).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityAgents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActivityAgents::ActivityId).integer().not_null())
                    .col(ColumnDef::new(ActivityAgents::AgentId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ActivityAgents::ActivityId)
                            .col(ActivityAgents::AgentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activity_agents-activity_id")
                            .from(ActivityAgents::Table, ActivityAgents::ActivityId)
                            .to(DataCollectionActivities::Table, DataCollectionActivities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activity_agents-agent_id")
                            .from(ActivityAgents::Table, ActivityAgents::AgentId)
                            .to(Agents::Table, Agents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityAgents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataCollectionActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonitoringDatasets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sensors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ObservableProperties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SensorTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComputeNodes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum ComputeNodes {
    Table,
    Id,
    Hostname,
    Description,
    Location,
}

#[derive(Iden)]
enum SensorTypes {
    Table,
    Id,
    Name,
    Description,
    SosaUri,
}

#[derive(Iden)]
enum ObservableProperties {
    Table,
    Id,
    PropertyName,
    Label,
    Description,
    Unit,
    QudtUnitUri,
    DataType,
    SensorTypeId,
}

#[derive(Iden)]
enum Sensors {
    Table,
    Id,
    SensorId,
    SensorTypeId,
    ComputeNodeId,
    DeviceName,
    InterfaceName,
    Description,
}

#[derive(Iden)]
enum MonitoringDatasets {
    Table,
    Id,
    DatasetId,
    Title,
    Description,
    StartDate,
    EndDate,
    Issued,
    Modified,
    LicenseName,
    LicenseUrl,
    CreatorName,
    CreatorEmail,
    PublisherName,
    Keywords,
}

#[derive(Iden)]
enum DataFiles {
    Table,
    Id,
    DatasetId,
    Filename,
    FileFormat,
    MediaType,
    FilePath,
    FileSize,
    RowCount,
    Description,
    SensorTypeId,
}

#[derive(Iden)]
enum DataCollectionActivities {
    Table,
    Id,
    ActivityId,
    ActivityType,
    StartTime,
    EndTime,
    Description,
    DatasetId,
}

#[derive(Iden)]
enum Agents {
    Table,
    Id,
    AgentId,
    Name,
    AgentType,
    Version,
    Description,
    Homepage,
}

#[derive(Iden)]
enum ActivityAgents {
    Table,
    ActivityId,
    AgentId,
}

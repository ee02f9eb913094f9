use sea_orm_migration::prelude::*;

/// Site label stored when a reading arrives without one.
const DEFAULT_LOCATION: &str = "SmartGarden Home";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== TEMPERATURE DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(TemperatureData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemperatureData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TemperatureData::Temperature).double().not_null())
                    .col(ColumnDef::new(TemperatureData::Humidity).double().not_null())
                    .col(
                        ColumnDef::new(TemperatureData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemperatureData::Location)
                            .text()
                            .not_null()
                            .default(DEFAULT_LOCATION),
                    )
                    .to_owned(),
            )
            .await?;

        // History and "current" both sort by timestamp
        manager
            .create_index(
                Index::create()
                    .name("temperature_data_timestamp_idx")
                    .table(TemperatureData::Table)
                    .col(TemperatureData::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemperatureData::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TemperatureData {
    Table,
    Id,
    Temperature,
    Humidity,
    Timestamp,
    Location,
}

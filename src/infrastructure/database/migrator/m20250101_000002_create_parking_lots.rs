//! Create parking_lots table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingLots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingLots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingLots::Name).string().not_null())
                    .col(ColumnDef::new(ParkingLots::Location).string())
                    .col(
                        ColumnDef::new(ParkingLots::GridRows)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(ParkingLots::GridColumns)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(ParkingLots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingLots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingLots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingLots {
    Table,
    Id,
    Name,
    Location,
    GridRows,
    GridColumns,
    CreatedAt,
    UpdatedAt,
}

//! Create parking_spots table
//!
//! Spot number and grid position are unique within a lot; both constraints
//! are also re-checked transactionally in the repository so two concurrent
//! admin edits cannot race past each other.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_parking_lots::ParkingLots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSpots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ParkingSpots::SpotNumber).string().not_null())
                    .col(
                        ColumnDef::new(ParkingSpots::ParkingLotId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSpots::GridRow).integer().not_null())
                    .col(
                        ColumnDef::new(ParkingSpots::GridColumn)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::Orientation)
                            .string_len(1)
                            .not_null()
                            .default("N"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::Status)
                            .string()
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spots_lot")
                            .from(ParkingSpots::Table, ParkingSpots::ParkingLotId)
                            .to(ParkingLots::Table, ParkingLots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spots_lot")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::ParkingLotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_parking_spots_lot_number")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::ParkingLotId)
                    .col(ParkingSpots::SpotNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_parking_spots_lot_position")
                    .table(ParkingSpots::Table)
                    .col(ParkingSpots::ParkingLotId)
                    .col(ParkingSpots::GridRow)
                    .col(ParkingSpots::GridColumn)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpots {
    Table,
    Id,
    SpotNumber,
    ParkingLotId,
    GridRow,
    GridColumn,
    Orientation,
    Status,
    CreatedAt,
    UpdatedAt,
}

//! Parking spot entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_spots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub spot_number: String,
    pub parking_lot_id: i32,
    pub grid_row: i32,
    pub grid_column: i32,

    /// Compass orientation: N, E, S, W
    pub orientation: String,

    /// Administrative status: AVAILABLE, OCCUPIED, RESERVED, UNDER_MAINTENANCE
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking_lot::Entity",
        from = "Column::ParkingLotId",
        to = "super::parking_lot::Column::Id"
    )]
    ParkingLot,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::parking_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingLot.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Dashboard DTOs (also the shared lot/spot representations)

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::lot::ParkingLot;
use crate::domain::spot::ParkingSpot;
use crate::interfaces::http::modules::bookings::BookingWithSpotDto;

/// Parking lot in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct LotDto {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub grid_rows: i32,
    pub grid_cols: i32,
}

impl From<ParkingLot> for LotDto {
    fn from(lot: ParkingLot) -> Self {
        Self {
            id: lot.id,
            name: lot.name,
            location: lot.location,
            grid_rows: lot.grid_rows,
            grid_cols: lot.grid_cols,
        }
    }
}

/// Parking spot in API responses.
///
/// `status` is the administrative status; clients color the grid from it
/// alone.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpotDto {
    pub id: i32,
    pub spot_number: String,
    pub parking_lot_id: i32,
    pub grid_row: i32,
    pub grid_col: i32,
    pub orientation: String,
    pub status: String,
}

impl From<ParkingSpot> for SpotDto {
    fn from(spot: ParkingSpot) -> Self {
        Self {
            id: spot.id,
            spot_number: spot.spot_number,
            parking_lot_id: spot.parking_lot_id,
            grid_row: spot.grid_row,
            grid_col: spot.grid_col,
            orientation: spot.orientation.as_str().to_string(),
            status: spot.status.as_str().to_string(),
        }
    }
}

/// Everything the user dashboard renders in one response
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboardResponse {
    pub lot: LotDto,
    pub spots: Vec<SpotDto>,
    pub user_bookings: Vec<BookingWithSpotDto>,
}

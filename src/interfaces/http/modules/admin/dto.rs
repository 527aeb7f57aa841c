//! Admin DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::DashboardStats;
use crate::domain::booking::BookingRecord;
use crate::interfaces::http::modules::dashboard::{LotDto, SpotDto};

/// Aggregate stats for the admin overview tab
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_users: u64,
    pub total_bookings: u64,
    /// Modal booking-start hour (UTC, 0-23); absent while no bookings exist
    pub peak_hour: Option<u32>,
    /// The same hour formatted for display, e.g. "14:00"
    pub peak_time: Option<String>,
}

impl From<DashboardStats> for DashboardStatsDto {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.total_users,
            total_bookings: stats.total_bookings,
            peak_hour: stats.peak_hour,
            peak_time: stats.peak_hour.map(|h| format!("{h:02}:00")),
        }
    }
}

/// One row of the admin booking-records table
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingRecordDto {
    pub id: i32,
    pub user_name: String,
    pub user_email: String,
    pub spot_number: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<BookingRecord> for BookingRecordDto {
    fn from(r: BookingRecord) -> Self {
        Self {
            id: r.booking.id,
            user_name: r.user_name,
            user_email: r.user_email,
            spot_number: r.spot_number,
            start_time: r.booking.start_time.to_rfc3339(),
            end_time: r.booking.end_time.to_rfc3339(),
        }
    }
}

/// Request to create a parking lot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLotRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub grid_rows: i32,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub grid_cols: i32,
}

/// Request to create a parking spot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSpotRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub spot_number: String,
    pub parking_lot_id: i32,
    pub grid_row: i32,
    pub grid_col: i32,
    /// N, E, S or W; defaults to N
    pub orientation: Option<String>,
    /// AVAILABLE, OCCUPIED, RESERVED or UNDER_MAINTENANCE; defaults to AVAILABLE
    pub status: Option<String>,
}

/// Request to edit a parking spot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSpotRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub spot_number: String,
    pub grid_row: i32,
    pub grid_col: i32,
    pub orientation: String,
    pub status: String,
}

/// A lot with its spots, for the spot-management tab
#[derive(Debug, Serialize, ToSchema)]
pub struct LotWithSpotsDto {
    pub lot: LotDto,
    pub spots: Vec<SpotDto>,
}

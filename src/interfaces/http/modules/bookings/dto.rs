//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::booking::{Booking, BookingWithSpot};
use crate::interfaces::http::modules::dashboard::SpotDto;

/// Request to create a booking
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub parking_spot_id: i32,
    /// Booking window start (RFC 3339)
    pub start_time: DateTime<Utc>,
    /// Booking window end (RFC 3339, exclusive)
    pub end_time: DateTime<Utc>,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub parking_spot_id: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            parking_spot_id: b.parking_spot_id,
            start_time: b.start_time.to_rfc3339(),
            end_time: b.end_time.to_rfc3339(),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// A booking joined with its spot, for listings
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingWithSpotDto {
    pub id: i32,
    pub start_time: String,
    pub end_time: String,
    pub spot: SpotDto,
}

impl From<BookingWithSpot> for BookingWithSpotDto {
    fn from(row: BookingWithSpot) -> Self {
        Self {
            id: row.booking.id,
            start_time: row.booking.start_time.to_rfc3339(),
            end_time: row.booking.end_time.to_rfc3339(),
            spot: row.spot.into(),
        }
    }
}

/// Query parameters for listing the caller's bookings
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserBookingsParams {
    /// Include bookings that have already ended. Default: false
    #[serde(default)]
    pub include_history: bool,
}

//! Booking domain entity
//!
//! A booking reserves one spot for a contiguous time interval for one user.
//! Bookings are never updated in place: the lifecycle is create, then
//! owner-cancel or admin-cancel.

use chrono::{DateTime, Utc};

use crate::domain::spot::ParkingSpot;

/// A stored reservation of one spot for a time window
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i32,
    pub user_id: String,
    pub parking_spot_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a booking; the id is generated by the store.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub parking_spot_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Booking {
    /// Interval-overlap test against a candidate window.
    ///
    /// Overlap exists iff `self.start < end AND self.end > start`; intervals
    /// that merely touch at a boundary do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Whether the booking window has begun
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }
}

/// A booking joined with its spot, for user-facing listings
#[derive(Debug, Clone)]
pub struct BookingWithSpot {
    pub booking: Booking,
    pub spot: ParkingSpot,
}

/// A booking joined with user name/email and spot number, for the admin
/// booking-records view
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub booking: Booking,
    pub user_name: String,
    pub user_email: String,
    pub spot_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn booking(start_hour: u32, end_hour: u32) -> Booking {
        Booking {
            id: 1,
            user_id: "user-1".into(),
            parking_spot_id: 7,
            start_time: at(start_hour),
            end_time: at(end_hour),
            created_at: at(0),
        }
    }

    #[test]
    fn touching_boundary_is_not_overlap() {
        let b = booking(10, 11);
        assert!(!b.overlaps(at(11), at(12)));
        assert!(!b.overlaps(at(9), at(10)));
    }

    #[test]
    fn straddling_window_overlaps() {
        let b = booking(10, 12);
        assert!(b.overlaps(at(11), at(13)));
        assert!(b.overlaps(at(9), at(11)));
    }

    #[test]
    fn contained_window_overlaps() {
        let b = booking(10, 14);
        assert!(b.overlaps(at(11), at(12)));
        // and the inverse containment
        assert!(b.overlaps(at(9), at(15)));
    }

    #[test]
    fn disjoint_window_does_not_overlap() {
        let b = booking(10, 11);
        assert!(!b.overlaps(at(12), at(13)));
    }

    #[test]
    fn has_started_at_exact_start() {
        let b = booking(10, 11);
        assert!(b.has_started(at(10)));
        assert!(!b.has_started(at(9)));
    }
}

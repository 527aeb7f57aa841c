//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingRecord, BookingWithSpot, NewBooking};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking and return it with its generated id
    async fn create(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Find booking by ID restricted to an owner.
    ///
    /// Absence and foreign ownership are indistinguishable by design, so
    /// existence never leaks to non-owners.
    async fn find_by_id_for_user(&self, id: i32, user_id: &str)
        -> DomainResult<Option<Booking>>;

    /// Any booking on the spot overlapping [start, end); touching boundaries
    /// excluded
    async fn find_overlapping(
        &self,
        spot_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Option<Booking>>;

    /// A user's bookings joined with their spot, ordered by start ascending.
    /// When `since` is set, only bookings whose end is at or after it.
    async fn find_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingWithSpot>>;

    /// All bookings joined with user name/email and spot number, ordered by
    /// start descending
    async fn find_all_records(&self) -> DomainResult<Vec<BookingRecord>>;

    /// All booking start times (for aggregate stats)
    async fn all_start_times(&self) -> DomainResult<Vec<DateTime<Utc>>>;

    /// Total number of stored bookings
    async fn count(&self) -> DomainResult<u64>;

    /// Delete a booking row; Ok(false) when no row had that id
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}

//! Spot repository interface

use async_trait::async_trait;

use super::model::{NewParkingSpot, ParkingSpot, SpotUpdate};
use crate::domain::DomainResult;

#[async_trait]
pub trait SpotRepository: Send + Sync {
    /// Insert a new spot and return it with its generated id.
    ///
    /// Implementations must enforce, atomically with the insert, that
    /// `spot_number` and the (grid_row, grid_col) pair are unique within the
    /// lot, rejecting with `DomainError::Validation` otherwise.
    async fn create(&self, spot: NewParkingSpot) -> DomainResult<ParkingSpot>;

    /// Apply an admin edit to a spot.
    ///
    /// Same lot-scoped uniqueness rules as `create`, excluding the spot
    /// itself from the check.
    async fn update(&self, id: i32, update: SpotUpdate) -> DomainResult<ParkingSpot>;

    /// Delete a spot (bookings cascade)
    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// Find spot by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSpot>>;

    /// All spots in a lot ordered by (grid_row, grid_col)
    async fn find_by_lot(&self, lot_id: i32) -> DomainResult<Vec<ParkingSpot>>;
}

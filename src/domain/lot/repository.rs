//! Lot repository interface

use async_trait::async_trait;

use super::model::{NewParkingLot, ParkingLot};
use crate::domain::DomainResult;

#[async_trait]
pub trait LotRepository: Send + Sync {
    /// Insert a new lot and return it with its generated id
    async fn create(&self, lot: NewParkingLot) -> DomainResult<ParkingLot>;

    /// Find a lot by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingLot>>;

    /// All lots ordered by name ascending
    async fn find_all(&self) -> DomainResult<Vec<ParkingLot>>;
}

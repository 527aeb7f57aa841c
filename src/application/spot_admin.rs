//! Spot registry service: admin CRUD for lots and spots.
//!
//! Uniqueness of spot number and grid position within a lot is enforced by
//! the repositories atomically with the write, so two concurrent admin
//! edits cannot race past the check. This service adds input validation and
//! the admin gate.

use std::sync::Arc;

use tracing::info;

use crate::domain::identity::AuthIdentity;
use crate::domain::lot::{NewParkingLot, ParkingLot};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::spot::{NewParkingSpot, ParkingSpot, SpotUpdate};
use crate::domain::{DomainError, DomainResult};

pub struct SpotRegistryService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SpotRegistryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn require_admin(identity: &AuthIdentity) -> DomainResult<()> {
        if !identity.is_admin() {
            return Err(DomainError::Unauthorized("Admin role required".into()));
        }
        Ok(())
    }

    pub async fn create_lot(
        &self,
        identity: &AuthIdentity,
        lot: NewParkingLot,
    ) -> DomainResult<ParkingLot> {
        Self::require_admin(identity)?;

        if lot.name.trim().len() < 3 {
            return Err(DomainError::Validation(
                "Lot name must be at least 3 characters".into(),
            ));
        }
        if lot.grid_rows < 1 || lot.grid_cols < 1 {
            return Err(DomainError::Validation(
                "Grid dimensions must be at least 1x1".into(),
            ));
        }

        let lot = self.repos.lots().create(lot).await?;
        info!(lot_id = lot.id, name = %lot.name, "parking lot created");
        Ok(lot)
    }

    pub async fn create_spot(
        &self,
        identity: &AuthIdentity,
        spot: NewParkingSpot,
    ) -> DomainResult<ParkingSpot> {
        Self::require_admin(identity)?;

        if spot.spot_number.trim().is_empty() {
            return Err(DomainError::Validation("Spot number is required".into()));
        }
        let lot = self
            .repos
            .lots()
            .find_by_id(spot.parking_lot_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("ParkingLot", "id", spot.parking_lot_id)
            })?;
        if !lot.contains_position(spot.grid_row, spot.grid_col) {
            return Err(DomainError::Validation(format!(
                "Grid position ({}, {}) is outside the {}x{} lot grid",
                spot.grid_row, spot.grid_col, lot.grid_rows, lot.grid_cols
            )));
        }

        let spot = self.repos.spots().create(spot).await?;
        info!(spot_id = spot.id, lot_id = spot.parking_lot_id, "spot created");
        Ok(spot)
    }

    pub async fn update_spot(
        &self,
        identity: &AuthIdentity,
        spot_id: i32,
        update: SpotUpdate,
    ) -> DomainResult<ParkingSpot> {
        Self::require_admin(identity)?;

        if update.spot_number.trim().is_empty() {
            return Err(DomainError::Validation("Spot number is required".into()));
        }
        let existing = self
            .repos
            .spots()
            .find_by_id(spot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpot", "id", spot_id))?;
        let lot = self
            .repos
            .lots()
            .find_by_id(existing.parking_lot_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("ParkingLot", "id", existing.parking_lot_id)
            })?;
        if !lot.contains_position(update.grid_row, update.grid_col) {
            return Err(DomainError::Validation(format!(
                "Grid position ({}, {}) is outside the {}x{} lot grid",
                update.grid_row, update.grid_col, lot.grid_rows, lot.grid_cols
            )));
        }

        let spot = self.repos.spots().update(spot_id, update).await?;
        info!(spot_id, "spot updated");
        Ok(spot)
    }

    pub async fn delete_spot(&self, identity: &AuthIdentity, spot_id: i32) -> DomainResult<()> {
        Self::require_admin(identity)?;
        self.repos.spots().delete(spot_id).await?;
        info!(spot_id, "spot deleted");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::identity::Role;
    use crate::domain::spot::{Orientation, SpotStatus};
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    fn admin() -> AuthIdentity {
        AuthIdentity::new("root", Role::Admin)
    }

    fn alice() -> AuthIdentity {
        AuthIdentity::new("alice", Role::User)
    }

    fn new_spot(lot_id: i32, number: &str, row: i32, col: i32) -> NewParkingSpot {
        NewParkingSpot {
            spot_number: number.into(),
            parking_lot_id: lot_id,
            grid_row: row,
            grid_col: col,
            orientation: Orientation::North,
            status: SpotStatus::Available,
        }
    }

    async fn service_with_lot() -> (SpotRegistryService, i32) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(MemoryRepositoryProvider::new());
        let service = SpotRegistryService::new(repos);
        let lot = service
            .create_lot(
                &admin(),
                NewParkingLot {
                    name: "Main Lot".into(),
                    location: Some("North Campus".into()),
                    grid_rows: 3,
                    grid_cols: 3,
                },
            )
            .await
            .unwrap();
        (service, lot.id)
    }

    #[tokio::test]
    async fn non_admin_rejected_everywhere() {
        let (service, lot_id) = service_with_lot().await;
        assert!(matches!(
            service
                .create_spot(&alice(), new_spot(lot_id, "A-01", 0, 0))
                .await
                .unwrap_err(),
            DomainError::Unauthorized(_)
        ));
        assert!(matches!(
            service.delete_spot(&alice(), 1).await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn short_lot_name_rejected() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(MemoryRepositoryProvider::new());
        let service = SpotRegistryService::new(repos);
        let err = service
            .create_lot(
                &admin(),
                NewParkingLot {
                    name: "ab".into(),
                    location: None,
                    grid_rows: 1,
                    grid_cols: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_spot_number_in_lot_rejected() {
        let (service, lot_id) = service_with_lot().await;
        service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 0))
            .await
            .unwrap();
        let err = service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_grid_position_in_lot_rejected() {
        let (service, lot_id) = service_with_lot().await;
        service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 0))
            .await
            .unwrap();
        let err = service
            .create_spot(&admin(), new_spot(lot_id, "A-02", 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn position_outside_grid_rejected() {
        let (service, lot_id) = service_with_lot().await;
        let err = service
            .create_spot(&admin(), new_spot(lot_id, "Z-99", 3, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_can_move_spot_to_free_position() {
        let (service, lot_id) = service_with_lot().await;
        let spot = service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 0))
            .await
            .unwrap();
        let updated = service
            .update_spot(
                &admin(),
                spot.id,
                SpotUpdate {
                    spot_number: "A-01".into(),
                    grid_row: 1,
                    grid_col: 1,
                    orientation: Orientation::East,
                    status: SpotStatus::UnderMaintenance,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.grid_row, 1);
        assert_eq!(updated.status, SpotStatus::UnderMaintenance);
        assert_eq!(updated.orientation, Orientation::East);
    }

    #[tokio::test]
    async fn update_keeping_own_number_is_allowed() {
        let (service, lot_id) = service_with_lot().await;
        let spot = service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 0))
            .await
            .unwrap();
        // Same number, same position: the uniqueness check must exclude self
        service
            .update_spot(
                &admin(),
                spot.id,
                SpotUpdate {
                    spot_number: "A-01".into(),
                    grid_row: 0,
                    grid_col: 0,
                    orientation: Orientation::North,
                    status: SpotStatus::Reserved,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_onto_taken_position_rejected() {
        let (service, lot_id) = service_with_lot().await;
        service
            .create_spot(&admin(), new_spot(lot_id, "A-01", 0, 0))
            .await
            .unwrap();
        let other = service
            .create_spot(&admin(), new_spot(lot_id, "A-02", 0, 1))
            .await
            .unwrap();
        let err = service
            .update_spot(
                &admin(),
                other.id,
                SpotUpdate {
                    spot_number: "A-02".into(),
                    grid_row: 0,
                    grid_col: 0,
                    orientation: Orientation::North,
                    status: SpotStatus::Available,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_missing_spot_is_not_found() {
        let (service, _) = service_with_lot().await;
        let err = service.delete_spot(&admin(), 42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

//! SeaORM implementation of SpotRepository
//!
//! Lot-scoped uniqueness (spot number, grid position) is checked and written
//! inside one transaction so two concurrent admin edits cannot both pass the
//! check. The unique indexes on the table back this up at the schema level.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::spot::{NewParkingSpot, ParkingSpot, SpotRepository, SpotStatus, SpotUpdate};
use crate::domain::spot::model::Orientation;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_spot;

pub struct SeaOrmSpotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSpotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: parking_spot::Model) -> ParkingSpot {
    ParkingSpot {
        id: m.id,
        spot_number: m.spot_number,
        parking_lot_id: m.parking_lot_id,
        grid_row: m.grid_row,
        grid_col: m.grid_column,
        orientation: Orientation::from_str(&m.orientation),
        status: SpotStatus::from_str(&m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Reject a spot number or grid position already taken within the lot.
/// `exclude_id` skips the spot being edited.
async fn check_uniqueness<C: ConnectionTrait>(
    conn: &C,
    lot_id: i32,
    spot_number: &str,
    row: i32,
    col: i32,
    exclude_id: Option<i32>,
) -> DomainResult<()> {
    let mut number_query = parking_spot::Entity::find()
        .filter(parking_spot::Column::ParkingLotId.eq(lot_id))
        .filter(parking_spot::Column::SpotNumber.eq(spot_number));
    if let Some(id) = exclude_id {
        number_query = number_query.filter(parking_spot::Column::Id.ne(id));
    }
    if number_query.one(conn).await.map_err(db_err)?.is_some() {
        return Err(DomainError::Validation(format!(
            "Spot number '{}' already exists in this lot",
            spot_number
        )));
    }

    let mut position_query = parking_spot::Entity::find()
        .filter(parking_spot::Column::ParkingLotId.eq(lot_id))
        .filter(parking_spot::Column::GridRow.eq(row))
        .filter(parking_spot::Column::GridColumn.eq(col));
    if let Some(id) = exclude_id {
        position_query = position_query.filter(parking_spot::Column::Id.ne(id));
    }
    if position_query.one(conn).await.map_err(db_err)?.is_some() {
        return Err(DomainError::Validation(format!(
            "Grid position ({}, {}) is already taken in this lot",
            row, col
        )));
    }

    Ok(())
}

// ── SpotRepository impl ─────────────────────────────────────────

#[async_trait]
impl SpotRepository for SeaOrmSpotRepository {
    async fn create(&self, spot: NewParkingSpot) -> DomainResult<ParkingSpot> {
        debug!(
            "Creating spot {} in lot {}",
            spot.spot_number, spot.parking_lot_id
        );

        let txn = self.db.begin().await.map_err(db_err)?;

        check_uniqueness(
            &txn,
            spot.parking_lot_id,
            &spot.spot_number,
            spot.grid_row,
            spot.grid_col,
            None,
        )
        .await?;

        let now = Utc::now();
        let model = parking_spot::ActiveModel {
            spot_number: Set(spot.spot_number),
            parking_lot_id: Set(spot.parking_lot_id),
            grid_row: Set(spot.grid_row),
            grid_column: Set(spot.grid_col),
            orientation: Set(spot.orientation.as_str().to_string()),
            status: Set(spot.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, id: i32, update: SpotUpdate) -> DomainResult<ParkingSpot> {
        debug!("Updating spot {}", id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = parking_spot::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("ParkingSpot", "id", id))?;

        check_uniqueness(
            &txn,
            existing.parking_lot_id,
            &update.spot_number,
            update.grid_row,
            update.grid_col,
            Some(id),
        )
        .await?;

        let mut active: parking_spot::ActiveModel = existing.into();
        active.spot_number = Set(update.spot_number);
        active.grid_row = Set(update.grid_row);
        active.grid_column = Set(update.grid_col);
        active.orientation = Set(update.orientation.as_str().to_string());
        active.status = Set(update.status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = parking_spot::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("ParkingSpot", "id", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSpot>> {
        let model = parking_spot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_lot(&self, lot_id: i32) -> DomainResult<Vec<ParkingSpot>> {
        let models = parking_spot::Entity::find()
            .filter(parking_spot::Column::ParkingLotId.eq(lot_id))
            .order_by_asc(parking_spot::Column::GridRow)
            .order_by_asc(parking_spot::Column::GridColumn)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

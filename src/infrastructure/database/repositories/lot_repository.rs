//! SeaORM implementation of LotRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::lot::{LotRepository, NewParkingLot, ParkingLot};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::parking_lot;

pub struct SeaOrmLotRepository {
    db: DatabaseConnection,
}

impl SeaOrmLotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: parking_lot::Model) -> ParkingLot {
    ParkingLot {
        id: m.id,
        name: m.name,
        location: m.location,
        grid_rows: m.grid_rows,
        grid_cols: m.grid_columns,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── LotRepository impl ──────────────────────────────────────────

#[async_trait]
impl LotRepository for SeaOrmLotRepository {
    async fn create(&self, lot: NewParkingLot) -> DomainResult<ParkingLot> {
        debug!("Creating parking lot: {}", lot.name);

        let now = Utc::now();
        let model = parking_lot::ActiveModel {
            name: Set(lot.name),
            location: Set(lot.location),
            grid_rows: Set(lot.grid_rows),
            grid_columns: Set(lot.grid_cols),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingLot>> {
        let model = parking_lot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<ParkingLot>> {
        let models = parking_lot::Entity::find()
            .order_by_asc(parking_lot::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

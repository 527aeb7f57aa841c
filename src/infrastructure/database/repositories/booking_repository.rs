//! SeaORM implementation of BookingRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::booking::{
    Booking, BookingRecord, BookingRepository, BookingWithSpot, NewBooking,
};
use crate::domain::spot::model::Orientation;
use crate::domain::spot::{ParkingSpot, SpotStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, parking_spot, user};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        user_id: m.user_id,
        parking_spot_id: m.parking_spot_id,
        start_time: m.start_time,
        end_time: m.end_time,
        created_at: m.created_at,
    }
}

fn spot_to_domain(m: parking_spot::Model) -> ParkingSpot {
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

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create(&self, new: NewBooking) -> DomainResult<Booking> {
        debug!(
            "Creating booking: spot={} user={}",
            new.parking_spot_id, new.user_id
        );

        let model = booking::ActiveModel {
            user_id: Set(new.user_id),
            parking_spot_id: Set(new.parking_spot_id),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id_for_user(
        &self,
        id: i32,
        user_id: &str,
    ) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .filter(booking::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_overlapping(
        &self,
        spot_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Option<Booking>> {
        // existing.start < new.end AND existing.end > new.start
        let model = booking::Entity::find()
            .filter(booking::Column::ParkingSpotId.eq(spot_id))
            .filter(booking::Column::StartTime.lt(end))
            .filter(booking::Column::EndTime.gt(start))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingWithSpot>> {
        let mut query = booking::Entity::find().filter(booking::Column::UserId.eq(user_id));
        if let Some(since) = since {
            query = query.filter(booking::Column::EndTime.gte(since));
        }

        let rows = query
            .find_also_related(parking_spot::Entity)
            .order_by_asc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut result = Vec::with_capacity(rows.len());
        for (b, spot) in rows {
            let spot = spot.ok_or_else(|| {
                DomainError::Storage(format!("booking {} references a missing spot", b.id))
            })?;
            result.push(BookingWithSpot {
                booking: model_to_domain(b),
                spot: spot_to_domain(spot),
            });
        }
        Ok(result)
    }

    async fn find_all_records(&self) -> DomainResult<Vec<BookingRecord>> {
        let rows = booking::Entity::find()
            .find_also_related(user::Entity)
            .order_by_desc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // One extra query for spot numbers instead of a three-way join
        let spot_ids: Vec<i32> = rows.iter().map(|(b, _)| b.parking_spot_id).collect();
        let spots: HashMap<i32, String> = parking_spot::Entity::find()
            .filter(parking_spot::Column::Id.is_in(spot_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|s| (s.id, s.spot_number))
            .collect();

        let mut result = Vec::with_capacity(rows.len());
        for (b, u) in rows {
            let u = u.ok_or_else(|| {
                DomainError::Storage(format!("booking {} references a missing user", b.id))
            })?;
            let spot_number = spots
                .get(&b.parking_spot_id)
                .cloned()
                .unwrap_or_default();
            result.push(BookingRecord {
                booking: model_to_domain(b),
                user_name: u.name,
                user_email: u.email,
                spot_number,
            });
        }
        Ok(result)
    }

    async fn all_start_times(&self) -> DomainResult<Vec<DateTime<Utc>>> {
        let rows: Vec<DateTime<Utc>> = booking::Entity::find()
            .select_only()
            .column(booking::Column::StartTime)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows)
    }

    async fn count(&self) -> DomainResult<u64> {
        booking::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let result = booking::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

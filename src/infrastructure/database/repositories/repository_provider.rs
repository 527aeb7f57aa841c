//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::lot::LotRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::spot::SpotRepository;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::lot_repository::SeaOrmLotRepository;
use super::spot_repository::SeaOrmSpotRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let spot = repos.spots().find_by_id(7).await?;
/// let clash = repos.bookings().find_overlapping(7, start, end).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    lots: SeaOrmLotRepository,
    spots: SeaOrmSpotRepository,
    bookings: SeaOrmBookingRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            lots: SeaOrmLotRepository::new(db.clone()),
            spots: SeaOrmSpotRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn lots(&self) -> &dyn LotRepository {
        &self.lots
    }

    fn spots(&self) -> &dyn SpotRepository {
        &self.spots
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

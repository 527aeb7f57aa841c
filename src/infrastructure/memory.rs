//! In-memory repository provider.
//!
//! Backs the application services with plain vectors behind a mutex. Used by
//! the service-level tests and handy for demos; the SeaORM provider is the
//! production backend. Mirrors the repository contracts exactly, including
//! lot-scoped spot uniqueness (trivially atomic under the single lock).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::booking::{
    Booking, BookingRecord, BookingRepository, BookingWithSpot, NewBooking,
};
use crate::domain::identity::Role;
use crate::domain::lot::{LotRepository, NewParkingLot, ParkingLot};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::spot::{NewParkingSpot, ParkingSpot, SpotRepository, SpotUpdate};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};

#[derive(Default)]
struct State {
    lots: Vec<ParkingLot>,
    spots: Vec<ParkingSpot>,
    bookings: Vec<Booking>,
    users: Vec<User>,
    next_lot_id: i32,
    next_spot_id: i32,
    next_booking_id: i32,
}

type Shared = Arc<Mutex<State>>;

pub struct MemoryLotRepository {
    state: Shared,
}

pub struct MemorySpotRepository {
    state: Shared,
}

pub struct MemoryBookingRepository {
    state: Shared,
}

pub struct MemoryUserRepository {
    state: Shared,
}

/// All four repositories over one shared in-memory state.
pub struct MemoryRepositoryProvider {
    lots: MemoryLotRepository,
    spots: MemorySpotRepository,
    bookings: MemoryBookingRepository,
    users: MemoryUserRepository,
}

impl MemoryRepositoryProvider {
    pub fn new() -> Self {
        let state: Shared = Arc::new(Mutex::new(State::default()));
        Self {
            lots: MemoryLotRepository {
                state: state.clone(),
            },
            spots: MemorySpotRepository {
                state: state.clone(),
            },
            bookings: MemoryBookingRepository {
                state: state.clone(),
            },
            users: MemoryUserRepository { state },
        }
    }
}

impl Default for MemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for MemoryRepositoryProvider {
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

#[async_trait]
impl LotRepository for MemoryLotRepository {
    async fn create(&self, lot: NewParkingLot) -> DomainResult<ParkingLot> {
        let mut state = self.state.lock().unwrap();
        state.next_lot_id += 1;
        let now = Utc::now();
        let lot = ParkingLot {
            id: state.next_lot_id,
            name: lot.name,
            location: lot.location,
            grid_rows: lot.grid_rows,
            grid_cols: lot.grid_cols,
            created_at: now,
            updated_at: now,
        };
        state.lots.push(lot.clone());
        Ok(lot)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingLot>> {
        let state = self.state.lock().unwrap();
        Ok(state.lots.iter().find(|l| l.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<ParkingLot>> {
        let state = self.state.lock().unwrap();
        let mut lots = state.lots.clone();
        lots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lots)
    }
}

fn check_spot_uniqueness(
    state: &State,
    lot_id: i32,
    spot_number: &str,
    row: i32,
    col: i32,
    exclude_id: Option<i32>,
) -> DomainResult<()> {
    for s in state
        .spots
        .iter()
        .filter(|s| s.parking_lot_id == lot_id && Some(s.id) != exclude_id)
    {
        if s.spot_number == spot_number {
            return Err(DomainError::Validation(format!(
                "Spot number '{}' already exists in this lot",
                spot_number
            )));
        }
        if s.grid_row == row && s.grid_col == col {
            return Err(DomainError::Validation(format!(
                "Grid position ({}, {}) is already taken in this lot",
                row, col
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl SpotRepository for MemorySpotRepository {
    async fn create(&self, spot: NewParkingSpot) -> DomainResult<ParkingSpot> {
        let mut state = self.state.lock().unwrap();
        check_spot_uniqueness(
            &state,
            spot.parking_lot_id,
            &spot.spot_number,
            spot.grid_row,
            spot.grid_col,
            None,
        )?;
        state.next_spot_id += 1;
        let now = Utc::now();
        let spot = ParkingSpot {
            id: state.next_spot_id,
            spot_number: spot.spot_number,
            parking_lot_id: spot.parking_lot_id,
            grid_row: spot.grid_row,
            grid_col: spot.grid_col,
            orientation: spot.orientation,
            status: spot.status,
            created_at: now,
            updated_at: now,
        };
        state.spots.push(spot.clone());
        Ok(spot)
    }

    async fn update(&self, id: i32, update: SpotUpdate) -> DomainResult<ParkingSpot> {
        let mut state = self.state.lock().unwrap();
        let lot_id = state
            .spots
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.parking_lot_id)
            .ok_or_else(|| DomainError::not_found("ParkingSpot", "id", id))?;
        check_spot_uniqueness(
            &state,
            lot_id,
            &update.spot_number,
            update.grid_row,
            update.grid_col,
            Some(id),
        )?;
        let spot = state.spots.iter_mut().find(|s| s.id == id).unwrap();
        spot.spot_number = update.spot_number;
        spot.grid_row = update.grid_row;
        spot.grid_col = update.grid_col;
        spot.orientation = update.orientation;
        spot.status = update.status;
        spot.updated_at = Utc::now();
        Ok(spot.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.spots.len();
        state.spots.retain(|s| s.id != id);
        if state.spots.len() == before {
            return Err(DomainError::not_found("ParkingSpot", "id", id));
        }
        // cascade, as the schema does
        state.bookings.retain(|b| b.parking_spot_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ParkingSpot>> {
        let state = self.state.lock().unwrap();
        Ok(state.spots.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_lot(&self, lot_id: i32) -> DomainResult<Vec<ParkingSpot>> {
        let state = self.state.lock().unwrap();
        let mut spots: Vec<_> = state
            .spots
            .iter()
            .filter(|s| s.parking_lot_id == lot_id)
            .cloned()
            .collect();
        spots.sort_by_key(|s| (s.grid_row, s.grid_col));
        Ok(spots)
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn create(&self, new: NewBooking) -> DomainResult<Booking> {
        let mut state = self.state.lock().unwrap();
        state.next_booking_id += 1;
        let booking = Booking {
            id: state.next_booking_id,
            user_id: new.user_id,
            parking_spot_id: new.parking_spot_id,
            start_time: new.start_time,
            end_time: new.end_time,
            created_at: Utc::now(),
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_id_for_user(
        &self,
        id: i32,
        user_id: &str,
    ) -> DomainResult<Option<Booking>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn find_overlapping(
        &self,
        spot_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Option<Booking>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .iter()
            .find(|b| b.parking_spot_id == spot_id && b.overlaps(start, end))
            .cloned())
    }

    async fn find_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<BookingWithSpot>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<BookingWithSpot> = state
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| since.map_or(true, |t| b.end_time >= t))
            .map(|b| -> DomainResult<BookingWithSpot> {
                let spot = state
                    .spots
                    .iter()
                    .find(|s| s.id == b.parking_spot_id)
                    .cloned()
                    .ok_or_else(|| {
                        DomainError::Storage(format!(
                            "booking {} references a missing spot",
                            b.id
                        ))
                    })?;
                Ok(BookingWithSpot {
                    booking: b.clone(),
                    spot,
                })
            })
            .collect::<DomainResult<_>>()?;
        rows.sort_by_key(|r| r.booking.start_time);
        Ok(rows)
    }

    async fn find_all_records(&self) -> DomainResult<Vec<BookingRecord>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<BookingRecord> = state
            .bookings
            .iter()
            .map(|b| -> DomainResult<BookingRecord> {
                let user = state
                    .users
                    .iter()
                    .find(|u| u.id == b.user_id)
                    .ok_or_else(|| {
                        DomainError::Storage(format!(
                            "booking {} references a missing user",
                            b.id
                        ))
                    })?;
                let spot_number = state
                    .spots
                    .iter()
                    .find(|s| s.id == b.parking_spot_id)
                    .map(|s| s.spot_number.clone())
                    .unwrap_or_default();
                Ok(BookingRecord {
                    booking: b.clone(),
                    user_name: user.name.clone(),
                    user_email: user.email.clone(),
                    spot_number,
                })
            })
            .collect::<DomainResult<_>>()?;
        rows.sort_by_key(|r| std::cmp::Reverse(r.booking.start_time));
        Ok(rows)
    }

    async fn all_start_times(&self) -> DomainResult<Vec<DateTime<Utc>>> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.iter().map(|b| b.start_time).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.len() as u64)
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.bookings.len();
        state.bookings.retain(|b| b.id != id);
        Ok(state.bookings.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: User) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Validation("Email already registered".into()));
        }
        state.users.push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.last_login_at = Some(at);
        Ok(())
    }

    async fn set_role(&self, id: &str, role: Role) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        let state = self.state.lock().unwrap();
        Ok(state.users.len() as u64)
    }
}

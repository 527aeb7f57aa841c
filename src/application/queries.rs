//! Read-side query façade.
//!
//! Pure projections over the repositories: nothing here mutates state, and
//! spot occupancy coloring is derived from administrative status alone,
//! never from the booking ledger.

use std::sync::Arc;

use chrono::{Timelike, Utc};

use crate::domain::booking::{BookingRecord, BookingWithSpot};
use crate::domain::identity::AuthIdentity;
use crate::domain::lot::ParkingLot;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::spot::ParkingSpot;
use crate::domain::{DomainError, DomainResult};

/// Everything a user's dashboard needs in one call: the lot, its spots in
/// grid order, and the caller's upcoming bookings.
#[derive(Debug)]
pub struct UserDashboard {
    pub lot: ParkingLot,
    pub spots: Vec<ParkingSpot>,
    pub user_bookings: Vec<BookingWithSpot>,
}

/// Aggregate counters for the admin overview tab.
#[derive(Debug, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_bookings: u64,
    /// Modal booking-start hour (UTC, 0-23); None while the ledger is empty
    pub peak_hour: Option<u32>,
}

pub struct QueryFacade {
    repos: Arc<dyn RepositoryProvider>,
}

impl QueryFacade {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn require_admin(identity: &AuthIdentity) -> DomainResult<()> {
        if !identity.is_admin() {
            return Err(DomainError::Unauthorized("Admin role required".into()));
        }
        Ok(())
    }

    /// The caller's bookings joined with their spot, ordered by start
    /// ascending. Without `include_history` only bookings that have not yet
    /// ended are returned.
    pub async fn get_user_bookings(
        &self,
        identity: &AuthIdentity,
        include_history: bool,
    ) -> DomainResult<Vec<BookingWithSpot>> {
        let since = if include_history {
            None
        } else {
            Some(Utc::now())
        };
        self.repos
            .bookings()
            .find_for_user(&identity.user_id, since)
            .await
    }

    /// All bookings with user name/email and spot number, newest start
    /// first. Admin only.
    pub async fn get_all_bookings(
        &self,
        identity: &AuthIdentity,
    ) -> DomainResult<Vec<BookingRecord>> {
        Self::require_admin(identity)?;
        self.repos.bookings().find_all_records().await
    }

    /// All lots ordered by name.
    pub async fn get_all_lots(&self) -> DomainResult<Vec<ParkingLot>> {
        self.repos.lots().find_all().await
    }

    /// A lot with its spots in (row, column) order plus the caller's
    /// upcoming bookings.
    pub async fn get_user_dashboard(
        &self,
        identity: &AuthIdentity,
        lot_id: i32,
    ) -> DomainResult<UserDashboard> {
        let lot = self
            .repos
            .lots()
            .find_by_id(lot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingLot", "id", lot_id))?;
        let spots = self.repos.spots().find_by_lot(lot_id).await?;
        let user_bookings = self
            .repos
            .bookings()
            .find_for_user(&identity.user_id, Some(Utc::now()))
            .await?;
        Ok(UserDashboard {
            lot,
            spots,
            user_bookings,
        })
    }

    /// A lot with its spots, for the admin spot-management tab.
    pub async fn get_lot_for_management(
        &self,
        identity: &AuthIdentity,
        lot_id: i32,
    ) -> DomainResult<(ParkingLot, Vec<ParkingSpot>)> {
        Self::require_admin(identity)?;
        let lot = self
            .repos
            .lots()
            .find_by_id(lot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingLot", "id", lot_id))?;
        let spots = self.repos.spots().find_by_lot(lot_id).await?;
        Ok((lot, spots))
    }

    /// User and booking counts plus the peak usage hour. Admin only.
    ///
    /// Peak hour is the modal booking-start hour in UTC; ties resolve to
    /// the earliest hour so the answer is deterministic.
    pub async fn get_dashboard_stats(
        &self,
        identity: &AuthIdentity,
    ) -> DomainResult<DashboardStats> {
        Self::require_admin(identity)?;

        let total_users = self.repos.users().count().await?;
        let total_bookings = self.repos.bookings().count().await?;

        let starts = self.repos.bookings().all_start_times().await?;
        let mut by_hour = [0u64; 24];
        for t in &starts {
            by_hour[t.hour() as usize] += 1;
        }
        let peak_hour = by_hour
            .iter()
            .enumerate()
            .max_by_key(|(hour, count)| (**count, std::cmp::Reverse(*hour)))
            .filter(|(_, count)| **count > 0)
            .map(|(hour, _)| hour as u32);

        Ok(DashboardStats {
            total_users,
            total_bookings,
            peak_hour,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::domain::booking::NewBooking;
    use crate::domain::identity::Role;
    use crate::domain::lot::NewParkingLot;
    use crate::domain::spot::{NewParkingSpot, Orientation, SpotStatus};
    use crate::domain::user::User;
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    fn user(id: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@example.com"),
            password_hash: "x".into(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    async fn seeded() -> (Arc<dyn RepositoryProvider>, QueryFacade, i32, i32) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(MemoryRepositoryProvider::new());
        repos.users().create(user("alice", Role::User)).await.unwrap();
        repos.users().create(user("root", Role::Admin)).await.unwrap();
        let lot = repos
            .lots()
            .create(NewParkingLot {
                name: "Main Lot".into(),
                location: Some("North Campus".into()),
                grid_rows: 2,
                grid_cols: 2,
            })
            .await
            .unwrap();
        // Inserted out of grid order on purpose
        let mut spot_ids = Vec::new();
        for (n, row, col) in [("B-02", 1, 1), ("A-01", 0, 0), ("A-02", 0, 1)] {
            let s = repos
                .spots()
                .create(NewParkingSpot {
                    spot_number: n.into(),
                    parking_lot_id: lot.id,
                    grid_row: row,
                    grid_col: col,
                    orientation: Orientation::North,
                    status: SpotStatus::Available,
                })
                .await
                .unwrap();
            spot_ids.push(s.id);
        }
        (repos.clone(), QueryFacade::new(repos), lot.id, spot_ids[1])
    }

    fn alice() -> AuthIdentity {
        AuthIdentity::new("alice", Role::User)
    }

    fn admin() -> AuthIdentity {
        AuthIdentity::new("root", Role::Admin)
    }

    async fn book(
        repos: &Arc<dyn RepositoryProvider>,
        user_id: &str,
        spot_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        repos
            .bookings()
            .create(NewBooking {
                user_id: user_id.into(),
                parking_spot_id: spot_id,
                start_time: start,
                end_time: end,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn user_bookings_hide_history_by_default() {
        let (repos, facade, _, spot) = seeded().await;
        let now = Utc::now();
        book(&repos, "alice", spot, now - Duration::hours(3), now - Duration::hours(2)).await;
        book(&repos, "alice", spot, now + Duration::hours(1), now + Duration::hours(2)).await;

        let upcoming = facade.get_user_bookings(&alice(), false).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert!(upcoming[0].booking.end_time >= now);

        let all = facade.get_user_bookings(&alice(), true).await.unwrap();
        assert_eq!(all.len(), 2);
        // ascending by start
        assert!(all[0].booking.start_time < all[1].booking.start_time);
    }

    #[tokio::test]
    async fn all_bookings_is_admin_only_and_joined() {
        let (repos, facade, _, spot) = seeded().await;
        let now = Utc::now();
        book(&repos, "alice", spot, now + Duration::hours(1), now + Duration::hours(2)).await;
        book(&repos, "alice", spot, now + Duration::hours(3), now + Duration::hours(4)).await;

        let err = facade.get_all_bookings(&alice()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let records = facade.get_all_bookings(&admin()).await.unwrap();
        assert_eq!(records.len(), 2);
        // descending by start
        assert!(records[0].booking.start_time > records[1].booking.start_time);
        assert_eq!(records[0].user_email, "alice@example.com");
        assert_eq!(records[0].spot_number, "A-01");
    }

    #[tokio::test]
    async fn dashboard_spots_come_in_grid_order() {
        let (_, facade, lot_id, _) = seeded().await;
        let dashboard = facade.get_user_dashboard(&alice(), lot_id).await.unwrap();
        let numbers: Vec<_> = dashboard
            .spots
            .iter()
            .map(|s| s.spot_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["A-01", "A-02", "B-02"]);
    }

    #[tokio::test]
    async fn dashboard_for_missing_lot_is_not_found() {
        let (_, facade, _, _) = seeded().await;
        let err = facade.get_user_dashboard(&alice(), 999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lot_management_requires_admin() {
        let (_, facade, lot_id, _) = seeded().await;
        assert!(facade
            .get_lot_for_management(&alice(), lot_id)
            .await
            .is_err());
        let (lot, spots) = facade
            .get_lot_for_management(&admin(), lot_id)
            .await
            .unwrap();
        assert_eq!(lot.id, lot_id);
        assert_eq!(spots.len(), 3);
    }

    #[tokio::test]
    async fn stats_count_users_and_bookings() {
        let (repos, facade, _, spot) = seeded().await;
        let now = Utc::now();
        book(&repos, "alice", spot, now + Duration::hours(1), now + Duration::hours(2)).await;

        let stats = facade.get_dashboard_stats(&admin()).await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_bookings, 1);
    }

    #[tokio::test]
    async fn peak_hour_is_modal_start_hour() {
        let (repos, facade, _, spot) = seeded().await;
        let day = |h: u32, d: u32| Utc.with_ymd_and_hms(2030, 5, d, h, 0, 0).unwrap();
        // two bookings starting at 14:00 on different days, one at 09:00
        book(&repos, "alice", spot, day(14, 1), day(15, 1)).await;
        book(&repos, "alice", spot, day(14, 2), day(15, 2)).await;
        book(&repos, "alice", spot, day(9, 3), day(10, 3)).await;

        let stats = facade.get_dashboard_stats(&admin()).await.unwrap();
        assert_eq!(stats.peak_hour, Some(14));
    }

    #[tokio::test]
    async fn peak_hour_empty_ledger_is_none() {
        let (_, facade, _, _) = seeded().await;
        let stats = facade.get_dashboard_stats(&admin()).await.unwrap();
        assert_eq!(stats.peak_hour, None);
        assert_eq!(stats.total_bookings, 0);
    }

    #[tokio::test]
    async fn peak_hour_tie_resolves_to_earliest() {
        let (repos, facade, _, spot) = seeded().await;
        let day = |h: u32, d: u32| Utc.with_ymd_and_hms(2030, 5, d, h, 0, 0).unwrap();
        book(&repos, "alice", spot, day(16, 1), day(17, 1)).await;
        book(&repos, "alice", spot, day(8, 2), day(9, 2)).await;

        let stats = facade.get_dashboard_stats(&admin()).await.unwrap();
        assert_eq!(stats.peak_hour, Some(8));
    }
}

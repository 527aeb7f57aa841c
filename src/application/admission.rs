//! Booking admission service.
//!
//! The one concurrency-sensitive path in the system: validating a booking
//! request against the spot registry and the booking ledger, then inserting
//! it. The overlap check-then-insert is guarded by a per-spot async mutex so
//! that of two racing overlapping requests, exactly one commits and the
//! other observes the committed row and is rejected with `Conflict`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::booking::{Booking, NewBooking};
use crate::domain::identity::AuthIdentity;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

pub struct BookingAdmissionService {
    repos: Arc<dyn RepositoryProvider>,
    /// One lock per spot, created lazily on first booking attempt.
    /// Held across the overlap check and the insert, never across requests.
    spot_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl BookingAdmissionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            spot_locks: DashMap::new(),
        }
    }

    /// Create a booking for the caller on `spot_id` over `[start, end)`.
    ///
    /// Checks run in order, each a precondition for the next:
    /// 1. `InvalidRange`: start >= end
    /// 2. `InPast`: start < now
    /// 3. `NotFound`: no such spot
    /// 4. `SpotUnavailable`: spot is under maintenance
    /// 5. `Conflict`: an existing booking on the spot overlaps the window
    ///
    /// On success the stored booking (with its generated id) is returned.
    /// The spot's administrative status is never touched.
    pub async fn create_booking(
        &self,
        identity: &AuthIdentity,
        spot_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Booking> {
        if start >= end {
            return Err(DomainError::InvalidRange);
        }
        if start < Utc::now() {
            return Err(DomainError::InPast);
        }

        let spot = self
            .repos
            .spots()
            .find_by_id(spot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpot", "id", spot_id))?;
        if !spot.is_bookable() {
            return Err(DomainError::SpotUnavailable);
        }

        // Clone the Arc out of the map entry before awaiting so the shard
        // guard is not held across the await point.
        let lock = self.spot_locks.entry(spot_id).or_default().clone();
        let _guard = lock.lock().await;

        if self
            .repos
            .bookings()
            .find_overlapping(spot_id, start, end)
            .await?
            .is_some()
        {
            metrics::counter!("bookings_rejected_total", "reason" => "conflict").increment(1);
            return Err(DomainError::Conflict);
        }

        let booking = self
            .repos
            .bookings()
            .create(NewBooking {
                user_id: identity.user_id.clone(),
                parking_spot_id: spot_id,
                start_time: start,
                end_time: end,
            })
            .await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = booking.id,
            spot_id,
            user_id = %identity.user_id,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancel (delete) a booking.
    ///
    /// Non-admin callers can only cancel their own bookings, and only before
    /// the booking has started; a booking owned by someone else reports
    /// `NotFound` exactly like a missing one. Admins (with `as_admin`) can
    /// cancel any booking at any time; the admin role is re-verified here
    /// regardless of what the HTTP layer already checked.
    pub async fn cancel_booking(
        &self,
        identity: &AuthIdentity,
        booking_id: i32,
        as_admin: bool,
    ) -> DomainResult<()> {
        if as_admin && !identity.is_admin() {
            return Err(DomainError::Unauthorized(
                "Admin role required to cancel another user's booking".into(),
            ));
        }

        let booking = if as_admin {
            self.repos.bookings().find_by_id(booking_id).await?
        } else {
            self.repos
                .bookings()
                .find_by_id_for_user(booking_id, &identity.user_id)
                .await?
        }
        .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;

        if !as_admin && booking.has_started(Utc::now()) {
            return Err(DomainError::AlreadyStarted);
        }

        let deleted = self.repos.bookings().delete(booking.id).await?;
        if !deleted {
            // Lost a race with another cancellation
            return Err(DomainError::not_found("Booking", "id", booking_id));
        }

        info!(booking_id, as_admin, "booking cancelled");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::identity::Role;
    use crate::domain::lot::NewParkingLot;
    use crate::domain::spot::{NewParkingSpot, Orientation, SpotStatus};
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        service: BookingAdmissionService,
        spot_id: i32,
        maintenance_spot_id: i32,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(MemoryRepositoryProvider::new());
        let lot = repos
            .lots()
            .create(NewParkingLot {
                name: "Main Lot".into(),
                location: None,
                grid_rows: 2,
                grid_cols: 2,
            })
            .await
            .unwrap();
        let spot = repos
            .spots()
            .create(NewParkingSpot {
                spot_number: "A-01".into(),
                parking_lot_id: lot.id,
                grid_row: 0,
                grid_col: 0,
                orientation: Orientation::North,
                status: SpotStatus::Available,
            })
            .await
            .unwrap();
        let maintenance = repos
            .spots()
            .create(NewParkingSpot {
                spot_number: "A-02".into(),
                parking_lot_id: lot.id,
                grid_row: 0,
                grid_col: 1,
                orientation: Orientation::North,
                status: SpotStatus::UnderMaintenance,
            })
            .await
            .unwrap();
        Fixture {
            service: BookingAdmissionService::new(repos.clone()),
            repos,
            spot_id: spot.id,
            maintenance_spot_id: maintenance.id,
        }
    }

    fn alice() -> AuthIdentity {
        AuthIdentity::new("alice", Role::User)
    }

    fn bob() -> AuthIdentity {
        AuthIdentity::new("bob", Role::User)
    }

    fn admin() -> AuthIdentity {
        AuthIdentity::new("root", Role::Admin)
    }

    /// Hours from now, on the hour boundary used throughout these tests
    fn hours(n: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(n)
    }

    #[tokio::test]
    async fn creates_a_valid_booking() {
        let f = fixture().await;
        let booking = f
            .service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        assert!(booking.id > 0);
        assert_eq!(booking.parking_spot_id, f.spot_id);
        assert_eq!(booking.user_id, "alice");
    }

    #[tokio::test]
    async fn empty_range_rejected() {
        let f = fixture().await;
        let t = hours(1);
        let err = f
            .service
            .create_booking(&alice(), f.spot_id, t, t)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange));
    }

    #[tokio::test]
    async fn inverted_range_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .create_booking(&alice(), f.spot_id, hours(2), hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange));
    }

    #[tokio::test]
    async fn start_one_second_in_the_past_rejected() {
        let f = fixture().await;
        let start = Utc::now() - Duration::seconds(1);
        let err = f
            .service
            .create_booking(&alice(), f.spot_id, start, hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InPast));
    }

    #[tokio::test]
    async fn unknown_spot_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .create_booking(&alice(), 9999, hours(1), hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn maintenance_spot_rejected_despite_valid_range() {
        let f = fixture().await;
        let err = f
            .service
            .create_booking(&alice(), f.maintenance_spot_id, hours(1), hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SpotUnavailable));
    }

    #[tokio::test]
    async fn touching_boundary_bookings_both_succeed() {
        let f = fixture().await;
        let base = Utc::now();
        let (t1, t2, t3) = (
            base + Duration::hours(1),
            base + Duration::hours(2),
            base + Duration::hours(3),
        );
        f.service
            .create_booking(&alice(), f.spot_id, t1, t2)
            .await
            .unwrap();
        // [t1,t2) then [t2,t3): boundaries touch exactly, no overlap
        f.service
            .create_booking(&bob(), f.spot_id, t2, t3)
            .await
            .unwrap();
        assert_eq!(f.repos.bookings().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn straddling_booking_rejected_with_conflict() {
        let f = fixture().await;
        f.service
            .create_booking(&alice(), f.spot_id, hours(1), hours(3))
            .await
            .unwrap();
        let err = f
            .service
            .create_booking(&bob(), f.spot_id, hours(2), hours(4))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict));
        assert_eq!(f.repos.bookings().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn same_window_on_other_spot_is_fine() {
        let f = fixture().await;
        let repos = &f.repos;
        let other = repos
            .spots()
            .create(NewParkingSpot {
                spot_number: "B-01".into(),
                parking_lot_id: 1,
                grid_row: 1,
                grid_col: 0,
                orientation: Orientation::North,
                status: SpotStatus::Available,
            })
            .await
            .unwrap();
        f.service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        f.service
            .create_booking(&bob(), other.id, hours(1), hours(2))
            .await
            .unwrap();
        assert_eq!(repos.bookings().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn racing_overlapping_bookings_admit_exactly_one() {
        let f = fixture().await;
        let alice = alice();
        let bob = bob();
        let (a, b) = tokio::join!(
            f.service
                .create_booking(&alice, f.spot_id, hours(1), hours(3)),
            f.service
                .create_booking(&bob, f.spot_id, hours(2), hours(4)),
        );

        let ok = [a.is_ok(), b.is_ok()].iter().filter(|x| **x).count();
        assert_eq!(ok, 1, "exactly one of two racing bookings must commit");
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), DomainError::Conflict));
        assert_eq!(f.repos.bookings().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ledger_never_holds_overlapping_pairs() {
        let f = fixture().await;
        // One clock reading for the whole sequence so boundaries are exact
        let base = Utc::now();
        let at = |n: i64| base + Duration::hours(n);

        // Mixed sequence of creates (some rejected) and cancels
        let b1 = f
            .service
            .create_booking(&alice(), f.spot_id, at(1), at(2))
            .await
            .unwrap();
        let _ = f
            .service
            .create_booking(&bob(), f.spot_id, at(1), at(2))
            .await;
        f.service
            .create_booking(&bob(), f.spot_id, at(3), at(5))
            .await
            .unwrap();
        let _ = f
            .service
            .create_booking(&alice(), f.spot_id, at(4), at(6))
            .await;
        f.service.cancel_booking(&alice(), b1.id, false).await.unwrap();
        f.service
            .create_booking(&bob(), f.spot_id, at(1), at(4))
            .await
            .unwrap_err(); // still clashes with [3h,5h)
        f.service
            .create_booking(&bob(), f.spot_id, at(1), at(3))
            .await
            .unwrap();

        let all = f
            .repos
            .bookings()
            .find_for_user("alice", None)
            .await
            .unwrap()
            .into_iter()
            .chain(f.repos.bookings().find_for_user("bob", None).await.unwrap())
            .map(|r| r.booking)
            .collect::<Vec<_>>();
        for (i, b1) in all.iter().enumerate() {
            for b2 in all.iter().skip(i + 1) {
                assert!(
                    !(b1.parking_spot_id == b2.parking_spot_id
                        && b1.overlaps(b2.start_time, b2.end_time)),
                    "bookings {} and {} overlap",
                    b1.id,
                    b2.id
                );
            }
        }
    }

    #[tokio::test]
    async fn owner_can_cancel_before_start() {
        let f = fixture().await;
        let booking = f
            .service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        f.service
            .cancel_booking(&alice(), booking.id, false)
            .await
            .unwrap();
        assert_eq!(f.repos.bookings().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_owner_cancel_reports_not_found() {
        let f = fixture().await;
        let booking = f
            .service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        // Bob cannot learn whether the booking exists
        let err = f
            .service
            .cancel_booking(&bob(), booking.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(f.repos.bookings().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn started_booking_owner_cancel_rejected_admin_succeeds() {
        let f = fixture().await;
        // Insert directly: admission would (correctly) refuse a past start
        let booking = f
            .repos
            .bookings()
            .create(NewBooking {
                user_id: "alice".into(),
                parking_spot_id: f.spot_id,
                start_time: Utc::now() - Duration::minutes(5),
                end_time: hours(1),
            })
            .await
            .unwrap();

        let err = f
            .service
            .cancel_booking(&alice(), booking.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyStarted));

        f.service
            .cancel_booking(&admin(), booking.id, true)
            .await
            .unwrap();
        assert_eq!(f.repos.bookings().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn double_cancel_reports_not_found_twice() {
        let f = fixture().await;
        let booking = f
            .service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        f.service
            .cancel_booking(&alice(), booking.id, false)
            .await
            .unwrap();
        for _ in 0..2 {
            let err = f
                .service
                .cancel_booking(&alice(), booking.id, false)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
        }
    }

    #[tokio::test]
    async fn non_admin_cannot_use_admin_cancel() {
        let f = fixture().await;
        let booking = f
            .service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        let err = f
            .service
            .cancel_booking(&bob(), booking.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert_eq!(f.repos.bookings().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn booking_does_not_touch_spot_status() {
        let f = fixture().await;
        f.service
            .create_booking(&alice(), f.spot_id, hours(1), hours(2))
            .await
            .unwrap();
        let spot = f.repos.spots().find_by_id(f.spot_id).await.unwrap().unwrap();
        assert_eq!(spot.status, SpotStatus::Available);
    }
}

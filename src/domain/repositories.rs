//! Repository provider: one connection pool, per-aggregate accessors.

use crate::domain::booking::BookingRepository;
use crate::domain::lot::LotRepository;
use crate::domain::spot::SpotRepository;
use crate::domain::user::UserRepository;

/// Unified access to all repositories.
///
/// The application services depend only on this trait; correctness does not
/// depend on which storage engine answers the queries, only on the atomicity
/// guarantees documented on the individual repository traits.
pub trait RepositoryProvider: Send + Sync {
    fn lots(&self) -> &dyn LotRepository;
    fn spots(&self) -> &dyn SpotRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn users(&self) -> &dyn UserRepository;
}

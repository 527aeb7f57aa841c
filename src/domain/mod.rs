//! Domain layer: entities, value types, repository traits and errors.

pub mod booking;
pub mod error;
pub mod identity;
pub mod lot;
pub mod repositories;
pub mod spot;
pub mod user;

pub use booking::{Booking, BookingRecord, BookingWithSpot, NewBooking};
pub use error::{DomainError, DomainResult};
pub use identity::{AuthIdentity, Role};
pub use lot::{NewParkingLot, ParkingLot};
pub use repositories::RepositoryProvider;
pub use spot::{NewParkingSpot, Orientation, ParkingSpot, SpotStatus, SpotUpdate};
pub use user::User;

//! Database entities module

pub mod booking;
pub mod parking_lot;
pub mod parking_spot;
pub mod user;

pub use booking::Entity as Booking;
pub use parking_lot::Entity as ParkingLot;
pub use parking_spot::Entity as ParkingSpot;
pub use user::Entity as User;

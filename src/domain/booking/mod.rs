pub mod model;
pub mod repository;

pub use model::{Booking, BookingRecord, BookingWithSpot, NewBooking};
pub use repository::BookingRepository;

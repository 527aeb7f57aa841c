pub mod model;
pub mod repository;

pub use model::{NewParkingSpot, Orientation, ParkingSpot, SpotStatus, SpotUpdate};
pub use repository::SpotRepository;

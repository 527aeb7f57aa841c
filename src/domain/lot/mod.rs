pub mod model;
pub mod repository;

pub use model::{NewParkingLot, ParkingLot};
pub use repository::LotRepository;

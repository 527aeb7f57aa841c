//! SeaORM repository implementations

pub mod booking_repository;
pub mod lot_repository;
pub mod repository_provider;
pub mod spot_repository;
pub mod user_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use lot_repository::SeaOrmLotRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use spot_repository::SeaOrmSpotRepository;
pub use user_repository::SeaOrmUserRepository;

//! # Aura Parking Service
//!
//! Parking-lot reservation backend: users book spots on a grid for a time
//! window, administrators manage lots and spots and review booking records.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and repository traits
//! - **application**: Booking admission, spot registry and query services
//! - **infrastructure**: External concerns (database, crypto)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;

// Re-export API router
pub use interfaces::http::create_api_router;

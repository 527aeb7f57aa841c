//! Bookings module — create, list and cancel the caller's bookings

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

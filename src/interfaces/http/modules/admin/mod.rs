//! Admin module — overview stats, booking records, lot and spot management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

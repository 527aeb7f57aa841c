//! Dashboard module — lot listing and the user dashboard view

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

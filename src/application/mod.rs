//! Application layer: booking admission, spot registry, queries.

pub mod admission;
pub mod queries;
pub mod spot_admin;

pub use admission::BookingAdmissionService;
pub use queries::{DashboardStats, QueryFacade, UserDashboard};
pub use spot_admin::SpotRegistryService;

//! HTTP routes for Steadfast

pub mod activity;
pub mod assessment;
pub mod auth_routes;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod journal;
pub mod resources;

pub use activity::handle_activity_request;
pub use assessment::handle_assessment_request;
pub use auth_routes::handle_user_request;
pub use dashboard::handle_dashboard_request;
pub use health::{health_check, version_info};
pub use journal::handle_journal_request;
pub use resources::handle_resources_request;

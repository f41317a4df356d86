//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod dashboard;
pub mod domains;
pub mod health;
pub mod links;
pub mod redirect;
pub mod rotation;

pub use auth::{login_handler, profile_handler};
pub use dashboard::dashboard_stats_handler;
pub use domains::{create_domain_handler, domain_list_handler, update_domain_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, link_list_handler, link_logs_handler, update_link_status_handler,
};
pub use redirect::redirect_handler;
pub use rotation::run_rotation_handler;

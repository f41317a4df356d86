//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers, the scheduler and the admin CLI a single API to call.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Password login and JWT sessions
//! - [`services::link_service::LinkService`] - Owner-scoped ad link management
//! - [`services::domain_service::DomainService`] - Landing domain pool management
//! - [`services::domain_selector::DomainSelector`] - Least-used domain choice
//! - [`services::rotation_service::RotationService`] - Rotation batches

pub mod services;

//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; the PostgreSQL implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`AdLinkRepository`] - Ad link CRUD and dashboard counters
//! - [`DomainRepository`] - Landing domain pool
//! - [`RunLogRepository`] - Rotation attempt history
//! - [`UserRepository`] - Accounts, roles, menus
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod ad_link_repository;
pub mod domain_repository;
pub mod run_log_repository;
pub mod user_repository;

pub use ad_link_repository::{AdLinkRepository, LinkStats};
pub use domain_repository::DomainRepository;
pub use run_log_repository::RunLogRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use ad_link_repository::MockAdLinkRepository;
#[cfg(test)]
pub use domain_repository::MockDomainRepository;
#[cfg(test)]
pub use run_log_repository::MockRunLogRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

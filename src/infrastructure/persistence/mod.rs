//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits on top of SQLx.
//! Rows are mapped through private `FromRow` structs; textual status columns
//! are parsed into their enum on the way out.
//!
//! # Repositories
//!
//! - [`PgAdLinkRepository`] - Ad links and dashboard counters
//! - [`PgDomainRepository`] - Landing domain pool and usage accounting
//! - [`PgRunLogRepository`] - Rotation attempt history
//! - [`PgUserRepository`] - Accounts, roles and menus

pub mod pg_ad_link_repository;
pub mod pg_domain_repository;
pub mod pg_run_log_repository;
pub mod pg_user_repository;

pub use pg_ad_link_repository::PgAdLinkRepository;
pub use pg_domain_repository::PgDomainRepository;
pub use pg_run_log_repository::PgRunLogRepository;
pub use pg_user_repository::PgUserRepository;

//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`ads`] - Campaign update clients (Google Ads REST, simulation)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod ads;
pub mod persistence;

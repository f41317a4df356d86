//! Domain layer containing business entities and contracts.
//!
//! Entities, repository interfaces and the campaign update contract live
//! here, independent of PostgreSQL and of the ads platform.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`campaign`] - Tracking template update contract ([`campaign::CampaignUpdater`])
//! - [`rotation_worker`] - Recurring rotation scheduler
//!
//! # Rotation Flow
//!
//! 1. [`rotation_worker::run_rotation_worker`] ticks every configured interval
//! 2. The rotation service loads running links and picks a landing domain per link
//! 3. A [`campaign::CampaignUpdater`] pushes the new tracking URL
//! 4. The outcome is appended via [`repositories::RunLogRepository`]

pub mod campaign;
pub mod entities;
pub mod repositories;
pub mod rotation_worker;

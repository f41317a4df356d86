//! Core domain entities.
//!
//! Plain data structures for the ad-link rotation model. Creation inputs live
//! next to their entity as `New*` structs; partial updates as `Update*`.
//!
//! - [`AdLink`] - an affiliate offer bound to one ads campaign
//! - [`Domain`] - a landing domain in the rotation pool
//! - [`RunLog`] - one rotation attempt for one link
//! - [`User`], [`Role`], [`Menu`] - identity and access

pub mod ad_link;
pub mod domain;
pub mod run_log;
pub mod user;

pub use ad_link::{AdLink, AdLinkFilter, DEFAULT_RUN_FREQUENCY_MINUTES, LinkStatus, NewAdLink};
pub use domain::{Domain, DomainStatus, NewDomain, UpdateDomain};
pub use run_log::{NewRunLog, RunLog, RunStatus};
pub use user::{ADMIN_ROLE, Menu, NewUser, Role, USER_ROLE, User};

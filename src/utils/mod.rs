//! Helpers shared across layers.
//!
//! - [`tracking_url`] - tracking template construction
//! - [`redirect_target`] - redirect `Location` resolution
//! - [`password`] - Argon2id hashing
//! - [`url_check`] - http(s) URL and hostname validation

pub mod password;
pub mod redirect_target;
pub mod tracking_url;
pub mod url_check;

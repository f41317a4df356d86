//! Business logic services for the application layer.

pub mod auth_service;
pub mod domain_selector;
pub mod domain_service;
pub mod link_service;
pub mod rotation_service;

pub use auth_service::{AuthService, Claims, LoginOutcome, UserProfile};
pub use domain_selector::DomainSelector;
pub use domain_service::DomainService;
pub use link_service::LinkService;
pub use rotation_service::{BatchSummary, LinkRotationResult, RotationService, RotationSettings};

//! Core domain logic for the Hartwell form-intake pipeline
//!
//! This crate is dependency-light on purpose: it holds the allow-listed
//! form-type enum and request validation, convention-based contact-field
//! extraction, the per-client rate limiter, and the small text utilities
//! (HTML escaping, key humanization, slug derivation) shared by the email
//! and PDF layers.

pub mod forms;
pub mod rate_limit;
pub mod submission;
pub mod text;

pub use forms::{FormType, NotificationRequest, ValidSubmission, ValidationErrors};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use submission::ContactFields;

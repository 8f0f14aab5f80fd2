//! Core types and error handling for prism.
//!
//! - [`PrismError`] - startup and configuration failures
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI-facing error display
//! - [`PatternKind`] - which configured file set a pattern belongs to

pub mod error;

pub use error::{ErrorContext, PatternKind, PrismError, user_friendly_error};

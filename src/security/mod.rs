//! Security utilities for collector output.
//!
//! This module provides:
//! - Sanitization of context and container names used as path components
//! - Validation of destination paths
//! - Credential scrubbing for messages that end up in logs

pub mod credential_scrubber;
pub mod path_validator;

pub use credential_scrubber::{safe_error_message, scrub_credentials};
pub use path_validator::{sanitize_path_component, validate_destination};

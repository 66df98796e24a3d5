//! Common types and utilities shared across Sightline crates.
//!
//! This crate defines the shared error type and the centralised tracing
//! setup used by the rest of the workspace. It is intentionally lightweight
//! so that every crate can depend on it without pulling in heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`SightlineError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

use serde::{Deserialize, Serialize};

pub mod observability;

/// Error types used across the Sightline system.
///
/// Rendering itself never fails — malformed response data degrades locally
/// rather than propagating — so the variants here describe faults in how
/// the caller set things up, not in the data being rendered.
#[derive(thiserror::Error, Debug)]
pub enum SightlineError {
    /// Configuration was incomplete or invalid (blank field name,
    /// unparseable base URL, empty scheme allow-list, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A declarative search configuration failed shape validation.
    #[error("Invalid search configuration: {0}")]
    Validation(String),

    /// Observability or other setup plumbing failed.
    #[error("Setup error: {0}")]
    Setup(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`SightlineError`].
pub type Result<T> = std::result::Result<T, SightlineError>;

/// Direction of an ordered sort field.
///
/// Shared between the configuration model and anything that wants to echo
/// a sort selection back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

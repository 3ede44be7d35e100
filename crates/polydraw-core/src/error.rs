//! Error types for polydraw

use thiserror::Error;

use crate::models::ShapeKind;

#[derive(Debug, Error)]
pub enum PolydrawError {
    // Drawing errors
    #[error("Shape '{kind}' cannot be drawn here; only polygons are accepted")]
    ShapeNotAllowed { kind: ShapeKind },

    #[error("Invalid polygon at {location}: {reason}")]
    InvalidPolygon { location: String, reason: String },

    // Submission lifecycle errors
    #[error("A polygon submission is already in flight")]
    SubmissionInFlight,

    #[error("No polygon submission is pending")]
    NoSubmissionPending,

    #[error("Widget is closed: the page has navigated to {location}")]
    Closed { location: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, PolydrawError>;

/// Failure of the network round-trip started by a confirm.
///
/// Every variant is shown to the user; none of them navigates away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response was not valid JSON: {0}")]
    InvalidResponse(String),
}

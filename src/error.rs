//! Error taxonomy for the planning client.
//!
//! Each category is recovered at a different boundary:
//! - [`SnapshotError`]: fatal to a snapshot load, nothing is installed
//! - [`ValidationError`]: local precondition failure, never sent to the backend
//! - [`RequestError`]: backend call failure, surfaced in the result panel
//! - [`ResolutionError`]: one unresolvable element, skipped during rendering
//! - [`BoundsError`]: unusable coordinate set, replaced by the default view

use thiserror::Error;

use crate::domain::LocationId;
use crate::view::ViewKind;

/// Substring the backend uses when no route connects two locations.
const NO_PATH_MARKER: &str = "No path found";

/// The city graph payload could not be installed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("snapshot payload is missing `{0}`")]
    MissingField(&'static str),
    #[error("location id {0} appears more than once in the snapshot")]
    DuplicateId(LocationId),
    #[error("snapshot payload could not be decoded: {0}")]
    Decode(String),
    #[error("snapshot request failed: {0}")]
    Request(#[from] RequestError),
}

/// A request was rejected locally before reaching the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select a valid hospital as the destination ({0} is not a medical facility)")]
    NotMedicalDestination(LocationId),
}

/// A backend call failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Connection, DNS or I/O failure.
    #[error("network error: {0}")]
    Transport(String),
    /// Non-2xx status, with the body's `error` message when present.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    /// 2xx body that carries an `error` field.
    #[error("{0}")]
    Backend(String),
    /// Body did not match the expected contract.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Message as the backend phrased it, without transport decoration.
    pub fn message(&self) -> &str {
        match self {
            RequestError::Transport(msg)
            | RequestError::Backend(msg)
            | RequestError::Decode(msg) => msg,
            RequestError::Status { message, .. } => message,
        }
    }

    /// True when the backend reported that no route connects the endpoints.
    ///
    /// ```
    /// use city_planner::error::RequestError;
    ///
    /// let err = RequestError::Status { status: 404, message: "No path found between 1 and F9".into() };
    /// assert!(err.is_no_path());
    /// assert!(!RequestError::Transport("connection refused".into()).is_no_path());
    /// ```
    pub fn is_no_path(&self) -> bool {
        match self {
            RequestError::Status { message, .. } | RequestError::Backend(message) => {
                message.contains(NO_PATH_MARKER)
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

/// An identifier in a result could not be resolved against the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location {0} is not part of the loaded snapshot")]
pub struct ResolutionError(pub LocationId);

/// A coordinate set cannot produce a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("no coordinates to fit")]
    Empty,
    #[error("coordinate set contains a non-finite value")]
    NonFinite,
}

/// A result payload was handed to a view of a different kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{result} result cannot be drawn on the {view} view")]
pub struct MismatchedResult {
    pub view: ViewKind,
    pub result: ViewKind,
}

/// Umbrella error for orchestrated operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("the city snapshot has not been loaded yet")]
    SnapshotNotLoaded,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Render(#[from] MismatchedResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_detected_in_backend_field() {
        let err = RequestError::Backend("No path found".into());
        assert!(err.is_no_path());
        assert_eq!(err.message(), "No path found");
    }

    #[test]
    fn test_decode_error_is_never_no_path() {
        let err = RequestError::Decode("No path found".into());
        assert!(!err.is_no_path());
    }

    #[test]
    fn test_status_display_keeps_backend_message() {
        let err = RequestError::Status {
            status: 400,
            message: "Start and end locations cannot be the same".into(),
        };
        assert_eq!(
            err.to_string(),
            "Start and end locations cannot be the same (HTTP 400)"
        );
    }
}

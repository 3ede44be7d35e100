//! Port trait definitions
//!
//! These traits define the page surroundings the widget talks to. Adapters
//! live in the browser bindings, the CLI, and [`crate::memory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::models::PolygonCoords;

/// Port for blocking user notifications (a browser `alert`)
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Port for page navigation
pub trait Navigator: Send + Sync {
    /// Send the page to `path`
    fn navigate(&self, path: &str);

    /// Path the page currently shows
    fn current_location(&self) -> String;
}

/// JSON body of the polygon submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPayload {
    pub polygon_coords: PolygonCoords,
}

/// One POST the widget wants performed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Endpoint path relative to the page origin
    pub path: String,
    pub payload: PolygonPayload,
}

/// Port for delivering a submission to the backend
#[async_trait]
pub trait PolygonSubmitter: Send + Sync {
    /// POST the payload as JSON and return the parsed JSON response.
    async fn submit(&self, submission: &Submission) -> Result<serde_json::Value, SubmitError>;
}

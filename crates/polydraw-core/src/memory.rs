//! In-memory port implementations for headless drivers and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::ports::{Navigator, Notifier, PolygonSubmitter, Submission};

/// Notifier that records every alert instead of showing it
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<RwLock<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.read().unwrap().clone()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.alerts.read().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "alert");
        self.alerts.write().unwrap().push(message.to_string());
    }
}

/// Navigator that tracks the location history of a simulated page
#[derive(Debug, Clone)]
pub struct RecordingNavigator {
    history: Arc<RwLock<Vec<String>>>,
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::starting_at("/")
    }
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(path: impl Into<String>) -> Self {
        Self { history: Arc::new(RwLock::new(vec![path.into()])) }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.read().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.history.write().unwrap().push(path.to_string());
    }

    fn current_location(&self) -> String {
        self.history.read().unwrap().last().cloned().unwrap_or_default()
    }
}

/// Submitter that answers locally without touching the network
#[derive(Debug, Clone)]
pub struct DryRunSubmitter {
    response: Result<serde_json::Value, SubmitError>,
    submissions: Arc<RwLock<Vec<Submission>>>,
}

impl Default for DryRunSubmitter {
    fn default() -> Self {
        Self::responding(serde_json::json!({}))
    }
}

impl DryRunSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every submission with `response`
    pub fn responding(response: serde_json::Value) -> Self {
        Self { response: Ok(response), submissions: Arc::default() }
    }

    /// Fail every submission with `error`
    pub fn failing(error: SubmitError) -> Self {
        Self { response: Err(error), submissions: Arc::default() }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().unwrap().clone()
    }
}

#[async_trait]
impl PolygonSubmitter for DryRunSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<serde_json::Value, SubmitError> {
        tracing::info!(path = %submission.path, "Dry run: submission not sent");
        self.submissions.write().unwrap().push(submission.clone());
        self.response.clone()
    }
}

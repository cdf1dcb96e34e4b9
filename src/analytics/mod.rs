//! Query analytics, injected into the triage engine.
//!
//! The engine only ever talks to a `QueryRecorder`; it never reads counters
//! back. `InMemoryAnalytics` backs the `/stats` command.

pub mod store;

pub use store::{InMemoryAnalytics, QueryRecord, StatsSnapshot};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::triage::TriageOutcome;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Internal lock failed")]
    LockFailed,
}

/// Who sent a message. Transport-specific identity is reduced to this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Requester {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("kamu")
    }
}

/// Receives one call per completed triage request.
pub trait QueryRecorder: Send + Sync {
    fn record_query(
        &self,
        requester: &Requester,
        raw_query: &str,
        outcome: &TriageOutcome,
    ) -> Result<(), AnalyticsError>;
}

/// Recorder that drops everything.
pub struct NoopRecorder;

impl QueryRecorder for NoopRecorder {
    fn record_query(
        &self,
        _requester: &Requester,
        _raw_query: &str,
        _outcome: &TriageOutcome,
    ) -> Result<(), AnalyticsError> {
        Ok(())
    }
}

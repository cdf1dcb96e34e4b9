use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::triage::normalize::SEGMENT_DELIMITER;
use crate::triage::TriageOutcome;

use super::{AnalyticsError, QueryRecorder, Requester};

/// Summaries longer than this are cut and suffixed with "...".
pub const SUMMARY_MAX_CHARS: usize = 100;

/// Oldest entries are dropped once a user's history reaches this size.
pub const DEFAULT_HISTORY_PER_USER: usize = 50;

/// One past query of a user.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRecord {
    pub id: Uuid,
    pub query: String,
    pub outcome: &'static str,
    pub summary: String,
    pub recorded_at: DateTime<Utc>,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    pub total_queries: u64,
    pub unique_users: usize,
    /// Most reported symptoms, count descending then name ascending.
    pub top_symptoms: Vec<(String, u64)>,
}

#[derive(Default)]
struct AnalyticsState {
    total_queries: u64,
    unique_users: HashSet<u64>,
    popular_symptoms: HashMap<String, u64>,
    history: HashMap<u64, Vec<QueryRecord>>,
}

/// In-memory analytics backed by RwLock. Lost on restart.
pub struct InMemoryAnalytics {
    state: RwLock<AnalyticsState>,
    history_per_user: usize,
}

impl InMemoryAnalytics {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_PER_USER)
    }

    pub fn with_history_limit(history_per_user: usize) -> Self {
        Self {
            state: RwLock::new(AnalyticsState::default()),
            history_per_user,
        }
    }

    /// Counters plus the `top_n` most reported symptoms.
    pub fn stats(&self, top_n: usize) -> Result<StatsSnapshot, AnalyticsError> {
        let state = self.state.read().map_err(|_| AnalyticsError::LockFailed)?;

        let mut top_symptoms: Vec<(String, u64)> = state
            .popular_symptoms
            .iter()
            .map(|(symptom, count)| (symptom.clone(), *count))
            .collect();
        top_symptoms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_symptoms.truncate(top_n);

        Ok(StatsSnapshot {
            total_queries: state.total_queries,
            unique_users: state.unique_users.len(),
            top_symptoms,
        })
    }

    /// Past queries of one user, oldest first.
    pub fn history(&self, user_id: u64) -> Result<Vec<QueryRecord>, AnalyticsError> {
        let state = self.state.read().map_err(|_| AnalyticsError::LockFailed)?;
        Ok(state.history.get(&user_id).cloned().unwrap_or_default())
    }
}

impl Default for InMemoryAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRecorder for InMemoryAnalytics {
    fn record_query(
        &self,
        requester: &Requester,
        raw_query: &str,
        outcome: &TriageOutcome,
    ) -> Result<(), AnalyticsError> {
        let record = QueryRecord {
            id: Uuid::new_v4(),
            query: raw_query.to_string(),
            outcome: outcome.as_str(),
            summary: truncate_summary(&summarize_outcome(outcome)),
            recorded_at: Utc::now(),
        };

        let mut state = self.state.write().map_err(|_| AnalyticsError::LockFailed)?;

        state.total_queries += 1;
        state.unique_users.insert(requester.id);

        for symptom in raw_segments(raw_query) {
            *state.popular_symptoms.entry(symptom).or_insert(0) += 1;
        }

        let history = state.history.entry(requester.id).or_default();
        history.push(record);
        if history.len() > self.history_per_user {
            let excess = history.len() - self.history_per_user;
            history.drain(..excess);
        }

        tracing::info!(
            user_id = requester.id,
            username = requester.username.as_deref().unwrap_or("-"),
            outcome = outcome.as_str(),
            "Query tracked"
        );

        Ok(())
    }
}

/// Popularity counts every non-empty segment the user typed, including ones
/// too short to be scored.
fn raw_segments(raw_query: &str) -> impl Iterator<Item = String> + '_ {
    raw_query
        .split(SEGMENT_DELIMITER)
        .map(|segment| segment.trim().to_lowercase())
        .filter(|segment| !segment.is_empty())
}

/// One-line description of an outcome for the history log.
pub fn summarize_outcome(outcome: &TriageOutcome) -> String {
    match outcome {
        TriageOutcome::NoValidInput => "no valid symptoms".into(),
        TriageOutcome::EmptyKnowledgeBase { .. } => "knowledge base unavailable".into(),
        TriageOutcome::Unrecognized { .. } => "symptoms not recognized".into(),
        TriageOutcome::Ranked { result, .. } => {
            let Some(best) = result.best() else {
                return "symptoms not recognized".into();
            };
            let mut summary = format!("{} ({:.0}%)", best.name, best.confidence);
            if !result.alternates().is_empty() {
                let others: Vec<&str> =
                    result.alternates().iter().map(|c| c.name.as_str()).collect();
                summary.push_str(&format!("; also {}", others.join(", ")));
            }
            summary
        }
    }
}

/// Cut to `SUMMARY_MAX_CHARS` characters, on a char boundary.
pub fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_MAX_CHARS {
        return summary.to_string();
    }
    let cut: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{cut}...")
}

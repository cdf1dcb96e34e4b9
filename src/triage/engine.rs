use std::sync::Arc;
use std::time::Instant;

use crate::analytics::{NoopRecorder, QueryRecorder, Requester};
use crate::knowledge::KnowledgeBase;

use super::normalize::{normalize, Normalized};
use super::ranking::rank;
use super::scoring::score;
use super::types::TriageOutcome;

/// Run one request through normalize → score → rank.
///
/// Pure: no I/O, no shared state. Every terminal state is a `TriageOutcome`
/// variant; nothing here can fail.
pub fn evaluate(raw_text: &str, kb: &KnowledgeBase) -> TriageOutcome {
    let query = match normalize(raw_text) {
        Normalized::Tokens(query) => query,
        Normalized::NoValidSymptoms => return TriageOutcome::NoValidInput,
    };

    if kb.is_empty() {
        return TriageOutcome::EmptyKnowledgeBase { query };
    }

    let candidates = score(&query, kb);
    if candidates.is_empty() {
        return TriageOutcome::Unrecognized { query };
    }

    TriageOutcome::Ranked {
        result: rank(candidates),
        query,
    }
}

/// Triage entry point used by the chat layer.
pub trait TriageEngine: Send + Sync {
    /// Evaluate `raw_text` against `kb` on behalf of `requester`.
    fn triage(&self, requester: &Requester, raw_text: &str, kb: &KnowledgeBase) -> TriageOutcome;
}

/// Default engine: `evaluate` plus a call-out to the injected recorder.
pub struct DefaultTriageEngine {
    recorder: Arc<dyn QueryRecorder>,
}

impl DefaultTriageEngine {
    pub fn new(recorder: Arc<dyn QueryRecorder>) -> Self {
        Self { recorder }
    }
}

impl Default for DefaultTriageEngine {
    fn default() -> Self {
        Self::new(Arc::new(NoopRecorder))
    }
}

impl TriageEngine for DefaultTriageEngine {
    fn triage(&self, requester: &Requester, raw_text: &str, kb: &KnowledgeBase) -> TriageOutcome {
        let start = Instant::now();
        let outcome = evaluate(raw_text, kb);
        let processing_us = start.elapsed().as_micros() as u64;

        tracing::info!(
            user_id = requester.id,
            outcome = outcome.as_str(),
            tokens = outcome.query().map_or(0, |q| q.len()),
            best = outcome.best().map_or("-", |c| c.condition_id.as_str()),
            processing_us,
            "Triage complete"
        );

        // Analytics must never cost the user their answer
        if let Err(e) = self.recorder.record_query(requester, raw_text, &outcome) {
            tracing::warn!(error = %e, "Failed to record query");
        }

        outcome
    }
}

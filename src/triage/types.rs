use serde::Serialize;

use crate::models::enums::{ConfidenceBand, Severity};

// ---------------------------------------------------------------------------
// SymptomQuery
// ---------------------------------------------------------------------------

/// Normalized symptom tokens of one request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomQuery {
    tokens: Vec<String>,
}

impl SymptomQuery {
    /// Returns `None` for an empty token list: there is nothing to score.
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScoredCandidate
// ---------------------------------------------------------------------------

/// One condition that matched at least one token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub condition_id: String,
    pub name: String,
    pub match_count: usize,
    /// Share of the user's tokens this condition explains, 0–100.
    pub confidence: f64,
    /// Share of the condition's vocabulary the tokens explain, 0–100.
    pub coverage: f64,
    pub severity: Severity,
    pub advice: String,
    /// Vocabulary entry each matching token was attributed to, in token order.
    pub matched_symptoms: Vec<String>,
}

impl ScoredCandidate {
    /// Ranking key: mean of confidence and coverage.
    pub fn combined_score(&self) -> f64 {
        (self.confidence + self.coverage) / 2.0
    }
}

// ---------------------------------------------------------------------------
// RankedResult
// ---------------------------------------------------------------------------

/// Band and severity of the best match; drives advisory emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvisoryLevel {
    pub band: ConfidenceBand,
    pub severity: Severity,
}

impl AdvisoryLevel {
    /// Severe conditions always call for prompt medical attention.
    pub fn is_urgent(&self) -> bool {
        self.severity == Severity::Severe
    }

    pub fn needs_attention(&self) -> bool {
        self.severity >= Severity::Moderate
    }
}

/// Candidates ordered best-first. Empty means the symptoms were not recognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub(crate) ordered: Vec<ScoredCandidate>,
}

impl RankedResult {
    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.ordered.first()
    }

    /// Up to two runner-up candidates after `best`.
    pub fn alternates(&self) -> &[ScoredCandidate] {
        let end = self.ordered.len().min(1 + super::ranking::MAX_ALTERNATES);
        self.ordered.get(1..end).unwrap_or(&[])
    }

    pub fn all(&self) -> &[ScoredCandidate] {
        &self.ordered
    }

    pub fn is_unrecognized(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn band(&self) -> Option<ConfidenceBand> {
        self.best()
            .map(|best| ConfidenceBand::from_confidence(best.confidence))
    }

    pub fn advisory(&self) -> Option<AdvisoryLevel> {
        self.best().map(|best| AdvisoryLevel {
            band: ConfidenceBand::from_confidence(best.confidence),
            severity: best.severity,
        })
    }
}

// ---------------------------------------------------------------------------
// TriageOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one triage request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriageOutcome {
    /// Nothing survived normalization; scoring was not attempted.
    NoValidInput,
    /// The knowledge base has no records ("no data", not "no match").
    EmptyKnowledgeBase { query: SymptomQuery },
    /// No condition matched any token.
    Unrecognized { query: SymptomQuery },
    Ranked {
        query: SymptomQuery,
        result: RankedResult,
    },
}

impl TriageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoValidInput => "no_valid_input",
            Self::EmptyKnowledgeBase { .. } => "empty_knowledge_base",
            Self::Unrecognized { .. } => "unrecognized",
            Self::Ranked { .. } => "ranked",
        }
    }

    pub fn query(&self) -> Option<&SymptomQuery> {
        match self {
            Self::NoValidInput => None,
            Self::EmptyKnowledgeBase { query }
            | Self::Unrecognized { query }
            | Self::Ranked { query, .. } => Some(query),
        }
    }

    pub fn best(&self) -> Option<&ScoredCandidate> {
        match self {
            Self::Ranked { result, .. } => result.best(),
            _ => None,
        }
    }
}

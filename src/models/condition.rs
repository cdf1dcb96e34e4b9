use serde::{Deserialize, Serialize};

use super::enums::Severity;
use crate::knowledge::KnowledgeBaseError;

/// One diagnosable condition in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub id: String,
    pub name: String,
    /// Ordered vocabulary. Order decides which entry a token is attributed to.
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub advice: String,
}

impl ConditionRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symptoms: &[&str],
        severity: Severity,
        advice: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            severity,
            advice: advice.into(),
        }
    }

    /// A record must carry an id and at least one non-blank symptom.
    ///
    /// Blank symptoms are rejected because an empty string is a substring of
    /// every token and would match any input.
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        if self.id.trim().is_empty() {
            return Err(KnowledgeBaseError::InvalidRecord {
                id: self.id.clone(),
                reason: "empty id".into(),
            });
        }
        if self.symptoms.is_empty() {
            return Err(KnowledgeBaseError::InvalidRecord {
                id: self.id.clone(),
                reason: "no symptoms".into(),
            });
        }
        if self.symptoms.iter().any(|s| s.trim().is_empty()) {
            return Err(KnowledgeBaseError::InvalidRecord {
                id: self.id.clone(),
                reason: "blank symptom entry".into(),
            });
        }
        Ok(())
    }
}

//! On-disk JSON layout of the knowledge base.
//!
//! ```json
//! { "conditions": { "flu": { "name": "...", "symptoms": ["..."],
//!                            "severity": "mild", "advice": "..." } } }
//! ```
//!
//! Condition keys are the record ids. Key order is preserved in both
//! directions (serde_json `preserve_order`). Files written by the first
//! release of the bot use Indonesian field names; those are accepted on read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::enums::Severity;
use crate::models::ConditionRecord;

use super::{KnowledgeBase, KnowledgeBaseError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCondition {
    #[serde(alias = "nama")]
    name: String,
    #[serde(alias = "gejala")]
    symptoms: Vec<String>,
    #[serde(alias = "tingkat")]
    severity: Severity,
    #[serde(alias = "saran")]
    advice: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct KnowledgeDocument {
    #[serde(alias = "penyakit")]
    conditions: Map<String, Value>,
}

/// Parse a knowledge document. `source` names the origin in error messages.
pub fn parse_document(json: &str, source: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let document: KnowledgeDocument = serde_json::from_str(json)
        .map_err(|e| KnowledgeBaseError::Parse(source.to_string(), e.to_string()))?;

    let mut records = Vec::with_capacity(document.conditions.len());
    for (id, value) in document.conditions {
        let stored: StoredCondition =
            serde_json::from_value(value).map_err(|e| KnowledgeBaseError::InvalidRecord {
                id: id.clone(),
                reason: format!("{source}: {e}"),
            })?;
        records.push(ConditionRecord {
            id,
            name: stored.name,
            symptoms: stored.symptoms,
            severity: stored.severity,
            advice: stored.advice,
        });
    }

    KnowledgeBase::new(records)
}

/// Render a knowledge base as pretty JSON (2-space indent, trailing newline).
/// Output is deterministic, so the default file can be recreated byte-for-byte.
pub fn render_document(kb: &KnowledgeBase) -> Result<String, KnowledgeBaseError> {
    let mut conditions = Map::new();
    for record in kb {
        let stored = StoredCondition {
            name: record.name.clone(),
            symptoms: record.symptoms.clone(),
            severity: record.severity,
            advice: record.advice.clone(),
        };
        let value = serde_json::to_value(stored)
            .map_err(|e| KnowledgeBaseError::Serialization(e.to_string()))?;
        conditions.insert(record.id.clone(), value);
    }

    let mut rendered = serde_json::to_string_pretty(&KnowledgeDocument { conditions })
        .map_err(|e| KnowledgeBaseError::Serialization(e.to_string()))?;
    rendered.push('\n');
    Ok(rendered)
}

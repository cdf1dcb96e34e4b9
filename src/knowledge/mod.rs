//! Condition knowledge base: typed snapshot, on-disk format, built-in
//! defaults, the fallback loader, and the shared handle used for hot reload.

pub mod defaults;
pub mod document;
pub mod loader;
pub mod snapshot;

pub use defaults::default_knowledge_base;
pub use loader::{KnowledgeBaseLoader, LoadOutcome, LoadReport};
pub use snapshot::KnowledgeBaseHandle;

use std::collections::HashSet;

use thiserror::Error;

use crate::models::ConditionRecord;

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base read failed ({0}): {1}")]
    Read(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Invalid condition record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Duplicate condition id: {0}")]
    DuplicateId(String),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Knowledge base write failed ({0}): {1}")]
    Write(String, String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal lock failed")]
    LockFailed,
}

impl KnowledgeBaseError {
    /// True when the file decoded but its content did not validate. Such a
    /// file is still the user's data and must not be replaced.
    pub fn is_invalid_content(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord { .. } | Self::DuplicateId(_) | Self::InvalidEnum { .. }
        )
    }

    /// Id of the offending condition, when the error names one.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::InvalidRecord { id, .. } | Self::DuplicateId(id) => Some(id),
            _ => None,
        }
    }
}

/// Immutable, ordered set of condition records.
///
/// Iteration order is insertion order. Ranking ties are broken by it, so it
/// must never be reshuffled after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    conditions: Vec<ConditionRecord>,
}

impl KnowledgeBase {
    /// Build a knowledge base, validating every record and id uniqueness.
    pub fn new(conditions: Vec<ConditionRecord>) -> Result<Self, KnowledgeBaseError> {
        let mut seen = HashSet::with_capacity(conditions.len());
        for record in &conditions {
            record.validate()?;
            if !seen.insert(record.id.as_str()) {
                return Err(KnowledgeBaseError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { conditions })
    }

    /// Knowledge base with no records. The engine reports "no data" for it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Skip validation for sets that are known-good at compile time.
    pub(crate) fn from_trusted(conditions: Vec<ConditionRecord>) -> Self {
        Self { conditions }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConditionRecord> {
        self.conditions.iter()
    }

    pub fn conditions(&self) -> &[ConditionRecord] {
        &self.conditions
    }

    pub fn get(&self, id: &str) -> Option<&ConditionRecord> {
        self.conditions.iter().find(|c| c.id == id)
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a ConditionRecord;
    type IntoIter = std::slice::Iter<'a, ConditionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

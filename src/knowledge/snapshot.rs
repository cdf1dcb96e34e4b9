use std::sync::{Arc, RwLock};

use super::loader::{KnowledgeBaseLoader, LoadOutcome};
use super::{KnowledgeBase, KnowledgeBaseError};

/// Shared, hot-swappable knowledge base.
///
/// Readers take an `Arc` snapshot and score against it without holding the
/// lock. A reload builds the new base first and only then swaps the pointer,
/// so in-flight requests finish on the version they started with.
pub struct KnowledgeBaseHandle {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl KnowledgeBaseHandle {
    pub fn new(knowledge_base: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(knowledge_base)),
        }
    }

    /// Current version. Cheap: clones the `Arc`, not the records.
    pub fn snapshot(&self) -> Result<Arc<KnowledgeBase>, KnowledgeBaseError> {
        let current = self
            .current
            .read()
            .map_err(|_| KnowledgeBaseError::LockFailed)?;
        Ok(Arc::clone(&current))
    }

    /// Replace the current version.
    pub fn replace(&self, knowledge_base: KnowledgeBase) -> Result<(), KnowledgeBaseError> {
        let next = Arc::new(knowledge_base);
        let mut current = self
            .current
            .write()
            .map_err(|_| KnowledgeBaseError::LockFailed)?;
        *current = next;
        Ok(())
    }

    /// Load through `loader` (blocking I/O, outside the lock) and swap in the result.
    pub fn reload(&self, loader: &KnowledgeBaseLoader) -> Result<LoadOutcome, KnowledgeBaseError> {
        let report = loader.load();
        let conditions = report.knowledge_base.len();
        self.replace(report.knowledge_base)?;

        tracing::debug!(conditions, outcome = ?report.outcome, "Knowledge base swapped");
        Ok(report.outcome)
    }
}

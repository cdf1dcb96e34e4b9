use std::path::{Path, PathBuf};

use serde::Serialize;

use super::defaults::default_knowledge_base;
use super::document::{parse_document, render_document};
use super::{KnowledgeBase, KnowledgeBaseError};

/// How a knowledge base came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Read and validated from the knowledge file.
    Loaded,
    /// File unusable; built-in defaults returned. `persisted` is false when
    /// writing the defaults back is disabled.
    Defaulted { reason: String, persisted: bool },
    /// File unusable and writing the defaults back failed too.
    PersistFailed { reason: String, error: String },
    /// File decoded but a record failed validation. Built-in defaults are
    /// served and the file is left as it is.
    Rejected {
        reason: String,
        record: Option<String>,
    },
}

/// Result of a load: always carries a usable knowledge base.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub knowledge_base: KnowledgeBase,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    pub fn is_default(&self) -> bool {
        !matches!(self.outcome, LoadOutcome::Loaded)
    }
}

/// Reads the condition knowledge base from a JSON file, falling back to the
/// built-in set when the file is missing, unreadable or invalid. Only a missing
/// or undecodable file is ever overwritten.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseLoader {
    path: PathBuf,
    persist_default: bool,
}

impl KnowledgeBaseLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            persist_default: true,
        }
    }

    /// Whether the fallback set is written back to `path`. On by default.
    pub fn with_persist_default(mut self, persist_default: bool) -> Self {
        self.persist_default = persist_default;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the knowledge base. Never fails: every storage problem is folded
    /// into the returned `LoadOutcome`.
    pub fn load(&self) -> LoadReport {
        match self.read() {
            Ok(knowledge_base) => {
                tracing::info!(
                    path = %self.path.display(),
                    conditions = knowledge_base.len(),
                    "Knowledge base loaded"
                );
                LoadReport {
                    knowledge_base,
                    outcome: LoadOutcome::Loaded,
                }
            }
            Err(e) if e.is_invalid_content() => {
                tracing::warn!(
                    path = %self.path.display(),
                    record = e.record_id().unwrap_or("-"),
                    error = %e,
                    "Knowledge base rejected, using built-in defaults without overwriting"
                );
                LoadReport {
                    knowledge_base: default_knowledge_base(),
                    outcome: LoadOutcome::Rejected {
                        reason: e.to_string(),
                        record: e.record_id().map(str::to_string),
                    },
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Knowledge base unavailable, using built-in defaults"
                );
                self.fallback(e.to_string())
            }
        }
    }

    /// Read and validate the file without any fallback.
    pub fn read(&self) -> Result<KnowledgeBase, KnowledgeBaseError> {
        let source = self.path.display().to_string();
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| KnowledgeBaseError::Read(source.clone(), e.to_string()))?;
        parse_document(&json, &source)
    }

    /// Write `kb` to the knowledge file, creating parent directories.
    pub fn persist(&self, kb: &KnowledgeBase) -> Result<(), KnowledgeBaseError> {
        let target = self.path.display().to_string();
        let rendered = render_document(kb)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| KnowledgeBaseError::Write(target.clone(), e.to_string()))?;
        }
        std::fs::write(&self.path, rendered)
            .map_err(|e| KnowledgeBaseError::Write(target, e.to_string()))
    }

    fn fallback(&self, reason: String) -> LoadReport {
        let knowledge_base = default_knowledge_base();

        if !self.persist_default {
            return LoadReport {
                knowledge_base,
                outcome: LoadOutcome::Defaulted {
                    reason,
                    persisted: false,
                },
            };
        }

        let outcome = match self.persist(&knowledge_base) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Default knowledge base saved");
                LoadOutcome::Defaulted {
                    reason,
                    persisted: true,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save default knowledge base");
                LoadOutcome::PersistFailed {
                    reason,
                    error: e.to_string(),
                }
            }
        };

        LoadReport {
            knowledge_base,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_penyakit.json");
        let loader = KnowledgeBaseLoader::new(&path);

        let report = loader.load();
        assert!(matches!(
            report.outcome,
            LoadOutcome::Defaulted { persisted: true, .. }
        ));
        assert_eq!(report.knowledge_base, default_knowledge_base());
        assert!(path.exists());

        // Second load reads the persisted defaults back
        let second = loader.load();
        assert_eq!(second.outcome, LoadOutcome::Loaded);
        assert_eq!(second.knowledge_base, default_knowledge_base());
    }

    #[test]
    fn persisted_default_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        KnowledgeBaseLoader::new(&path).load();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, render_document(&default_knowledge_base()).unwrap());
    }

    #[test]
    fn corrupt_file_falls_back_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let report = KnowledgeBaseLoader::new(&path).load();
        match &report.outcome {
            LoadOutcome::Defaulted { reason, persisted } => {
                assert!(reason.contains("parse"));
                assert!(persisted);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(KnowledgeBaseLoader::new(&path).read().is_ok());
    }

    #[test]
    fn invalid_record_keeps_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let edited = r#"{"penyakit": {
            "migrain": {"nama": "Migrain", "gejala": ["sakit kepala sebelah"],
                        "tingkat": "sedang", "saran": "Istirahat"},
            "tipes": {"nama": "Tifus", "gejala": ["demam", "diare"],
                      "tingkat": "kritis", "saran": "Ke dokter"}
        }}"#;
        std::fs::write(&path, edited).unwrap();

        let report = KnowledgeBaseLoader::new(&path).load();
        match &report.outcome {
            LoadOutcome::Rejected { reason, record } => {
                assert_eq!(record.as_deref(), Some("tipes"));
                assert!(reason.contains("kritis"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.is_default());
        assert_eq!(report.knowledge_base, default_knowledge_base());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), edited);
    }

    #[test]
    fn blank_symptom_keeps_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let edited = r#"{"conditions": {"flu": {"name": "Flu", "symptoms": ["demam", "  "],
            "severity": "mild", "advice": "rest"}}}"#;
        std::fs::write(&path, edited).unwrap();

        let report = KnowledgeBaseLoader::new(&path).load();
        assert!(matches!(
            &report.outcome,
            LoadOutcome::Rejected { record: Some(id), .. } if id == "flu"
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), edited);
    }

    #[test]
    fn persist_disabled_leaves_disk_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");

        let report = KnowledgeBaseLoader::new(&path)
            .with_persist_default(false)
            .load();
        assert!(matches!(
            report.outcome,
            LoadOutcome::Defaulted { persisted: false, .. }
        ));
        assert!(report.is_default());
        assert!(!path.exists());
    }

    #[test]
    fn persist_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // Parent "directory" is a regular file, so neither read nor write can succeed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let path = blocker.join("kb.json");

        let report = KnowledgeBaseLoader::new(&path).load();
        assert!(matches!(report.outcome, LoadOutcome::PersistFailed { .. }));
        assert_eq!(report.knowledge_base, default_knowledge_base());
    }

    #[test]
    fn valid_file_is_loaded_and_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let custom = "{\"conditions\":{\"migrain\":{\"name\":\"Migrain\",\"symptoms\":[\"sakit kepala sebelah\"],\"severity\":\"moderate\",\"advice\":\"Istirahat di ruangan gelap\"}}}";
        std::fs::write(&path, custom).unwrap();

        let report = KnowledgeBaseLoader::new(&path).load();
        assert_eq!(report.outcome, LoadOutcome::Loaded);
        assert!(!report.is_default());
        assert_eq!(report.knowledge_base.len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), custom);
    }

    #[test]
    fn empty_collection_is_a_successful_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, r#"{"conditions": {}}"#).unwrap();

        let report = KnowledgeBaseLoader::new(&path).load();
        assert_eq!(report.outcome, LoadOutcome::Loaded);
        assert!(report.knowledge_base.is_empty());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("kb.json");

        let report = KnowledgeBaseLoader::new(&path).load();
        assert!(matches!(
            report.outcome,
            LoadOutcome::Defaulted { persisted: true, .. }
        ));
        assert!(path.exists());
    }
}

//! Transport-agnostic chat handling: classify an incoming message, route it
//! to a command or to triage, and render the reply.

use std::sync::Arc;

use crate::analytics::{InMemoryAnalytics, Requester};
use crate::config::TriageConfig;
use crate::knowledge::{
    KnowledgeBase, KnowledgeBaseError, KnowledgeBaseHandle, KnowledgeBaseLoader, LoadOutcome,
    LoadReport,
};
use crate::messages::{MessageTemplates, ADMIN_TOP_SYMPTOMS};
use crate::triage::{DefaultTriageEngine, TriageEngine};

const GREETINGS: &[&str] = &["halo", "hai", "hello", "hi", "selamat"];

const THANKS: &[&str] = &["terima kasih", "thanks", "makasih", "thx"];

// ═══════════════════════════════════════════
// Classification
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    List,
    Stats,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageIntent {
    Command(Command),
    Greeting,
    Thanks,
    Symptoms,
}

/// Decide what a message is. Commands first, then small talk, and anything
/// else is treated as a symptom list.
pub fn classify_message(text: &str) -> MessageIntent {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        return MessageIntent::Command(parse_command(rest));
    }

    let lower = trimmed.to_lowercase();
    if has_greeting(&lower) {
        return MessageIntent::Greeting;
    }
    if THANKS.iter().any(|phrase| lower.contains(phrase)) {
        return MessageIntent::Thanks;
    }
    MessageIntent::Symptoms
}

/// Parse `name[@bot] [args]` after the leading slash.
fn parse_command(rest: &str) -> Command {
    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or("").to_lowercase();
    match name.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "daftar" => Command::List,
        "stats" => Command::Stats,
        _ => Command::Unknown(format!("/{name}")),
    }
}

/// Greetings must be whole words, so "hi" does not fire on "hidung tersumbat".
fn has_greeting(lower: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| GREETINGS.contains(&word))
}

// ═══════════════════════════════════════════
// ChatService
// ═══════════════════════════════════════════

/// Everything needed to answer a chat message.
pub struct ChatService {
    knowledge: KnowledgeBaseHandle,
    loader: KnowledgeBaseLoader,
    engine: DefaultTriageEngine,
    analytics: Arc<InMemoryAnalytics>,
    config: TriageConfig,
}

impl ChatService {
    /// Load the knowledge base described by `config` and build the service.
    pub fn start(config: &TriageConfig) -> (Self, LoadReport) {
        let loader = KnowledgeBaseLoader::new(&config.knowledge_base_path)
            .with_persist_default(config.persist_default);
        let report = loader.load();
        let service = Self::with_knowledge_base(report.knowledge_base.clone(), loader, config);
        (service, report)
    }

    /// Build around an already loaded knowledge base.
    pub fn with_knowledge_base(
        knowledge_base: KnowledgeBase,
        loader: KnowledgeBaseLoader,
        config: &TriageConfig,
    ) -> Self {
        let analytics = Arc::new(InMemoryAnalytics::new());
        Self {
            knowledge: KnowledgeBaseHandle::new(knowledge_base),
            loader,
            engine: DefaultTriageEngine::new(analytics.clone()),
            analytics,
            config: config.clone(),
        }
    }

    pub fn analytics(&self) -> &InMemoryAnalytics {
        &self.analytics
    }

    /// Re-read the knowledge file and swap it in for subsequent messages.
    pub fn reload_knowledge(&self) -> Result<LoadOutcome, KnowledgeBaseError> {
        self.knowledge.reload(&self.loader)
    }

    /// Answer one message. Always returns a reply; internal failures become
    /// a generic error message.
    pub fn handle_message(&self, requester: &Requester, text: &str) -> String {
        tracing::info!(user_id = requester.id, "Received message");

        let intent = classify_message(text);
        tracing::debug!(?intent, "Message classified");

        let reply = match intent {
            MessageIntent::Command(command) => self.handle_command(requester, command),
            MessageIntent::Greeting => Ok(MessageTemplates::greeting(requester.display_name())),
            MessageIntent::Thanks => Ok(MessageTemplates::thanks()),
            MessageIntent::Symptoms => self.diagnose(requester, text),
        };

        reply.unwrap_or_else(|e| {
            tracing::error!(user_id = requester.id, error = %e, "Error processing message");
            MessageTemplates::processing_error()
        })
    }

    fn handle_command(
        &self,
        requester: &Requester,
        command: Command,
    ) -> Result<String, ChatError> {
        match command {
            Command::Start => {
                tracing::info!(user_id = requester.id, "User started the bot");
                Ok(MessageTemplates::welcome())
            }
            Command::Help => {
                let kb = self.current_knowledge()?;
                Ok(MessageTemplates::help(&kb))
            }
            Command::List => {
                let kb = self.current_knowledge()?;
                Ok(MessageTemplates::condition_list(&kb))
            }
            Command::Stats => self.stats(requester),
            Command::Unknown(name) => Ok(MessageTemplates::unknown_command(&name)),
        }
    }

    fn stats(&self, requester: &Requester) -> Result<String, ChatError> {
        let stats = self.analytics.stats(ADMIN_TOP_SYMPTOMS)?;
        if self.config.is_admin(requester.id) {
            Ok(MessageTemplates::stats_admin(&stats))
        } else {
            let conditions = self.current_knowledge()?.len();
            Ok(MessageTemplates::stats_public(&stats, conditions, requester.id))
        }
    }

    fn diagnose(&self, requester: &Requester, text: &str) -> Result<String, ChatError> {
        let kb = self.current_knowledge()?;
        let outcome = self.engine.triage(requester, text, &kb);
        Ok(MessageTemplates::outcome(&outcome))
    }

    fn current_knowledge(&self) -> Result<Arc<KnowledgeBase>, KnowledgeBaseError> {
        if self.config.reload_per_query {
            self.knowledge.reload(&self.loader)?;
        }
        self.knowledge.snapshot()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeBaseError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] crate::analytics::AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_knowledge_base;

    fn config(dir: &tempfile::TempDir) -> TriageConfig {
        TriageConfig {
            knowledge_base_path: dir.path().join("kb.json"),
            persist_default: true,
            admin_ids: vec![1],
            reload_per_query: false,
        }
    }

    #[test]
    fn classifies_commands() {
        assert_eq!(classify_message("/start"), MessageIntent::Command(Command::Start));
        assert_eq!(classify_message(" /HELP "), MessageIntent::Command(Command::Help));
        assert_eq!(
            classify_message("/daftar@DiagnosaBot"),
            MessageIntent::Command(Command::List)
        );
        assert_eq!(classify_message("/stats now"), MessageIntent::Command(Command::Stats));
        assert_eq!(
            classify_message("/obat"),
            MessageIntent::Command(Command::Unknown("/obat".into()))
        );
    }

    #[test]
    fn classifies_small_talk() {
        assert_eq!(classify_message("Halo bot!"), MessageIntent::Greeting);
        assert_eq!(classify_message("selamat pagi"), MessageIntent::Greeting);
        assert_eq!(classify_message("Terima kasih ya"), MessageIntent::Thanks);
        assert_eq!(classify_message("thx"), MessageIntent::Thanks);
    }

    #[test]
    fn greeting_needs_a_whole_word() {
        assert_eq!(classify_message("hidung tersumbat, bersin"), MessageIntent::Symptoms);
        assert_eq!(classify_message("demam, batuk"), MessageIntent::Symptoms);
    }

    #[test]
    fn start_loads_and_persists_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let (_service, report) = ChatService::start(&config);
        assert!(matches!(report.outcome, LoadOutcome::Defaulted { persisted: true, .. }));
        assert!(config.knowledge_base_path.exists());
    }

    #[test]
    fn symptom_message_gets_diagnosis_and_is_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = ChatService::start(&config(&dir));
        let user = Requester::new(5).with_username("sari");

        let reply = service.handle_message(&user, "demam, batuk, pilek");
        assert!(reply.contains("Kemungkinan besar: Influenza"));

        let stats = service.analytics().stats(5).unwrap();
        assert_eq!(stats.total_queries, 1);
        assert_eq!(stats.unique_users, 1);
    }

    #[test]
    fn small_talk_is_not_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = ChatService::start(&config(&dir));
        let user = Requester::new(5).with_first_name("Sari");

        assert!(service.handle_message(&user, "hai").starts_with("Halo Sari!"));
        assert!(service.handle_message(&user, "makasih").starts_with("Sama-sama!"));
        assert_eq!(service.analytics().stats(5).unwrap().total_queries, 0);
    }

    #[test]
    fn stats_detail_depends_on_admin() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = ChatService::start(&config(&dir));
        service.handle_message(&Requester::new(2), "mual, kembung");

        let admin = service.handle_message(&Requester::new(1), "/stats");
        assert!(admin.contains("STATISTIK BOT (ADMIN)"));
        assert!(admin.contains("• kembung: 1x"));

        let public = service.handle_message(&Requester::new(2), "/stats");
        assert!(public.contains("4 penyakit tersedia"));
        assert!(public.contains("`2`"));
    }

    #[test]
    fn list_and_help_use_loaded_knowledge() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = ChatService::start(&config(&dir));
        let user = Requester::new(3);
        assert!(service.handle_message(&user, "/daftar").contains("Total: 4 penyakit"));
        assert!(service.handle_message(&user, "/help").contains("Influenza:"));
        assert!(service.handle_message(&user, "/start").contains("Selamat datang"));
        assert!(service.handle_message(&user, "/foo").contains("`/foo`"));
    }

    #[test]
    fn reload_picks_up_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let (service, _) = ChatService::start(&config);
        std::fs::write(
            &config.knowledge_base_path,
            r#"{"conditions": {"migrain": {"name": "Migrain", "symptoms": ["sakit kepala sebelah"],
                "severity": "moderate", "advice": "Istirahat"}}}"#,
        )
        .unwrap();

        // Startup snapshot still answers until reload
        let user = Requester::new(4);
        assert!(service.handle_message(&user, "batuk").contains("Influenza"));

        assert_eq!(service.reload_knowledge().unwrap(), LoadOutcome::Loaded);
        assert_eq!(service.handle_message(&user, "batuk"), MessageTemplates::unrecognized());
        assert!(service.handle_message(&user, "sakit kepala sebelah").contains("Migrain"));
    }

    #[test]
    fn reload_per_query_sees_changes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir);
        config.reload_per_query = true;
        let (service, _) = ChatService::start(&config);

        std::fs::write(&config.knowledge_base_path, r#"{"conditions": {}}"#).unwrap();
        let reply = service.handle_message(&Requester::new(4), "demam");
        assert_eq!(reply, MessageTemplates::knowledge_base_unavailable());
    }

    #[test]
    fn noise_input_gets_guidance() {
        let dir = tempfile::tempdir().unwrap();
        let loader = KnowledgeBaseLoader::new(dir.path().join("kb.json"));
        let service =
            ChatService::with_knowledge_base(default_knowledge_base(), loader, &config(&dir));
        let reply = service.handle_message(&Requester::new(4), " , ,a");
        assert_eq!(reply, MessageTemplates::no_valid_input());
    }
}

pub mod analytics;
pub mod chat;
pub mod config;
pub mod knowledge;
pub mod messages;
pub mod models;
pub mod triage;

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::analytics::Requester;
use crate::chat::ChatService;
use crate::config::{ConfigError, TriageConfig};

/// Id used for the single local user of the console front-end.
pub const CONSOLE_USER_ID: u64 = 0;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global subscriber. RUST_LOG wins over the built-in filter.
/// Calling this twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Console front-end: one reply per stdin line until EOF or ctrl-c.
pub async fn run() -> Result<(), AppError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = TriageConfig::from_env()?;
    let (service, report) = ChatService::start(&config);
    tracing::info!(
        path = %config.knowledge_base_path.display(),
        conditions = report.knowledge_base.len(),
        outcome = ?report.outcome,
        "Knowledge base ready"
    );
    let service = Arc::new(service);

    let requester = match std::env::var("USER") {
        Ok(name) if !name.is_empty() => Requester::new(CONSOLE_USER_ID).with_first_name(name),
        _ => Requester::new(CONSOLE_USER_ID),
    };

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}\n\n", messages::MessageTemplates::welcome()).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                // Per-query reload touches the filesystem
                let worker = Arc::clone(&service);
                let who = requester.clone();
                let reply = tokio::task::spawn_blocking(move || worker.handle_message(&who, &line))
                    .await
                    .unwrap_or_else(|e| {
                        // Debug builds only; the release profile aborts on panic
                        tracing::error!(error = %e, "Message handler panicked");
                        messages::MessageTemplates::processing_error()
                    });

                stdout.write_all(format!("{reply}\n\n").as_bytes()).await?;
                stdout.flush().await?;
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

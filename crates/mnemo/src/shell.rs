// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo shell` command implementation.
//!
//! Wires the configured storage backend, vector index, embedder, and
//! provider into a [`Handler`], then runs a readline REPL against it.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

use mnemo_agent::{ChatEvent, Handler};
use mnemo_config::model::MnemoConfig;
use mnemo_core::{CompletionProvider, EmbeddingAdapter, MnemoError, SessionStore};
use mnemo_memory::{HashEmbedder, MemoryCoordinator, VectorIndex};
use mnemo_openrouter::OpenRouterClient;
use mnemo_scraper::Scraper;
use mnemo_storage::{MemoryStore, SqliteStore};

/// The single local user of the interactive shell.
const SHELL_USER_ID: &str = "shell";

/// Runs the `mnemo shell` interactive REPL.
pub async fn run_shell(config: MnemoConfig) -> Result<(), MnemoError> {
    // The backend is chosen by configuration alone; a connection
    // failure surfaces as an error instead of a silent fallback.
    let store: Arc<dyn SessionStore> = match config.storage.backend.as_str() {
        "sqlite" => Arc::new(SqliteStore::new(config.storage.clone())),
        "memory" => Arc::new(MemoryStore::new()),
        other => {
            return Err(MnemoError::Config(format!(
                "unsupported storage backend `{other}`"
            )));
        }
    };
    store.initialize().await?;
    info!(backend = %config.storage.backend, "session store ready");

    let client = Arc::new(OpenRouterClient::new(&config.openrouter)?);
    let llm: Arc<dyn CompletionProvider> = client.clone();
    let embedder: Arc<dyn EmbeddingAdapter> = match config.memory.embedding.as_str() {
        "hash" => Arc::new(HashEmbedder::new()),
        _ => client,
    };

    let index = if config.storage.backend == "memory" {
        VectorIndex::open_in_memory().await?
    } else {
        VectorIndex::open(&config.storage.vector_path, config.storage.wal_mode).await?
    };
    let index = Arc::new(index);
    info!(chunks = index.count().await?, "vector index ready");

    let memory = Arc::new(MemoryCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&index),
        embedder,
        &config.memory,
    ));

    let scraper = if config.scraper.enabled {
        Some(Scraper::new(&config.scraper)?)
    } else {
        None
    };

    let handler = Handler::new(&config, Arc::clone(&store), memory, llm, scraper);

    let mut rl = DefaultEditor::new()
        .map_err(|e| MnemoError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.agent.name).bold().green());
    println!(
        "Type {} for commands, {} to exit.\n",
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let event = ChatEvent {
                    user_id: SHELL_USER_ID.to_string(),
                    text: trimmed.to_string(),
                };
                for segment in handler.handle_event(&event).await {
                    println!("{segment}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    // Flush both databases before exit.
    if let Err(e) = index.close().await {
        warn!(error = %e, "vector index close failed");
    }
    store.close().await?;

    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_config::model::OpenRouterConfig;
    use mnemo_core::PluginAdapter;

    #[test]
    fn one_client_serves_both_provider_roles() {
        let mut config = OpenRouterConfig::default();
        config.api_key = Some("sk-or-v1-test".to_string());
        let client = Arc::new(OpenRouterClient::new(&config).unwrap());

        let llm: Arc<dyn CompletionProvider> = client.clone();
        let embedder: Arc<dyn EmbeddingAdapter> = client;
        assert_eq!(llm.name(), embedder.name());
    }
}

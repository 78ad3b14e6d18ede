// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat event handler: routes commands, runs the memory-augmented
//! completion pipeline, and splits replies for the transport.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use mnemo_config::model::MnemoConfig;
use mnemo_context::optimize_context;
use mnemo_core::{CompletionProvider, CompletionRequest, MnemoError, Role, SessionStore};
use mnemo_memory::MemoryCoordinator;
use mnemo_scraper::Scraper;

use crate::command::{parse, Command};
use crate::personality::persona_preamble;
use crate::prompts::{build_chat_prompt, build_teaching_prompt};

/// Hard upper bound on a single outgoing reply, in characters.
pub const MAX_REPLY_CHARS: usize = 4000;

const APOLOGY: &str = "Sorry, something went wrong on my side. Please try again.";

const HELP_TEXT: &str = "Commands:\n\
    /learn <name> <text or URL> - save content as a named memory\n\
    learn <text or URL> - save content under a generated name\n\
    /recall <name> - have me teach a saved memory back to you\n\
    /forget <name> - delete a saved memory\n\
    /sessions - list your saved memories\n\
    /clear - clear the current conversation\n\
    /help - show this message\n\
    Anything else is conversation.";

/// One inbound chat message.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub user_id: String,
    pub text: String,
}

/// Routes inbound chat events to commands or the completion pipeline.
pub struct Handler {
    store: Arc<dyn SessionStore>,
    memory: Arc<MemoryCoordinator>,
    llm: Arc<dyn CompletionProvider>,
    scraper: Option<Scraper>,
    preamble: String,
    assistant_name: String,
    short_term_limit: usize,
    working_memory_tokens: usize,
}

impl Handler {
    pub fn new(
        config: &MnemoConfig,
        store: Arc<dyn SessionStore>,
        memory: Arc<MemoryCoordinator>,
        llm: Arc<dyn CompletionProvider>,
        scraper: Option<Scraper>,
    ) -> Self {
        Self {
            store,
            memory,
            llm,
            scraper,
            preamble: persona_preamble(&config.personality),
            assistant_name: config.personality.name.clone(),
            short_term_limit: config.memory.short_term_limit,
            working_memory_tokens: config.memory.working_memory_tokens,
        }
    }

    /// Handles one inbound event and returns the outgoing reply,
    /// pre-split into transport-sized segments.
    ///
    /// Never fails: pipeline errors are logged and surfaced to the user
    /// as a short apology.
    pub async fn handle_event(&self, event: &ChatEvent) -> Vec<String> {
        let reply = match self.dispatch(event).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id = %event.user_id, error = %e, "event handling failed");
                APOLOGY.to_string()
            }
        };
        split_reply(&reply, MAX_REPLY_CHARS)
    }

    async fn dispatch(&self, event: &ChatEvent) -> Result<String, MnemoError> {
        let user_id = event.user_id.as_str();
        match parse(&event.text) {
            Command::Start => {
                self.store.get_or_create_user(user_id).await?;
                Ok(format!(
                    "Hi! I'm {}. Teach me things and I'll remember them.\n\n{HELP_TEXT}",
                    self.assistant_name
                ))
            }
            Command::Help => Ok(HELP_TEXT.to_string()),
            Command::Learn { name, content } => self.learn(user_id, name, content).await,
            Command::LearnInline { content } => {
                let name = format!("note-{}", &Uuid::new_v4().to_string()[..8]);
                self.learn(user_id, &name, content).await
            }
            Command::Recall { name } => self.recall(user_id, name).await,
            Command::Forget { name } => {
                self.store.get_or_create_user(user_id).await?;
                match self.memory.delete_memory(user_id, name).await? {
                    Some(forgotten) => Ok(format!("Forgotten \"{forgotten}\".")),
                    None => Ok(format!("I don't have a memory named \"{name}\".")),
                }
            }
            Command::Sessions => self.sessions(user_id).await,
            Command::Clear => {
                self.store.get_or_create_user(user_id).await?;
                self.store.clear_conversation_history(user_id).await?;
                Ok("Conversation cleared. Your learned memories are untouched.".to_string())
            }
            Command::Unknown { command } => Ok(format!(
                "I don't understand `/{command}` (or it's missing arguments). \
                 Type /help to see what I can do."
            )),
            Command::Chat { text } => self.chat(user_id, text).await,
        }
    }

    async fn learn(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
    ) -> Result<String, MnemoError> {
        self.store.get_or_create_user(user_id).await?;

        let (body, source) = if looks_like_url(content) {
            let Some(scraper) = &self.scraper else {
                return Ok(
                    "Learning from URLs is disabled. Enable the scraper in the configuration, \
                     or paste the text directly."
                        .to_string(),
                );
            };
            (scraper.fetch_text(content).await?, Some(content))
        } else {
            (content.to_string(), None)
        };

        let name_in_use = self
            .store
            .get_learning_session_by_name(user_id, name)
            .await?
            .is_some();

        let session_id = self
            .memory
            .create_memory(user_id, name, &body, None, source)
            .await?;
        debug!(user_id, session_id = %session_id, "learning session created");

        let mut reply = match source {
            Some(url) => format!("Learned \"{name}\" from {url}."),
            None => format!("Learned \"{name}\"."),
        };
        if name_in_use {
            reply.push_str(&format!(
                " Note: you already had a memory named \"{name}\"; both are kept."
            ));
        }
        reply.push_str(&format!(" Recall it with /recall {name}."));
        Ok(reply)
    }

    /// `/recall <name>`: fetch the named learning session and have the
    /// model teach its content back.
    async fn recall(&self, user_id: &str, name: &str) -> Result<String, MnemoError> {
        self.store.get_or_create_user(user_id).await?;
        let Some(session) = self.store.get_learning_session_by_name(user_id, name).await? else {
            return Ok(format!("I don't have a memory named \"{name}\"."));
        };

        let prompt = build_teaching_prompt(&self.preamble, &session.content);
        let explanation = self.llm.complete(CompletionRequest::new(prompt)).await?;
        Ok(format!("[{name}]\n\n{explanation}"))
    }

    async fn sessions(&self, user_id: &str) -> Result<String, MnemoError> {
        self.store.get_or_create_user(user_id).await?;
        let summaries = self.store.list_learning_sessions(user_id).await?;
        if summaries.is_empty() {
            return Ok(
                "You haven't taught me anything yet. Use /learn <name> <text or URL>.".to_string(),
            );
        }

        let mut reply = String::from("Your learning sessions:\n");
        for summary in &summaries {
            if summary.description.is_empty() {
                reply.push_str(&format!("- {}\n", summary.name));
            } else {
                reply.push_str(&format!("- {}: {}\n", summary.name, summary.description));
            }
        }
        Ok(reply.trim_end().to_string())
    }

    async fn chat(&self, user_id: &str, text: &str) -> Result<String, MnemoError> {
        self.store.get_or_create_user(user_id).await?;
        self.store
            .add_message_to_history(user_id, Role::User, text)
            .await?;

        let history = self
            .store
            .get_conversation_history(user_id, self.short_term_limit)
            .await?;
        let window = optimize_context(&history, self.working_memory_tokens);
        let memories = self.memory.get_relevant_memories(user_id, text).await?;

        let prompt = build_chat_prompt(&self.preamble, &memories, &window);
        let reply = self.llm.complete(CompletionRequest::new(prompt)).await?;

        self.store
            .add_message_to_history(user_id, Role::Assistant, &reply)
            .await?;
        Ok(reply)
    }
}

fn looks_like_url(content: &str) -> bool {
    (content.starts_with("http://") || content.starts_with("https://"))
        && !content.contains(char::is_whitespace)
}

/// Splits `text` into segments of at most `max_chars` characters,
/// never cutting inside a character.
pub fn split_reply(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        if count == max_chars {
            segments.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() || segments.is_empty() {
        segments.push(current);
    }
    segments
}

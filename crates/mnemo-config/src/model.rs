// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Placeholder API key value shipped in the sample config. Treated as
/// "not configured" by validation so a copied sample cannot silently
/// send the placeholder to the API.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENROUTER_API_KEY";

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory subsystem settings (chunking, retrieval, context budget).
    #[serde(default)]
    pub memory: MemoryConfig,

    /// OpenRouter API settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Web scraper settings.
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Assistant personality settings.
    #[serde(default)]
    pub personality: PersonalityConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "mnemo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
///
/// The backend is selected here, explicitly. A misconfigured or
/// unreachable SQLite file is a startup error, never a silent switch
/// to the in-memory backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage backend: `sqlite` or `memory`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Path to the SQLite session database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path to the SQLite vector index file.
    #[serde(default = "default_vector_path")]
    pub vector_path: String,

    /// Enable WAL journal mode for better concurrent access.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_path: default_database_path(),
            vector_path: default_vector_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_database_path() -> String {
    "mnemo.db".to_string()
}

fn default_vector_path() -> String {
    "mnemo-vectors.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Memory subsystem configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Number of recent messages fetched as short-term memory.
    #[serde(default = "default_short_term_limit")]
    pub short_term_limit: usize,

    /// Token budget for the conversation context window.
    #[serde(default = "default_working_memory_tokens")]
    pub working_memory_tokens: usize,

    /// Maximum chunk size in characters for learned content.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Number of memory chunks retrieved per semantic query.
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,

    /// Embedding backend: `openrouter` or `hash`.
    #[serde(default = "default_embedding")]
    pub embedding: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_limit: default_short_term_limit(),
            working_memory_tokens: default_working_memory_tokens(),
            max_chunk_size: default_max_chunk_size(),
            retrieval_limit: default_retrieval_limit(),
            embedding: default_embedding(),
        }
    }
}

fn default_short_term_limit() -> usize {
    10
}

fn default_working_memory_tokens() -> usize {
    2000
}

fn default_max_chunk_size() -> usize {
    500
}

fn default_retrieval_limit() -> usize {
    3
}

fn default_embedding() -> String {
    "openrouter".to_string()
}

/// OpenRouter API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterConfig {
    /// OpenRouter API key. The placeholder value from the sample config
    /// is rejected at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model for completion requests.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Fallback model tried once when the default model is rate limited.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for completions.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout for completion calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Model used for embedding generation.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Per-request timeout for embedding calls, in seconds.
    #[serde(default = "default_embedding_timeout_secs")]
    pub embedding_timeout_secs: u64,

    /// Value sent in the `HTTP-Referer` attribution header.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value sent in the `X-Title` attribution header.
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            fallback_model: default_fallback_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            embedding_model: default_embedding_model(),
            embedding_timeout_secs: default_embedding_timeout_secs(),
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

fn default_fallback_model() -> String {
    "meta-llama/llama-3.3-70b-instruct:free".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f64 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_embedding_model() -> String {
    "openai/text-embedding-3-small".to_string()
}

fn default_embedding_timeout_secs() -> u64 {
    15
}

fn default_referer() -> String {
    "https://github.com/mnemo-ai/mnemo".to_string()
}

fn default_app_title() -> String {
    "Mnemo".to_string()
}

/// Web scraper configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScraperConfig {
    /// Enable URL learning via the web scraper.
    #[serde(default = "default_scraper_enabled")]
    pub enabled: bool,

    /// Per-fetch timeout, in seconds.
    #[serde(default = "default_scraper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            enabled: default_scraper_enabled(),
            timeout_secs: default_scraper_timeout_secs(),
        }
    }
}

fn default_scraper_enabled() -> bool {
    true
}

fn default_scraper_timeout_secs() -> u64 {
    10
}

/// Assistant personality configuration, folded into the system prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalityConfig {
    /// Name the assistant refers to itself by.
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Short persona description.
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Conversational tone, e.g. `friendly`, `formal`.
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Emoji usage: `none`, `light`, or `heavy`.
    #[serde(default = "default_emoji_level")]
    pub emoji_level: String,

    /// Response length preference: `concise` or `detailed`.
    #[serde(default = "default_verbosity")]
    pub verbosity: String,
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            persona: default_persona(),
            tone: default_tone(),
            emoji_level: default_emoji_level(),
            verbosity: default_verbosity(),
        }
    }
}

fn default_persona_name() -> String {
    "Mnemo".to_string()
}

fn default_persona() -> String {
    "a helpful personal assistant with long-term memory".to_string()
}

fn default_tone() -> String {
    "friendly".to_string()
}

fn default_emoji_level() -> String {
    "light".to_string()
}

fn default_verbosity() -> String {
    "concise".to_string()
}

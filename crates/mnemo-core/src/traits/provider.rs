// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM completion backends.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;

/// A single-prompt completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The fully assembled prompt text.
    pub prompt: String,
    /// Model override; `None` uses the provider's configured default.
    pub model: Option<String>,
    /// Sampling temperature override; `None` uses the provider default.
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// A request with default model and temperature.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            temperature: None,
        }
    }
}

/// Adapter for LLM completion backends.
///
/// Implementations own retry, timeout, and model-fallback policy; callers
/// see a single fallible call.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Sends a completion request and returns the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, MnemoError>;
}

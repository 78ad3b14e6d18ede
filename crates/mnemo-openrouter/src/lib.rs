// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter provider adapter for Mnemo.
//!
//! Wraps [`OpenRouterClient`] behind the [`CompletionProvider`] and
//! [`EmbeddingAdapter`] traits, so the agent and the memory coordinator
//! share one configured client.

pub mod client;
pub mod types;

pub use client::OpenRouterClient;

use async_trait::async_trait;

use mnemo_core::{
    AdapterType, CompletionProvider, CompletionRequest, EmbeddingAdapter, HealthStatus,
    MnemoError, PluginAdapter,
};

#[async_trait]
impl PluginAdapter for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        // No cheap unauthenticated ping exists; a constructed client
        // with valid headers is considered healthy.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, MnemoError> {
        self.complete_text(
            &request.prompt,
            request.model.as_deref(),
            request.temperature,
        )
        .await
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenRouterClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        self.embed_text(text).await
    }
}

// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles the completion prompt from persona, retrieved memories,
//! and the optimized conversation window.

use mnemo_core::{ChatMessage, MemoryHit};

/// Builds the full prompt sent to the completion provider.
///
/// The conversation window already ends with the user's latest message,
/// so the prompt closes with a bare `assistant:` cue.
pub fn build_chat_prompt(
    preamble: &str,
    memories: &[MemoryHit],
    window: &[ChatMessage],
) -> String {
    let mut prompt = String::from(preamble);
    prompt.push('\n');

    if !memories.is_empty() {
        prompt.push_str("\nRelevant things you have learned:\n");
        for hit in memories {
            prompt.push_str(&format!("[{}] {}\n", hit.session_name, hit.content));
        }
    }

    prompt.push_str("\nConversation:\n");
    for message in window {
        prompt.push_str(&format!("{}: {}\n", message.role.as_str(), message.content));
    }
    prompt.push_str("assistant:");
    prompt
}

/// Builds the prompt for teaching back a recalled learning session.
pub fn build_teaching_prompt(preamble: &str, content: &str) -> String {
    format!(
        "{preamble}\n\nExplain the following information clearly, as a friendly \
         teacher would. Use examples where they help and organize the \
         explanation well:\n\n{content}"
    )
}

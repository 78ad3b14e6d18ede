// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token-budgeted context window assembly.
//!
//! Conversation history can outgrow the prompt budget, so the window is
//! trimmed to a chronological suffix: messages are taken newest-first
//! until the budget would overflow, then re-ordered oldest-first. A
//! window that already fits passes through unchanged.

use tracing::debug;

use mnemo_core::ChatMessage;

/// Estimate the token cost of one message as rendered into the prompt.
///
/// Uses the rough 4-characters-per-token heuristic over the rendered
/// `role: content` line. Counting is cheap and stable; accuracy within
/// a few percent is all the trimmer needs.
pub fn estimate_tokens(message: &ChatMessage) -> usize {
    let rendered_len = message.role.as_str().len() + 2 + message.content.len();
    rendered_len.div_ceil(4)
}

/// Trim `messages` (chronological order) to a suffix fitting within
/// `token_budget`.
///
/// Walks newest to oldest, accepting messages while the running total
/// stays within budget, and stops at the first message that would
/// overflow. The result preserves chronological order. A single message
/// larger than the whole budget yields an empty window.
pub fn optimize_context(messages: &[ChatMessage], token_budget: usize) -> Vec<ChatMessage> {
    let mut total = 0usize;
    let mut kept = Vec::new();

    for message in messages.iter().rev() {
        let cost = estimate_tokens(message);
        if total + cost > token_budget {
            break;
        }
        total += cost;
        kept.push(message.clone());
    }

    kept.reverse();
    if kept.len() < messages.len() {
        debug!(
            kept = kept.len(),
            dropped = messages.len() - kept.len(),
            tokens = total,
            "context window trimmed"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::Role;

    fn msg(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            id: String::new(),
            session_id: "s1".to_string(),
            role,
            content: content.to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn estimate_counts_rendered_line() {
        // "user: hi" is 8 chars -> 2 tokens.
        assert_eq!(estimate_tokens(&msg(Role::User, "hi")), 2);
        // "assistant: " is 11 chars + 9 content = 20 -> 5 tokens.
        assert_eq!(estimate_tokens(&msg(Role::Assistant, "nine char")), 5);
    }

    #[test]
    fn window_that_fits_is_unchanged() {
        let messages = vec![msg(Role::User, "hello"), msg(Role::Assistant, "hi there")];
        let result = optimize_context(&messages, 1000);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "hello");
        assert_eq!(result[1].content, "hi there");
    }

    #[test]
    fn overflow_drops_oldest_first() {
        let messages = vec![
            msg(Role::User, "oldest message with plenty of characters"),
            msg(Role::Assistant, "middle"),
            msg(Role::User, "newest"),
        ];
        // Budget enough for the two short messages only.
        let budget = estimate_tokens(&messages[1]) + estimate_tokens(&messages[2]);
        let result = optimize_context(&messages, budget);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "middle");
        assert_eq!(result[1].content, "newest");
    }

    #[test]
    fn trimming_stops_at_first_overflow() {
        // A huge message in the middle blocks everything older than it,
        // even if older messages are tiny.
        let messages = vec![
            msg(Role::User, "a"),
            msg(Role::User, &"x".repeat(4000)),
            msg(Role::User, "b"),
        ];
        let result = optimize_context(&messages, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "b");
    }

    #[test]
    fn oversized_single_message_yields_empty_window() {
        let messages = vec![msg(Role::User, &"x".repeat(400))];
        let result = optimize_context(&messages, 10);
        assert!(result.is_empty());
    }

    #[test]
    fn empty_history_is_empty() {
        assert!(optimize_context(&[], 100).is_empty());
    }

    #[test]
    fn optimize_is_idempotent() {
        let messages: Vec<ChatMessage> = (0..20)
            .map(|i| msg(Role::User, &format!("message number {i} with some padding")))
            .collect();
        let once = optimize_context(&messages, 50);
        let twice = optimize_context(&once, 50);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.content, b.content);
        }
    }
}

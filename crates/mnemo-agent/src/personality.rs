// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders the configured personality into a system-prompt preamble.

use mnemo_config::model::PersonalityConfig;

/// Builds the persona section of the system prompt.
///
/// Unrecognized `emoji_level` or `verbosity` values fall back to the
/// neutral phrasing rather than failing; validation of those fields is a
/// configuration concern, not a prompt concern.
pub fn persona_preamble(personality: &PersonalityConfig) -> String {
    let mut preamble = format!(
        "You are {}, {}. Your tone is {}.",
        personality.name, personality.persona, personality.tone
    );

    match personality.emoji_level.as_str() {
        "none" => preamble.push_str(" Do not use emoji."),
        "heavy" => preamble.push_str(" Use emoji generously."),
        _ => preamble.push_str(" Use emoji sparingly."),
    }

    match personality.verbosity.as_str() {
        "detailed" => preamble.push_str(" Give thorough, detailed answers."),
        _ => preamble.push_str(" Keep answers concise."),
    }

    preamble
}

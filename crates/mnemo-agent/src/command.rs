// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of slash commands and the inline `learn` utterance.

/// A parsed user utterance.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Help,
    /// `/learn <name> <text or URL>`.
    Learn { name: &'a str, content: &'a str },
    /// `learn <text or URL>` without a name; one is generated.
    LearnInline { content: &'a str },
    /// `/recall <name>`.
    Recall { name: &'a str },
    /// `/forget <name>`.
    Forget { name: &'a str },
    Sessions,
    Clear,
    /// An unrecognized slash command.
    Unknown { command: &'a str },
    /// Plain conversation.
    Chat { text: &'a str },
}

/// Parse one line of user input.
///
/// Slash commands are matched on the first whitespace-delimited token.
/// `learn ...` without a slash is the inline learning shorthand; any
/// other non-slash input is conversation.
pub fn parse(input: &str) -> Command<'_> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix('/') {
        let (command, args) = match rest.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (rest, ""),
        };
        return match command {
            "start" => Command::Start,
            "help" => Command::Help,
            "learn" => match args.split_once(char::is_whitespace) {
                Some((name, content)) if !content.trim().is_empty() => Command::Learn {
                    name,
                    content: content.trim(),
                },
                _ => Command::Unknown { command: "learn" },
            },
            // Session names are single tokens; trailing words are ignored.
            "recall" => match args.split_whitespace().next() {
                Some(name) => Command::Recall { name },
                None => Command::Unknown { command: "recall" },
            },
            "forget" => match args.split_whitespace().next() {
                Some(name) => Command::Forget { name },
                None => Command::Unknown { command: "forget" },
            },
            "sessions" => Command::Sessions,
            "clear" => Command::Clear,
            other => Command::Unknown { command: other },
        };
    }

    if let Some(content) = input.strip_prefix("learn ") {
        let content = content.trim();
        if !content.is_empty() {
            return Command::LearnInline { content };
        }
    }

    Command::Chat { text: input }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse("/start"), Command::Start);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/sessions"), Command::Sessions);
        assert_eq!(parse("/clear"), Command::Clear);
    }

    #[test]
    fn learn_needs_name_and_content() {
        assert_eq!(
            parse("/learn rust_tips ownership moves values"),
            Command::Learn {
                name: "rust_tips",
                content: "ownership moves values"
            }
        );
        assert_eq!(parse("/learn rust_tips"), Command::Unknown { command: "learn" });
        assert_eq!(parse("/learn"), Command::Unknown { command: "learn" });
    }

    #[test]
    fn learn_accepts_url_content() {
        assert_eq!(
            parse("/learn docs https://example.com/page"),
            Command::Learn {
                name: "docs",
                content: "https://example.com/page"
            }
        );
    }

    #[test]
    fn recall_and_forget_need_a_name() {
        assert_eq!(
            parse("/recall python_basics"),
            Command::Recall {
                name: "python_basics"
            }
        );
        assert_eq!(
            parse("/recall python_basics extra words"),
            Command::Recall {
                name: "python_basics"
            }
        );
        assert_eq!(parse("/recall"), Command::Unknown { command: "recall" });
        assert_eq!(parse("/forget rust_tips"), Command::Forget { name: "rust_tips" });
        assert_eq!(parse("/forget"), Command::Unknown { command: "forget" });
    }

    #[test]
    fn inline_learn_is_recognized() {
        assert_eq!(
            parse("learn the capital of France is Paris"),
            Command::LearnInline {
                content: "the capital of France is Paris"
            }
        );
        // Bare "learn" with nothing to learn is conversation.
        assert_eq!(parse("learn"), Command::Chat { text: "learn" });
    }

    #[test]
    fn unknown_slash_command() {
        assert_eq!(parse("/frobnicate"), Command::Unknown { command: "frobnicate" });
    }

    #[test]
    fn everything_else_is_chat() {
        assert_eq!(parse("hello there"), Command::Chat { text: "hello there" });
        assert_eq!(
            parse("I'd like to learn more"),
            Command::Chat {
                text: "I'd like to learn more"
            }
        );
    }
}

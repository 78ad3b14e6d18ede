// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering for configuration failures.
//!
//! Figment reports deserialization problems as a flat error chain; this
//! module turns each one into a miette diagnostic the shell can print:
//! unknown keys get a source span into the offending mnemo.toml plus a
//! "did you mean" suggestion, validation failures get plain messages.

#![allow(unused_assignments)] // triggered by miette's Diagnostic derive

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a typo suggestion. High enough
/// that `emoji_lvl` suggests `emoji_level` but `telegram` suggests
/// nothing.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, rendered through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key `deny_unknown_fields` refused.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(mnemo::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one is close enough.
        suggestion: Option<String>,
        /// Comma-joined valid keys of the section, for the help text.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type, e.g. a quoted number where a
    /// boolean belongs.
    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(code(mnemo::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A key serde requires but the merged config lacks.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(mnemo::config::missing_key),
        help("add `{key} = <value>` to mnemo.toml or set the matching MNEMO_* variable")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated after deserialization.
    #[error("{message}")]
    #[diagnostic(code(mnemo::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(mnemo::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a figment error chain into one diagnostic per problem.
///
/// `toml_sources` holds the `(path, content)` of every TOML file that was
/// merged, so unknown-key errors can point at the exact line that named
/// the bad key.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let locator = SourceLocator { toml_sources };

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let (span, src) = locator
                    .locate(&error, field)
                    .map_or((None, None), |(sp, ns)| (Some(sp), Some(ns)));
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Resolves a figment error back to a span in one of the merged TOML
/// sources.
struct SourceLocator<'a> {
    toml_sources: &'a [(String, String)],
}

impl SourceLocator<'_> {
    fn locate(
        &self,
        error: &figment::error::Error,
        field: &str,
    ) -> Option<(SourceSpan, NamedSource<String>)> {
        let path = error
            .metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| match s {
                figment::Source::File(p) => Some(p.display().to_string()),
                _ => None,
            })?;
        let (name, content) = self
            .toml_sources
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(p, c)| (p.as_str(), c.as_str()))?;

        let section = error.path.first().map(String::as_str);
        let offset = key_offset(content, section, field)?;
        Some((
            SourceSpan::new(offset.into(), field.len()),
            NamedSource::new(name, content.to_string()),
        ))
    }
}

/// Byte offset of `field` within `section` (or at top level when
/// `section` is `None`).
///
/// Scans line by line, tracking which `[section]` header is currently
/// open, so a key name repeated across sections resolves to the right
/// occurrence.
pub fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current_section: Option<&str> = None;
    let mut line_start = 0usize;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            current_section = Some(header.trim());
        } else if current_section == section {
            if let Some(rest) = trimmed.strip_prefix(field) {
                let rest = rest.trim_start();
                if rest.starts_with('=') {
                    return Some(line_start + (line.len() - trimmed.len()));
                }
            }
        }
        line_start += line.len() + 1;
    }
    None
}

/// Closest valid key to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every diagnostic to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        if handler.render_report(&mut out, error as &dyn Diagnostic).is_ok() {
            eprint!("{out}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

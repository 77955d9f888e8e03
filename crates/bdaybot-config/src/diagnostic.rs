// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for `bdaybot.toml` load failures.
//!
//! A misspelled key is pointed at in the file it came from and gets a
//! Jaro-Winkler "did you mean" hint drawn from the keys of its section.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity a known key must reach to be offered as the correction.
const MIN_SIMILARITY: f64 = 0.8;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", section_label(.section))]
    #[diagnostic(
        code(bdaybot::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), known_keys))
    )]
    UnknownKey {
        /// Table the key was found in; empty at the top level.
        section: String,
        key: String,
        suggestion: Option<String>,
        known_keys: &'static [&'static str],
        #[label("unknown key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid value for `{key}`: {detail}")]
    #[diagnostic(code(bdaybot::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// A value parsed but breaks a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(bdaybot::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(bdaybot::config::other))]
    Other(String),
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, known_keys: &[&str]) -> String {
    let known = known_keys.join(", ");
    match suggestion {
        Some(key) => format!("did you mean `{key}`? known keys: {known}"),
        None => format!("known keys: {known}"),
    }
}

/// Converts every error carried by `err` into a diagnostic.
///
/// `sources` pairs each TOML file name with its content so unknown keys can
/// be underlined where they were written.
pub fn from_figment(err: figment::Error, sources: &[(String, String)]) -> Vec<ConfigError> {
    err.into_iter().map(|error| convert(&error, sources)).collect()
}

fn convert(error: &figment::Error, sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(key, known_keys) => {
            let section = error.path.first().cloned().unwrap_or_default();
            let located = source_for(error, sources).and_then(|(name, content)| {
                let span = locate_key(content, &section, key)?;
                Some((span, NamedSource::new(name, content.clone())))
            });
            let (span, src) = located.unzip();

            ConfigError::UnknownKey {
                suggestion: closest_key(key, known_keys),
                section,
                key: key.clone(),
                known_keys: *known_keys,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: error.path.join("."),
            detail: format!("found {actual}, expected {expected}"),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Picks the TOML source an error was read from.
///
/// Errors without a file origin are matched to the only source, if there is
/// exactly one.
fn source_for<'a>(
    error: &figment::Error,
    sources: &'a [(String, String)],
) -> Option<&'a (String, String)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    match (file, sources) {
        (Some(file), _) => sources.iter().find(|(name, _)| *name == file),
        (None, [only]) => Some(only),
        (None, _) => None,
    }
}

/// Span of `key` where it is assigned inside `[section]`, or before any
/// table header when `section` is empty.
fn locate_key(content: &str, section: &str, key: &str) -> Option<SourceSpan> {
    let mut current = "";
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current = header.trim();
        } else if current == section
            && let Some((name, _)) = trimmed.split_once('=')
            && name.trim() == key
        {
            let indent = line.len() - line.trim_start().len();
            return Some(SourceSpan::new((offset + indent).into(), key.len()));
        }
        offset += line.len();
    }

    None
}

/// The known key most similar to `key`, if any is close enough.
fn closest_key(key: &str, known_keys: &[&str]) -> Option<String> {
    known_keys
        .iter()
        .map(|known| (strsim::jaro_winkler(key, known), *known))
        .filter(|(score, _)| *score >= MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, known)| known.to_string())
}

/// Prints each error to stderr with miette's graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

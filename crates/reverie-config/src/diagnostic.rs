// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich config diagnostics on top of figment errors.
//!
//! Every figment extraction failure is lowered into a [`ConfigError`],
//! a miette diagnostic that can point at the offending line of the TOML
//! source and propose a correction for misspelled keys.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler floor below which no correction is proposed. At 0.75,
/// `cache_uri` still maps to `cache_url` while unrelated strings stay
/// suggestion-free.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, rendered through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key figment's deserializer did not recognize.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(reverie::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if one scored above the threshold.
        suggestion: Option<String>,
        /// Comma-joined listing of the keys the section accepts.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(reverie::config::invalid_type),
        help("expected {expected}")
    )]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the schema requires but the sources never provided.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(reverie::config::missing_key),
        help("add `{key} = <value>` to your reverie.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed fine but failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(reverie::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(reverie::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Lower a `figment::Error` (which bundles one entry per failure) into
/// `ConfigError` diagnostics, attaching spans and suggestions where the
/// TOML sources allow it.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|entry| lower_figment_entry(entry, toml_sources))
        .collect()
}

fn lower_figment_entry(
    entry: figment::error::Error,
    toml_sources: &[(String, String)],
) -> ConfigError {
    use figment::error::Kind;

    match &entry.kind {
        Kind::UnknownField(field, accepted) => {
            let accepted: Vec<&str> = accepted.to_vec();
            let (span, src) = locate_in_sources(&entry, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &accepted),
                valid_keys: accepted.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: dotted_path(&entry),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
            span: None,
            src: None,
        },
        _ => ConfigError::Other(entry.to_string()),
    }
}

fn dotted_path(entry: &figment::error::Error) -> String {
    entry
        .path
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolve an error entry back to a span in one of the loaded TOML
/// files. Both halves are `None` when the entry came from a non-file
/// provider (env vars) or the key cannot be located in the text.
fn locate_in_sources(
    entry: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(file) = entry.metadata.as_ref().and_then(|m| m.source.as_ref()) else {
        return (None, None);
    };
    let figment::Source::File(path) = file else {
        return (None, None);
    };
    let path = path.display().to_string();

    let Some((_, content)) = toml_sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };

    let sections: Vec<String> = entry.path.iter().map(|s| s.to_string()).collect();
    match find_key_offset(content, &sections, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` within `content`, scanning after the `[section]`
/// header named by the first element of `path` (or from the top for
/// top-level keys). The field must open a line and be followed by `=`
/// or whitespace so substrings inside values do not match.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let body_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut line_start = body_start;
    for line in content[body_start..].split_inclusive('\n') {
        let key = line.trim_start();
        if let Some(rest) = key.strip_prefix(field)
            && rest.starts_with([' ', '\t', '='])
        {
            return Some(line_start + (line.len() - key.len()));
        }
        line_start += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, or `None` when nothing
/// clears [`SUGGESTION_THRESHOLD`].
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each diagnostic to stderr with miette's graphical handler,
/// falling back to plain `Display` if rendering fails.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

//! Chatmate metadata header: schema, parser and whole-file validation.
//!
//! A chatmate starts with a header block between two `---` marker lines,
//! one `key: value` pair per line, followed by the instruction body:
//!
//! ```text
//! ---
//! description: 'Review changes before they are merged.'
//! author: 'someone'
//! tools: ['codebase', 'search']
//! ---
//!
//! # Code Reviewer
//! ...
//! ```
use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::artifact::display_name;
use crate::error::{ChatmateError, HeaderError, SecurityError};
use crate::security::{self, SecurityPolicy};

/// Line that opens and closes the header block.
pub const HEADER_MARKER: &str = "---";

/// Minimum number of characters in the trimmed body.
pub const MIN_BODY_CHARS: usize = 50;

/// Parsed header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactHeader {
    /// One-line summary shown by the host editor.
    pub description: String,
    /// Who wrote the chatmate.
    pub author: String,
    /// Tools the chat mode may use.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Preferred model, if pinned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Any other keys, kept verbatim.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Parse the header of a chatmate and return it with the body that follows.
///
/// # Errors
///
/// Returns a [`HeaderError`] when the markers are missing, a header line is
/// malformed, a key repeats, or `description`/`author` is missing or empty.
pub fn parse_header(content: &[u8]) -> Result<(ArtifactHeader, &str), HeaderError> {
    let text = std::str::from_utf8(content).map_err(|_| HeaderError::NotUtf8)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (first, mut rest) = split_line(text);
    if first != HEADER_MARKER {
        return Err(HeaderError::MissingOpeningMarker);
    }

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut line_no = 1;
    loop {
        if rest.is_empty() {
            return Err(HeaderError::MissingClosingMarker);
        }
        let (line, remainder) = split_line(rest);
        rest = remainder;
        line_no += 1;

        if line == HEADER_MARKER {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (key, value) = parse_field(trimmed).ok_or_else(|| HeaderError::MalformedLine {
            line: line_no,
            content: line.to_string(),
        })?;
        if fields.insert(key.to_string(), value.to_string()).is_some() {
            return Err(HeaderError::DuplicateKey(key.to_string()));
        }
    }

    let header = ArtifactHeader {
        description: required(&mut fields, "description")?,
        author: required(&mut fields, "author")?,
        tools: fields
            .remove("tools")
            .map(|v| parse_list(&v))
            .unwrap_or_default(),
        model: fields.remove("model").filter(|v| !v.is_empty()),
        extra: fields,
    };
    Ok((header, rest))
}

/// Summary of a chatmate file that passed [`validate_artifact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedArtifact {
    /// Display name derived from the filename.
    pub name: String,
    /// Parsed header.
    pub header: ArtifactHeader,
    /// File size in bytes.
    pub size: usize,
    /// Characters in the trimmed body.
    pub body_chars: usize,
}

/// Validate a chatmate file on disk: filename, extension, size, header
/// schema and body length.
///
/// # Errors
///
/// Returns the first [`SecurityError`] or [`HeaderError`] found, or
/// [`ChatmateError::Io`] if the file cannot be read.
pub fn validate_artifact(
    path: &Path,
    policy: &SecurityPolicy,
) -> Result<ValidatedArtifact, ChatmateError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SecurityError::InvalidName {
            name: path.display().to_string(),
            reason: "not a valid UTF-8 filename".to_string(),
        })?;
    security::validate_name(filename)?;
    security::validate_extension(filename, policy.allowed_extensions())?;

    let content = std::fs::read(path).map_err(|e| ChatmateError::io(path, e))?;
    security::validate_content(&content, policy.max_content_bytes())?;

    let (header, body) = parse_header(&content)?;
    let body_chars = body.trim().chars().count();
    if body_chars < MIN_BODY_CHARS {
        return Err(HeaderError::BodyTooShort {
            len: body_chars,
            min: MIN_BODY_CHARS,
        }
        .into());
    }

    let name = display_name(filename, policy.suffix()).unwrap_or(filename);
    Ok(ValidatedArtifact {
        name: name.to_string(),
        header,
        size: content.len(),
        body_chars,
    })
}

/// Split off the first line, dropping the terminator (`\n` or `\r\n`).
fn split_line(text: &str) -> (&str, &str) {
    let (line, rest) = text.split_once('\n').unwrap_or((text, ""));
    (line.strip_suffix('\r').unwrap_or(line), rest)
}

/// Split `key: value`, validating the key and unquoting the value.
fn parse_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then(|| (key, unquote(value.trim())))
}

/// Strip one pair of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parse `[a, 'b', "c"]` or a bare comma-separated list.
fn parse_list(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);
    inner
        .split(',')
        .map(|item| unquote(item.trim()).trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn required(
    fields: &mut BTreeMap<String, String>,
    key: &'static str,
) -> Result<String, HeaderError> {
    fields
        .remove(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(HeaderError::MissingField(key))
}

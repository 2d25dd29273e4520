//! Tolerant JSON parsing for hand-edited pack files.
//!
//! Skin packs in the wild often contain `//` and `/* */` comments, trailing
//! commas, or a UTF-8 byte-order mark. [`parse`] tries strict JSON first and
//! only falls back to [`clean`] when that fails, so well-formed files are
//! never rewritten.

use serde_json::Value;
use thiserror::Error;

/// A document that stayed invalid after cleaning.
#[derive(Debug, Error)]
#[error("invalid JSON: {source}")]
pub struct JsoncError {
    #[from]
    source: serde_json::Error,
}

impl JsoncError {
    /// 1-based line of the parse failure in the cleaned text.
    #[must_use]
    pub fn line(&self) -> usize {
        self.source.line()
    }
}

/// Parse `text`, tolerating comments, trailing commas and a leading BOM.
///
/// # Errors
/// Returns [`JsoncError`] if the text is not valid JSON even after cleaning.
pub fn parse(text: &str) -> Result<Value, JsoncError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_json::from_str(&clean(text))?),
    }
}

/// Remove comments and trailing commas outside of string literals.
///
/// Comment bodies are replaced by nothing, but newlines inside block
/// comments are kept so line numbers in later parse errors still match.
#[must_use]
pub fn clean(text: &str) -> String {
    let without_comments = strip_comments(text);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    // Byte offset in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(at) = pending_comma.take() {
                    out.remove(at);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            '"' => {
                pending_comma = None;
                in_string = true;
                out.push(c);
            }
            _ => {
                pending_comma = None;
                out.push(c);
            }
        }
    }
    out
}

#![forbid(unsafe_code)]

//! Game-script encoded strings.
//!
//! A script hands the engine a string id and its parameters packed into a
//! single text value:
//!
//! ```text
//! \u{E000}<hex id>[:<param>]*
//! ```
//!
//! A parameter is a hex integer, a quoted `"text"` (with `\"` and `\\`
//! escapes), or `\u{E000}<hex id>` naming another script string. Ids are
//! indices into the game-script table and must be below the table size.
//! Quoted text is decoded to an inert [`Parameter::Text`]; it is never
//! parsed as a template.

use lingo_core::string_id::TAB_SIZE;
use lingo_core::{ControlCode, DEFAULT_CAPACITY, Parameter, ParameterStack, StringId};

const MARKER: char = ControlCode::Encoded.to_char();

/// A decoded script string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedString {
    pub id: StringId,
    pub params: ParameterStack,
}

/// Why an encoded string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodedError {
    #[error("malformed encoded string")]
    Malformed,
    #[error("encoded string id {0:#X} is out of range")]
    InvalidStringId(u64),
    #[error("encoded sub-string id {0:#X} is out of range")]
    InvalidSubStringId(u64),
}

impl EncodedError {
    /// Text rendered in place of the string.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Malformed => "(invalid SCC_ENCODED)",
            Self::InvalidStringId(_) => "(invalid StringID)",
            Self::InvalidSubStringId(_) => "(invalid sub-StringID)",
        }
    }
}

/// Whether `text` carries an encoded string.
#[must_use]
pub fn is_encoded(text: &str) -> bool {
    text.starts_with(MARKER)
}

/// Decode an encoded string, marker included.
///
/// # Errors
///
/// [`EncodedError`] when the text is not a well-formed encoded string or
/// names an id outside the script table.
pub fn decode(text: &str) -> Result<EncodedString, EncodedError> {
    let body = text.strip_prefix(MARKER).ok_or(EncodedError::Malformed)?;
    let (head, rest) = match body.find(':') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let index = parse_hex(head).ok_or(EncodedError::Malformed)?;
    let id = script_id(index).ok_or(EncodedError::InvalidStringId(index))?;

    let mut params = ParameterStack::new(DEFAULT_CAPACITY);
    if let Some(rest) = rest {
        for (slot, raw) in split_params(rest).into_iter().take(DEFAULT_CAPACITY).enumerate() {
            params.set(slot, decode_param(raw)?);
        }
    }
    Ok(EncodedString { id, params })
}

fn decode_param(raw: &str) -> Result<Parameter, EncodedError> {
    if let Some(quoted) = raw.strip_prefix('"') {
        let inner = quoted.strip_suffix('"').ok_or(EncodedError::Malformed)?;
        return Ok(Parameter::Text(unescape(inner)));
    }
    if let Some(sub) = raw.strip_prefix(MARKER) {
        let index = parse_hex(sub).ok_or(EncodedError::Malformed)?;
        let id = script_id(index).ok_or(EncodedError::InvalidSubStringId(index))?;
        return Ok(Parameter::StringRef(id));
    }
    parse_hex(raw)
        .map(Parameter::Unsigned)
        .ok_or(EncodedError::Malformed)
}

fn script_id(index: u64) -> Option<StringId> {
    let index = u16::try_from(index).ok().filter(|&i| usize::from(i) < TAB_SIZE)?;
    Some(StringId::game_script(index))
}

fn parse_hex(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

/// Split on `:` outside quotes.
fn split_params(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// A parameter of an encoded string under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedParam {
    Integer(u64),
    Text(String),
    /// Index of another script string.
    SubString(u16),
}

/// Build an encoded string for script string `index`.
#[must_use]
pub fn encode(index: u16, params: &[EncodedParam]) -> String {
    let mut out = String::new();
    out.push(MARKER);
    out.push_str(&format!("{index:X}"));
    for param in params {
        out.push(':');
        match param {
            EncodedParam::Integer(v) => out.push_str(&format!("{v:X}")),
            EncodedParam::Text(text) => {
                out.push('"');
                for c in text.chars() {
                    if matches!(c, '"' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
            }
            EncodedParam::SubString(sub) => {
                out.push(MARKER);
                out.push_str(&format!("{sub:X}"));
            }
        }
    }
    out
}

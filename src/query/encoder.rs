//! Query encoding
//!
//! A raw search term is turned into the four representations that dork
//! templates can reference. All of them are derived from the trimmed input.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use std::sync::LazyLock;

/// Characters left unescaped by URI-component encoding.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// The encoded variants of one search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQuery {
    /// The trimmed input, unencoded
    pub raw: String,
    /// Whitespace removed: `john doe` -> `johndoe`
    pub nospace: String,
    /// Whitespace runs joined with `+`: `john doe` -> `john+doe`
    pub plus: String,
    /// Quoted, then component-encoded: `john doe` -> `%22john%20doe%22`
    pub quoted: String,
    /// Component-encoded: `john doe` -> `john%20doe`
    pub encoded: String,
}

impl EncodedQuery {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();

        let nospace = WHITESPACE.replace_all(raw, "").into_owned();
        let plus = WHITESPACE
            .split(raw)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join("+");
        let quoted = encode_component(&format!("\"{}\"", raw));
        let encoded = encode_component(raw);

        Self {
            raw: raw.to_string(),
            nospace,
            plus,
            quoted,
            encoded,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Percent-encode a string as a URI component.
///
/// Unreserved marks (`-_.!~*'()`) and ASCII alphanumerics pass through,
/// everything else is emitted as uppercase `%XX` per UTF-8 byte.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

//! Legacy `.properties` documents.
//!
//! Custom sky definitions are written in the line-oriented properties
//! format. [`PropertiesDocument::parse`] understands the parts of that
//! format packs actually use:
//!
//! - `#` and `!` comment lines and blank lines;
//! - `key=value`, `key:value` and `key value` separators, with whitespace
//!   around the separator ignored;
//! - a trailing backslash continuing the entry on the next line (leading
//!   whitespace of the continuation is dropped);
//! - the escapes `\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\x` for any other
//!   character `x`.
//!
//! Entries keep the order in which their key first appeared. A repeated key
//! replaces the earlier value in place.
//!
//! # Example
//!
//! ```
//! use skypatch_pack::properties::PropertiesDocument;
//!
//! let doc = PropertiesDocument::parse(b"# sunset\nstartFadeIn=17:00\nweather = clear rain\n").unwrap();
//! assert_eq!(doc.len(), 2);
//! assert_eq!(doc.get("weather"), Some("clear rain"));
//! ```

use std::borrow::Cow;

use crate::PropertiesError;

// ---------------------------------------------------------------------------
// PropertiesDocument
// ---------------------------------------------------------------------------

/// An ordered mapping of string keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesDocument {
    entries: Vec<(String, String)>,
}

impl PropertiesDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from raw bytes.
    ///
    /// The bytes are decoded as UTF-8 when valid and as ISO-8859-1
    /// otherwise, so parsing never fails on encoding alone.
    pub fn parse(bytes: &[u8]) -> Result<Self, PropertiesError> {
        Self::parse_str(&decode_text(bytes))
    }

    /// Parse a document from text.
    pub fn parse_str(text: &str) -> Result<Self, PropertiesError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut doc = Self::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim_start_matches(is_blank);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let line_number = index + 1;
            let mut logical = line.to_owned();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let key = unescape(key, line_number)?;
            let value = unescape(value, line_number)?;
            doc.insert(key, value);
        }

        Ok(doc)
    }

    /// Insert an entry. An existing key keeps its position and takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertiesDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let (key, rest) = line.split_at(key_end);
    let rest = rest.trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    (key, rest.trim_start_matches(is_blank))
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: the low half must follow as another escape.
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(PropertiesError::MalformedUnicode { line });
                    }
                    let low = read_code_unit(&mut chars, line)?;
                    char::decode_utf16([unit, low]).next().and_then(Result::ok)
                } else {
                    char::from_u32(u32::from(unit))
                };
                out.push(decoded.ok_or(PropertiesError::MalformedUnicode { line })?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16, PropertiesError> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err(PropertiesError::MalformedUnicode { line });
    }
    u16::from_str_radix(&digits, 16).map_err(|_| PropertiesError::MalformedUnicode { line })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

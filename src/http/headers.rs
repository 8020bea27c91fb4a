// Header block parsing and case-insensitive storage
use std::collections::HashMap;

use super::{find_crlf, CRLF};
use crate::error::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Headers { map: HashMap::new() }
    }

    /// Parse at most one header line from the front of `d`.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// terminates the header block was reached. Nothing is consumed until a
    /// full CRLF-terminated line is available; the caller keeps the rest.
    pub fn parse(&mut self, d: &[u8]) -> Result<(usize, bool), ParseError> {
        let idx = match find_crlf(d) {
            Some(i) => i,
            None => return Ok((0, false)),
        };
        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &d[..idx];
        let lossy = || String::from_utf8_lossy(line).into_owned();
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| ParseError::MalformedHeaderLine(lossy()))?;
        let (raw_key, value) = (&line[..colon], &line[colon + 1..]);

        if raw_key.last().is_some_and(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::MalformedHeaderLine(lossy()));
        }
        let key = raw_key.trim_ascii();
        if !is_valid_key(key) {
            return Err(ParseError::InvalidHeaderKey(String::from_utf8_lossy(raw_key).into_owned()));
        }
        // Keys are ASCII tokens at this point; values may carry obs-text.
        let key = String::from_utf8_lossy(key);
        let value = String::from_utf8_lossy(value);

        self.add(&key, value.trim());
        Ok((idx + CRLF.len(), false))
    }

    pub fn get(&self, k: &str) -> Option<&str> {
        self.map.get(&k.to_ascii_lowercase()).map(|v| v.as_str())
    }

    /// Replace any existing value for `k`.
    pub fn set(&mut self, k: &str, v: &str) {
        self.map.insert(k.to_ascii_lowercase(), v.to_string());
    }

    /// Merge `v` into `k`, joining repeated values with ", ".
    pub fn add(&mut self, k: &str, v: &str) {
        self.map
            .entry(k.to_ascii_lowercase())
            .and_modify(|cur| {
                cur.push_str(", ");
                cur.push_str(v);
            })
            .or_insert_with(|| v.to_string());
    }

    pub(crate) fn remove(&mut self, k: &str) -> Option<String> {
        self.map.remove(&k.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_valid_key(k: &[u8]) -> bool {
    !k.is_empty() && k.iter().copied().all(is_token_byte)
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

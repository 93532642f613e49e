//! Rewriting the `Cookie` request header from operator-supplied overrides.
//!
//! The header value is parsed into an ordered map, the overrides replace the
//! values of cookies the request already carries, and the header is rendered
//! back in its original order. New cookie names are never introduced.
//!
//! Overrides arrive as a JSON array of `{"name": ..., "value": ...}` objects:
//!
//! ```text
//! [{"name":"session","value":"abc123"},{"name":"csrftoken","value":"xyz"}]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::EmptyCookieHeader;
use crate::http::headers::{RequestHeader, find_header};

/// Cookie names mapped to their values, in first-seen order.
pub type CookieMap = IndexMap<String, String>;

/// A single replacement requested by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOverride {
    pub name: String,
    pub value: String,
}

/// Result of an apply, as reported back to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NoCookieHeader,
    InvalidOverridePayload,
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("request has no Cookie header")]
    NoCookieHeader,
    #[error("invalid override payload: {0}")]
    InvalidOverridePayload(#[from] serde_json::Error),
}

impl MergeError {
    pub fn outcome(&self) -> Outcome {
        match self {
            MergeError::NoCookieHeader => Outcome::NoCookieHeader,
            MergeError::InvalidOverridePayload(_) => Outcome::InvalidOverridePayload,
        }
    }
}

/// Deserializes an operator payload.
pub fn parse_overrides(payload: &str) -> Result<Vec<CookieOverride>, serde_json::Error> {
    serde_json::from_str(payload)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CookieMerger {
    empty_header: EmptyCookieHeader,
}

impl CookieMerger {
    pub fn new(empty_header: EmptyCookieHeader) -> Self {
        Self { empty_header }
    }

    /// Parses a `Cookie` header value (without the `Cookie:` prefix).
    ///
    /// Segments are split on `;` and trimmed, then split on their first `=`.
    /// Segments without `=` are dropped. A repeated name takes the later value
    /// but keeps the position of its first occurrence.
    pub fn parse_header(raw: &str) -> CookieMap {
        let mut map = CookieMap::new();
        for segment in raw.split(';') {
            if let Some((name, value)) = segment.trim().split_once('=') {
                map.insert(name.to_string(), value.to_string());
            }
        }
        map
    }

    /// Replaces the values of cookies already present in `map`.
    ///
    /// Overrides naming an absent cookie are ignored.
    pub fn apply_overrides(mut map: CookieMap, overrides: &[CookieOverride]) -> CookieMap {
        for item in overrides {
            if let Some(value) = map.get_mut(&item.name) {
                value.clone_from(&item.value);
            }
        }
        map
    }

    /// Renders the full header line, `Cookie: ` included.
    pub fn render_header(map: &CookieMap) -> String {
        let pairs: Vec<String> = map
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("{}: {}", RequestHeader::Cookie.as_str(), pairs.join("; "))
    }

    /// Rewrites the `Cookie` line of `headers` with already deserialized overrides.
    ///
    /// Every other line is kept verbatim and in place.
    pub fn rewrite(
        &self,
        headers: &[String],
        overrides: &[CookieOverride],
    ) -> Result<Vec<String>, MergeError> {
        let (index, raw) =
            find_header(headers, RequestHeader::Cookie.as_str()).ok_or(MergeError::NoCookieHeader)?;
        Ok(self.rewrite_at(headers, index, raw, overrides))
    }

    /// Locates the `Cookie` line, then deserializes `payload` and applies it.
    ///
    /// On error the headers are left untouched.
    pub fn try_apply(&self, headers: &[String], payload: &str) -> Result<Vec<String>, MergeError> {
        let (index, raw) =
            find_header(headers, RequestHeader::Cookie.as_str()).ok_or(MergeError::NoCookieHeader)?;
        let overrides = parse_overrides(payload)?;
        Ok(self.rewrite_at(headers, index, raw, &overrides))
    }

    /// Replaces line `index`, whose value is `raw`, with the merged header.
    fn rewrite_at(
        &self,
        headers: &[String],
        index: usize,
        raw: &str,
        overrides: &[CookieOverride],
    ) -> Vec<String> {
        let map = Self::apply_overrides(Self::parse_header(raw.trim()), overrides);

        let mut new_headers = headers.to_vec();
        if map.is_empty() && self.empty_header == EmptyCookieHeader::Omit {
            new_headers.remove(index);
        } else {
            new_headers[index] = Self::render_header(&map);
        }
        new_headers
    }

    /// Like [`try_apply`](Self::try_apply), but always hands back a header list:
    /// the rewritten one on success, an unchanged copy otherwise.
    pub fn apply(&self, headers: &[String], payload: &str) -> (Vec<String>, Outcome) {
        match self.try_apply(headers, payload) {
            Ok(new_headers) => (new_headers, Outcome::Applied),
            Err(err) => (headers.to_vec(), err.outcome()),
        }
    }
}

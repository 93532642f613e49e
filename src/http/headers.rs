//! Lookups over raw HTTP header lines.
//!
//! A captured request is handled as a list of header lines, the request line
//! first, exactly as the intercepting runtime hands them over. Lines are kept
//! verbatim so that anything not rewritten goes back out byte-for-byte.
//!
//! Header names are matched case-insensitively. Only the first matching line
//! is considered; repeated headers are not merged.

/// Well-known request headers looked up by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHeader {
    Host,
    Cookie,
}

impl RequestHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestHeader::Host => "Host",
            RequestHeader::Cookie => "Cookie",
        }
    }
}

/// Returns the index and the untrimmed value of the first line named `name`.
///
/// A line matches when it starts with `name` followed directly by `:`, compared
/// case-insensitively. The request line never matches since it has no such prefix.
pub fn find_header<'a, S: AsRef<str>>(lines: &'a [S], name: &str) -> Option<(usize, &'a str)> {
    lines.iter().enumerate().find_map(|(i, line)| {
        let line = line.as_ref();
        let (line_name, value) = line.split_once(':')?;
        if line_name.eq_ignore_ascii_case(name) {
            Some((i, value))
        } else {
            None
        }
    })
}

/// Extracts the host identifier from the `Host` header.
///
/// The value is trimmed but otherwise used verbatim: the port is kept and no
/// case folding happens. An empty value counts as no host.
pub fn host<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let (_, value) = find_header(lines, RequestHeader::Host.as_str())?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

//! Splitting a raw request into header lines and body, and putting it back together.
//!
//! Unlike a validating parser, this never rejects input: whatever the
//! intercepting runtime captured is what gets edited.
//!
//! The header section is decoded as ISO-8859-1: every byte becomes the `char`
//! of the same value and is written back as that single byte, so header lines
//! that are not valid UTF-8 survive an edit unchanged. Characters above
//! U+00FF can only come from edited text and are written as UTF-8.

const CRLF: &str = "\r\n";

/// Header lines and body location of a captured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Request line followed by every header line, without terminators.
    pub headers: Vec<String>,
    /// Offset of the first body byte in the analyzed buffer.
    pub body_offset: usize,
}

impl RequestInfo {
    pub fn analyze(raw: &[u8]) -> Self {
        // Look for the end of headers: \r\n\r\n, or a bare \n\n from hand-written captures
        let (headers_end, body_offset) = match find_headers_end(raw) {
            Some(found) => found,
            None => (raw.len(), raw.len()),
        };

        let headers = raw[..headers_end]
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(decode_latin1)
            .collect();

        Self {
            headers,
            body_offset,
        }
    }

    pub fn body<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        &raw[self.body_offset.min(raw.len())..]
    }
}

/// Returns where the header section ends and where the body starts.
fn find_headers_end(raw: &[u8]) -> Option<(usize, usize)> {
    for i in 0..raw.len() {
        if raw[i..].starts_with(b"\r\n\r\n") {
            return Some((i, i + 4));
        }
        if raw[i..].starts_with(b"\n\n") {
            return Some((i, i + 2));
        }
    }
    None
}

fn decode_latin1(line: &[u8]) -> String {
    line.iter().map(|&b| char::from(b)).collect()
}

fn encode_latin1(line: &str, out: &mut Vec<u8>) {
    let mut utf8 = [0; 4];
    for c in line.chars() {
        match u8::try_from(c) {
            Ok(b) => out.push(b),
            Err(_) => out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes()),
        }
    }
}

/// Rebuilds a request from header lines and body bytes.
pub fn build_message<S: AsRef<str>>(headers: &[S], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 256);
    for line in headers {
        encode_latin1(line.as_ref(), &mut out);
        out.extend_from_slice(CRLF.as_bytes());
    }
    out.extend_from_slice(CRLF.as_bytes());
    out.extend_from_slice(body);
    out
}

//! URL utilities for tab reconciliation
//!
//! Small allocation-light helpers: restricted-scheme detection, tab URL
//! resolution and a strict percent codec with `encodeURIComponent` /
//! `decodeURIComponent` semantics.

use std::borrow::Cow;

use crate::types::{TabChange, TabInfo};

// =============================================================================
// Restricted Schemes
// =============================================================================

/// Browser-internal URL prefixes where scripts cannot be injected.
pub const RESTRICTED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "devtools://",
    "edge://",
    "about:",
];

/// Returns true when the extension has no execution rights on `url`.
#[inline]
pub fn is_restricted_url(url: &str) -> bool {
    RESTRICTED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

// =============================================================================
// Tab URL Resolution
// =============================================================================

/// URL to use for a tab event: the changed URL, then the tab URL, then the
/// pending URL. Returns `None` when the result is empty.
pub fn resolve_tab_url<'a>(tab: &'a TabInfo, change: Option<&'a TabChange>) -> Option<&'a str> {
    change
        .and_then(|c| c.url.as_deref())
        .or(tab.url.as_deref())
        .or(tab.pending_url.as_deref())
        .filter(|url| !url.is_empty())
}

// =============================================================================
// Percent Encoding
// =============================================================================

#[inline]
fn is_component_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode every byte outside the URI component unreserved set.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if is_component_safe(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(b >> 4) as usize] as char);
            out.push(HEX_UPPER[(b & 0x0F) as usize] as char);
        }
    }
    out
}

/// Decode every `%XX` escape in one pass.
///
/// Fails on a truncated or non-hex escape and on escapes that do not form
/// valid UTF-8.
pub fn decode_uri_component(input: &str) -> Option<String> {
    if !input.contains('%') {
        return Some(input.to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

// =============================================================================
// Match Candidates
// =============================================================================

/// Strings a rule pattern is tested against, in order.
///
/// The decoded URL comes first when decoding succeeds and changes the text;
/// the raw URL is always last.
pub fn match_candidates(url: &str) -> Vec<Cow<'_, str>> {
    match decode_uri_component(url) {
        Some(decoded) if !decoded.is_empty() && decoded != url => {
            vec![Cow::Owned(decoded), Cow::Borrowed(url)]
        }
        _ => vec![Cow::Borrowed(url)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_urls() {
        assert!(is_restricted_url("chrome://settings"));
        assert!(is_restricted_url("chrome-extension://abc/options.html"));
        assert!(is_restricted_url("devtools://devtools/bundled"));
        assert!(is_restricted_url("edge://flags"));
        assert!(is_restricted_url("about:blank"));
        assert!(!is_restricted_url("https://example.com"));
        assert!(!is_restricted_url("file:///tmp/a.html"));
    }

    #[test]
    fn test_resolve_tab_url_order() {
        let tab = TabInfo {
            id: 1,
            url: Some("https://tab.example".into()),
            pending_url: Some("https://pending.example".into()),
            title: None,
        };
        let change = TabChange {
            url: Some("https://changed.example".into()),
            ..Default::default()
        };
        assert_eq!(resolve_tab_url(&tab, Some(&change)), Some("https://changed.example"));
        assert_eq!(resolve_tab_url(&tab, None), Some("https://tab.example"));

        let pending_only = TabInfo {
            id: 2,
            pending_url: Some("https://pending.example".into()),
            ..Default::default()
        };
        assert_eq!(resolve_tab_url(&pending_only, None), Some("https://pending.example"));
        assert_eq!(resolve_tab_url(&TabInfo::default(), None), None);
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("abc-_.!~*'()"), "abc-_.!~*'()");
        assert_eq!(
            encode_uri_component("https://a.com/x?y=1&z"),
            "https%3A%2F%2Fa.com%2Fx%3Fy%3D1%26z"
        );
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_uri_component() {
        assert_eq!(decode_uri_component("a%20b").as_deref(), Some("a b"));
        assert_eq!(decode_uri_component("%2Fpath%2f").as_deref(), Some("/path/"));
        assert_eq!(decode_uri_component("caf%C3%A9").as_deref(), Some("café"));
        assert_eq!(decode_uri_component("plain").as_deref(), Some("plain"));
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(decode_uri_component("100%"), None);
        assert_eq!(decode_uri_component("%4"), None);
        assert_eq!(decode_uri_component("%zz"), None);
        assert_eq!(decode_uri_component("%C3"), None);
        assert_eq!(decode_uri_component("%FF%FE"), None);
    }

    #[test]
    fn test_match_candidates() {
        let encoded = match_candidates("https://a.com/q?x=hello%20world");
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0], "https://a.com/q?x=hello world");
        assert_eq!(encoded[1], "https://a.com/q?x=hello%20world");

        let plain = match_candidates("https://a.com/");
        assert_eq!(plain.len(), 1);

        let broken = match_candidates("https://a.com/100%");
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0], "https://a.com/100%");
    }
}

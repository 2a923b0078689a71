//! Rule patterns
//!
//! Rule patterns are written in the browser's regular expression dialect.
//! They are compiled with `fancy_regex` so look-around and backreferences
//! work, after rewriting the class shorthands whose meaning differs:
//! `\d` and `\w` are ASCII-only in the browser but Unicode-aware here.

use std::fmt;

use fancy_regex::{Captures, Regex};

/// A compiled rule pattern that remembers its source text.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, fancy_regex::Error> {
        let regex = Regex::new(&translate(source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Pattern as written by the user.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Captures of the leftmost match.
    ///
    /// A backtracking limit hit while matching counts as no match.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        match self.regex.captures(text) {
            Ok(caps) => caps,
            Err(e) => {
                log::debug!("pattern '{}' aborted on '{}': {}", self.source, text, e);
                None
            }
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Rewrite browser-dialect syntax into the form `fancy_regex` reads the
/// same way.
fn translate(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut chars = source.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push('\\');
                    break;
                };
                match (next, in_class) {
                    ('d', false) => out.push_str("[0-9]"),
                    ('D', false) => out.push_str("[^0-9]"),
                    ('w', false) => out.push_str("[0-9A-Za-z_]"),
                    ('W', false) => out.push_str("[^0-9A-Za-z_]"),
                    ('d', true) => out.push_str("0-9"),
                    ('D', true) => out.push_str("[:^digit:]"),
                    ('w', true) => out.push_str("0-9A-Za-z_"),
                    ('W', true) => out.push_str("[:^word:]"),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
            }
            // Nested classes and set operators are literal in the browser.
            '[' | '&' | '~' if in_class => {
                out.push('\\');
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            _ => out.push(c),
        }
    }

    out
}

//! `$N` placeholder expansion
//!
//! Rendering is total: every `$` followed by digits is replaced, with
//! captures that are missing, unmatched or out of range expanding to "".

/// Expand `$N` placeholders in `template` with `captures[N]`.
///
/// A `$` not followed by a digit is kept literally.
pub fn render_template<S: AsRef<str>>(template: &str, captures: &[Option<S>]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let digits_start = i + 1;
        let mut digits_end = digits_start;
        while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
            digits_end += 1;
        }

        if digits_end == digits_start {
            i += 1;
            continue;
        }

        out.push_str(&template[literal_start..i]);
        if let Some(value) = capture_at(captures, &template[digits_start..digits_end]) {
            out.push_str(value);
        }

        i = digits_end;
        literal_start = i;
    }

    out.push_str(&template[literal_start..]);
    out
}

fn capture_at<'c, S: AsRef<str>>(captures: &'c [Option<S>], digits: &str) -> Option<&'c str> {
    // Indices too large for usize are simply out of range.
    let index: usize = digits.parse().ok()?;
    captures.get(index)?.as_ref().map(|s| s.as_ref())
}

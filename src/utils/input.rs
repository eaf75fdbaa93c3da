//! Input hygiene for the single-line input bar.

/// Sanitize typed or pasted text before it is submitted.
///
/// The input bar holds one line, so line breaks collapse to spaces, tabs
/// widen to four spaces, and remaining control characters are dropped.
pub fn sanitize_line(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => sanitized.push(' '),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

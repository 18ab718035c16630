//! PDF string encoding
//!
//! Content streams use the built-in Helvetica font with a single-byte
//! Latin-1 text encoding. Backslash and parentheses delimit literal
//! strings and must be escaped; characters outside Latin-1 are substituted
//! with `?` rather than failing the render.

/// Escape a string for use inside a PDF literal string `( ... )`.
pub fn escape_text(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)");
    escaped
        .chars()
        .map(|c| if (c as u32) < 256 { c } else { '?' })
        .collect()
}

/// Encode an assembled content string to Latin-1 bytes.
///
/// Inputs have already passed through [`escape_text`], so every char fits
/// a single byte; anything that slipped through is substituted.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code < 256 { code as u8 } else { b'?' }
        })
        .collect()
}

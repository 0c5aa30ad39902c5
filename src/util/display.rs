// Display Helpers
// Shortened key/ciphertext strings for logs and printable recovered messages

/// Keep the leading `1/divisor` of a string for logging
/// Large decimal numbers are unreadable in full
pub fn truncate(s: &str, divisor: usize) -> &str {
    if divisor <= 1 {
        return s;
    }

    let mut end = s.len() / divisor;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render recovered bytes as text, or hex when they are not valid UTF-8
pub fn render_message(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("0x{}", hex::encode(bytes)),
    }
}

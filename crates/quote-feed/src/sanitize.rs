/// Normalize a raw ticker string: trim whitespace, uppercase, and accept
/// only `[A-Z0-9&-]` up to 20 characters. Returns `None` on rejection.
///
/// Idempotent: sanitizing an already-sanitized symbol is a no-op.
pub fn sanitize_symbol(raw: &str) -> Option<String> {
    let cleaned = raw.trim().to_uppercase();
    if cleaned.is_empty() || cleaned.len() > 20 {
        return None;
    }
    let valid = cleaned
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '&' || c == '-');
    if valid {
        Some(cleaned)
    } else {
        None
    }
}

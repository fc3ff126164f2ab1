//! Text normalization shared by index building and query scoring.

/// Lowercase `text`, replace everything outside `[a-z0-9]` and whitespace with
/// a space, collapse whitespace runs and trim.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            mapped.push(c);
        } else {
            mapped.push(' ');
        }
    }
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

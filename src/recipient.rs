//! Recipient name taken from the `?name=` query parameter.

/// Trim, capitalize the first letter, and fall back to `default` when the
/// value is absent or blank. The input is expected to be percent-decoded
/// already (the web layer does that with `URLSearchParams`).
pub fn normalize_name(raw: Option<&str>, default: &str) -> String {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default.to_string();
    };
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => default.to_string(),
    }
}

/// Message shown under the celebration headline.
pub fn celebration_message(name: &str) -> String {
    format!("Can't wait for our date, {name}!")
}

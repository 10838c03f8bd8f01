//! Helpers for reading optional request fields.

/// Normalize an identifier-like field: trims it and treats blank as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Presence check for free-text fields: blank counts as absent, but a present
/// value is kept exactly as submitted.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

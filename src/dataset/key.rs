//! Lookup key canonicalization

/// Canonical form of a module or style identifier: trimmed and lowercased.
///
/// Applied to dataset key columns at load time and to user input at query
/// time, so matching is insensitive to case and surrounding whitespace.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

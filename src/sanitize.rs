//! Filesystem-safe names derived from record identifiers.

/// Returned when an identifier sanitizes to nothing.
pub const FALLBACK_NAME: &str = "default_seq_id";

/// Characters that are not allowed in file names on common platforms.
const RESERVED: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

fn is_replaced(c: char) -> bool {
    c.is_whitespace() || RESERVED.contains(&c)
}

/// Maps an arbitrary identifier to a token usable as a file name.
///
/// Reserved characters and whitespace become `_`, runs of underscores
/// collapse into one, and an empty result falls back to [`FALLBACK_NAME`].
/// The mapping is total and idempotent.
///
/// # Examples
///
/// ```
/// use seqsynth::sanitize::sanitize;
///
/// assert_eq!(sanitize("a b/c:d"), "a_b_c_d");
/// assert_eq!(sanitize(""), "default_seq_id");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if is_replaced(c) { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    if out.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

/// Builds `<sanitized id>.<extension>`.
pub fn file_name_for(id: &str, extension: &str) -> String {
    let stem = sanitize(id);
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        stem
    } else {
        format!("{}.{}", stem, extension)
    }
}

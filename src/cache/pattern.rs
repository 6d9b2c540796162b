//! Match patterns for scan-based cache invalidation.
//!
//! A pattern anchors on the JSON shape an identifier takes inside a cached GraphQL payload and
//! then alternates over the changed identifiers: `<prefix>(<id1>|<id2>|...)`.

use super::error::InvalidationError;

/// Matches `"sku": "<id>` in cached product payloads.
pub const PRODUCT_SKU_PREFIX: &str = r#""sku":\s*""#;
/// Matches `"uids": {"id": "<id>` in cached category payloads.
pub const CATEGORY_UID_PREFIX: &str = r#""uids"\s*:\s*\{"id"\s*:\s*""#;

/// Build a pattern for `ids` under `prefix`.
///
/// Identifiers keep their input order and have pattern metacharacters escaped before
/// interpolation. Blank identifiers are dropped since an empty alternative would match every
/// entry.
pub fn build_pattern(prefix: &str, ids: &[String]) -> Result<String, InvalidationError> {
    let alternatives: Vec<String> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(escape_identifier)
        .collect();

    if alternatives.is_empty() {
        return Err(InvalidationError::invalid_argument(
            "pattern requires at least one non-blank identifier",
        ));
    }

    Ok(format!("{prefix}({})", alternatives.join("|")))
}

const METACHARACTERS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

/// Backslash-escape characters that are special outside a character class.
fn escape_identifier(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for ch in id.chars() {
        if METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

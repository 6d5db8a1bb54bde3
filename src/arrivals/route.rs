//! Route identifier normalization.

/// Separator the agency places between a base route number and its variant
/// suffix (e.g. `28-VIC`).
const VARIANT_SEPARATOR: char = '-';

/// Strip the agency variant suffix from a raw route identifier.
///
/// Returns the substring before the first separator, or the whole string
/// when no separator is present. Idempotent.
pub fn normalize_route(raw: &str) -> &str {
    match raw.find(VARIANT_SEPARATOR) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

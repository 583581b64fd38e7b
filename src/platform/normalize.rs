// src/platform/normalize.rs
// =============================================================================
// Turns a raw user-entered link into something a visitor's browser can open.
//
// Rules, in order:
// 1. Empty input comes back unchanged; everything else is trimmed
// 2. "tel:" links are kept as they are
// 3. Bare phone numbers ("+998 90 123 45 67") become "tel:+998901234567"
// 4. Anything without an http:// or https:// scheme gets "https://"
//
// Every output of these rules is a fixed point of them, so normalizing twice
// is the same as normalizing once.
// =============================================================================

/// Minimum number of digits for a string to count as a phone number.
const MIN_PHONE_DIGITS: usize = 9;

/// Normalizes a raw link. Total: it never fails.
///
/// Examples:
///   "t.me/foo"       -> "https://t.me/foo"
///   "+998901234567"  -> "tel:+998901234567"
///   "tel:123456789"  -> "tel:123456789"
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }

    if has_prefix_ignore_case(trimmed, "tel:") {
        return trimmed.to_string();
    }

    if is_bare_phone(trimmed) {
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        return format!("tel:{}", compact);
    }

    if has_prefix_ignore_case(trimmed, "http://") || has_prefix_ignore_case(trimmed, "https://") {
        return trimmed.to_string();
    }

    format!("https://{}", trimmed)
}

/// True when `value`, with all whitespace removed, is an optional `+`
/// followed by at least nine digits and nothing else.
pub fn is_bare_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    digits.len() >= MIN_PHONE_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

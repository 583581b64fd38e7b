// src/platform/detect.rs
// =============================================================================
// Maps a URL to the platform it points at, so each link gets the right icon.
//
// How it works:
// - Lowercase the input once
// - Walk a fixed, ordered rule table; the first rule that matches wins
// - Anything unrecognised is a plain "website"
//
// The order of the rules matters. "x.com" is a substring of plenty of hosts,
// and a Google Maps link contains "google." as well as "maps", so moving a rule
// up or down changes results for real inputs.
//
// Rust concepts:
// - A const table of (Platform, &[&str]) rules, walked in order
// - serde(from/into String): unknown tags fall back instead of failing
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::is_bare_phone;

/// The closed set of services a link can be classified as.
///
/// On the wire this is the lowercase `icon_type` tag (`"yandex_map"`, `"x"`,
/// ...). Tags the client does not know about deserialize as `Website`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Telegram,
    Instagram,
    Facebook,
    X,
    Whatsapp,
    Linkedin,
    Youtube,
    Gmail,
    Phone,
    Tiktok,
    YandexMap,
    GoogleMap,
    #[default]
    Website,
}

impl Platform {
    /// Every platform, in the order the picker lists them.
    pub const ALL: [Platform; 13] = [
        Platform::Telegram,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Tiktok,
        Platform::X,
        Platform::Whatsapp,
        Platform::Phone,
        Platform::YandexMap,
        Platform::GoogleMap,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Gmail,
        Platform::Website,
    ];

    /// The wire tag, as stored in `icon_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Telegram => "telegram",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::X => "x",
            Platform::Whatsapp => "whatsapp",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Gmail => "gmail",
            Platform::Phone => "phone",
            Platform::Tiktok => "tiktok",
            Platform::YandexMap => "yandex_map",
            Platform::GoogleMap => "google_map",
            Platform::Website => "website",
        }
    }

    /// Human readable name for listings and previews.
    pub fn label(self) -> &'static str {
        match self {
            Platform::Telegram => "Telegram",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::X => "X (Twitter)",
            Platform::Whatsapp => "WhatsApp",
            Platform::Linkedin => "LinkedIn",
            Platform::Youtube => "YouTube",
            Platform::Gmail => "Gmail",
            Platform::Phone => "Phone",
            Platform::Tiktok => "TikTok",
            Platform::YandexMap => "Yandex Map",
            Platform::GoogleMap => "Google Map",
            Platform::Website => "Website",
        }
    }

    /// Parses a wire tag. Unknown tags fall back to `Website`.
    pub fn from_tag(tag: &str) -> Platform {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == tag)
            .unwrap_or(Platform::Website)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        Platform::from_tag(&tag)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

// Substring rules, checked top to bottom.
// The map and phone rules need more than "contains any of", so they are
// handled in `detect` itself after this table.
const SUBSTRING_RULES: &[(Platform, &[&str])] = &[
    (Platform::Telegram, &["t.me", "telegram"]),
    (Platform::Instagram, &["instagram.com", "instagr.am"]),
    (Platform::Facebook, &["facebook.com", "fb.com", "fb.me"]),
    (Platform::X, &["twitter.com", "x.com"]),
    (Platform::Whatsapp, &["wa.me", "whatsapp"]),
    (Platform::Linkedin, &["linkedin.com"]),
    (Platform::Youtube, &["youtube.com", "youtu.be"]),
    (Platform::Gmail, &["gmail.com", "mail.google.com"]),
    (Platform::Tiktok, &["tiktok.com", "vm.tiktok.com"]),
];

/// Classifies a URL (normalized or not) into a [`Platform`].
///
/// Never fails: empty or unrecognised input is `Platform::Website`.
///
/// Example:
///   detect("t.me/mybrand") -> Platform::Telegram
///   detect("+998 90 123 45 67") -> Platform::Phone
pub fn detect(url: &str) -> Platform {
    if url.is_empty() {
        return Platform::Website;
    }

    let lower = url.to_lowercase();

    for (platform, needles) in SUBSTRING_RULES {
        if needles.iter().any(|needle| lower.contains(needle)) {
            return *platform;
        }
    }

    if lower.contains("yandex.") && (lower.contains("/maps") || lower.contains("maps.")) {
        return Platform::YandexMap;
    }

    if (lower.contains("google.") && lower.contains("maps"))
        || lower.contains("goo.gl/maps")
        || lower.contains("maps.app.goo.gl")
    {
        return Platform::GoogleMap;
    }

    if lower.starts_with("tel:") || is_bare_phone(url) {
        return Platform::Phone;
    }

    Platform::Website
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detect_each_platform() {
        let cases = [
            ("https://t.me/mybrand", Platform::Telegram),
            ("telegram.me/mybrand", Platform::Telegram),
            ("https://instagram.com/shop", Platform::Instagram),
            ("instagr.am/p/abc", Platform::Instagram),
            ("https://www.facebook.com/page", Platform::Facebook),
            ("fb.me/page", Platform::Facebook),
            ("https://twitter.com/someone", Platform::X),
            ("https://x.com/someone", Platform::X),
            ("https://wa.me/998901234567", Platform::Whatsapp),
            ("https://linkedin.com/in/someone", Platform::Linkedin),
            ("https://youtu.be/abc", Platform::Youtube),
            ("https://www.youtube.com/@channel", Platform::Youtube),
            ("mailto:someone@gmail.com", Platform::Gmail),
            ("https://www.tiktok.com/@shop", Platform::Tiktok),
            ("https://yandex.uz/maps/org/123", Platform::YandexMap),
            ("https://maps.yandex.ru/?ll=1,2", Platform::YandexMap),
            ("https://www.google.com/maps/place/x", Platform::GoogleMap),
            ("https://goo.gl/maps/abc", Platform::GoogleMap),
            ("https://maps.app.goo.gl/abc", Platform::GoogleMap),
            ("tel:+998901234567", Platform::Phone),
            ("+998 90 123 45 67", Platform::Phone),
            ("https://example.com", Platform::Website),
        ];

        for (url, expected) in cases {
            assert_eq!(detect(url), expected, "url: {url}");
        }
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(detect("HTTPS://T.ME/Brand"), Platform::Telegram);
        assert_eq!(detect("TEL:123456789"), Platform::Phone);
    }

    #[test]
    fn test_detect_empty_is_website() {
        assert_eq!(detect(""), Platform::Website);
    }

    #[test]
    fn test_rule_order_is_preserved() {
        // Contains both a telegram and an instagram marker; telegram comes first
        assert_eq!(detect("https://t.me/instagram.com"), Platform::Telegram);
        // Mail on a google host is gmail, not a map
        assert_eq!(detect("https://mail.google.com/maps"), Platform::Gmail);
        // Short digit runs are not phone numbers
        assert_eq!(detect("12345678"), Platform::Website);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_website() {
        let platform: Platform = serde_json::from_str("\"telegram_number\"").unwrap();
        assert_eq!(platform, Platform::Website);

        let platform: Platform = serde_json::from_str("\"yandex_map\"").unwrap();
        assert_eq!(platform, Platform::YandexMap);
        assert_eq!(serde_json::to_string(&platform).unwrap(), "\"yandex_map\"");
    }

    proptest! {
        #[test]
        fn detect_is_total(raw in any::<String>()) {
            prop_assert!(Platform::ALL.contains(&detect(&raw)));
        }

        #[test]
        fn detect_ignores_ascii_case(raw in "[ -~]{0,40}") {
            prop_assert_eq!(detect(&raw), detect(&raw.to_ascii_uppercase()));
        }
    }
}

//! Best-effort user-agent classification.
//!
//! [`classify`] is a pure function from a raw `User-Agent` header to a
//! [`ClientInfo`]. Anything the parser does not recognize falls back to
//! [`UNKNOWN`]; classification never fails.

use woothee::parser::Parser;

/// Value used for every field the parser could not determine.
pub const UNKNOWN: &str = "unknown";

/// Device, operating system and browser derived from a user-agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// One of `desktop`, `mobile`, `bot`, `appliance`, `other` or `unknown`.
    pub device: String,
    pub os: String,
    pub browser: String,
}

impl ClientInfo {
    pub fn unknown() -> Self {
        Self {
            device: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            browser: UNKNOWN.to_string(),
        }
    }
}

/// Classifies a raw user-agent string.
///
/// # Examples
///
/// ```ignore
/// let info = classify("");
/// assert_eq!(info, ClientInfo::unknown());
/// ```
pub fn classify(raw: &str) -> ClientInfo {
    let raw = raw.trim();
    if raw.is_empty() {
        return ClientInfo::unknown();
    }

    let parser = Parser::new();
    let Some(result) = parser.parse(raw) else {
        return ClientInfo::unknown();
    };

    ClientInfo {
        device: device_class(result.category).to_string(),
        os: known_or_unknown(result.os),
        browser: known_or_unknown(result.name),
    }
}

fn device_class(category: &str) -> &'static str {
    match category {
        "pc" => "desktop",
        "smartphone" | "mobilephone" => "mobile",
        "crawler" => "bot",
        "appliance" => "appliance",
        "misc" => "other",
        _ => UNKNOWN,
    }
}

fn known_or_unknown(value: &str) -> String {
    if value.is_empty() || value.eq_ignore_ascii_case("UNKNOWN") {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/99.0.4844.51 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_4 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.4 Mobile/15E148 Safari/604.1";
    const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn test_classify_desktop_chrome() {
        let info = classify(CHROME_WINDOWS);
        assert_eq!(info.device, "desktop");
        assert_eq!(info.browser, "Chrome");
        assert!(info.os.starts_with("Windows"));
    }

    #[test]
    fn test_classify_mobile_safari() {
        let info = classify(SAFARI_IPHONE);
        assert_eq!(info.device, "mobile");
        assert_eq!(info.browser, "Safari");
    }

    #[test]
    fn test_classify_crawler() {
        let info = classify(GOOGLEBOT);
        assert_eq!(info.device, "bot");
    }

    #[test]
    fn test_classify_empty_is_unknown() {
        assert_eq!(classify(""), ClientInfo::unknown());
        assert_eq!(classify("   "), ClientInfo::unknown());
    }

    #[test]
    fn test_classify_garbage_never_fails() {
        let info = classify("definitely-not-a-browser");
        assert_eq!(info.browser, UNKNOWN);
        assert_eq!(info.os, UNKNOWN);
    }

    #[test]
    fn test_device_class_mapping() {
        assert_eq!(device_class("pc"), "desktop");
        assert_eq!(device_class("mobilephone"), "mobile");
        assert_eq!(device_class("UNKNOWN"), UNKNOWN);
    }
}

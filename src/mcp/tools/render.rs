//! Shared text rendering helpers for tool output.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::steam::models::{PriceOverview, Requirements};

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Strip HTML markup from store-provided text: `<br>` becomes a newline,
/// other tags are dropped, common entities are decoded.
pub fn strip_html(html: &str) -> String {
    let text = BR_TAG.replace_all(html, "\n");
    let text = HTML_TAG.replace_all(&text, "");
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// Playtime minutes rendered as hours with one decimal.
pub fn minutes_to_hours(minutes: u32) -> String {
    format!("{:.1}", minutes as f64 / 60.0)
}

pub fn persona_state_name(state: i32) -> &'static str {
    match state {
        0 => "Offline",
        1 => "Online",
        2 => "Busy",
        3 => "Away",
        4 => "Snooze",
        5 => "Looking to Trade",
        6 => "Looking to Play",
        _ => "Unknown",
    }
}

/// Unix timestamp rendered as a date, e.g. `2023-11-14`.
pub fn format_date(unix_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

/// Unix timestamp rendered with time, e.g. `2023-11-14 09:30 UTC`.
pub fn format_datetime(unix_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown".to_string(),
    }
}

/// Integer with thousands separators, e.g. `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_price(is_free: bool, price: Option<&PriceOverview>) -> String {
    if is_free {
        return "Free to Play".to_string();
    }
    match price {
        None => "Price not available".to_string(),
        Some(p) if p.discount_percent > 0 => format!(
            "{} ({}% off, was {})",
            p.final_formatted, p.discount_percent, p.initial_formatted
        ),
        Some(p) => p.final_formatted.clone(),
    }
}

/// System requirements as `Minimum:`/`Recommended:` lines, or
/// `Not specified` when the platform reports nothing usable.
pub fn format_requirements(reqs: Option<&Requirements>) -> String {
    let (minimum, recommended) = match reqs {
        Some(Requirements::Fields {
            minimum,
            recommended,
        }) => (minimum.as_deref(), recommended.as_deref()),
        _ => (None, None),
    };

    let mut parts = Vec::new();
    if let Some(min) = minimum {
        parts.push(format!("Minimum: {}", strip_html(min)));
    }
    if let Some(rec) = recommended {
        parts.push(format!("Recommended: {}", strip_html(rec)));
    }

    if parts.is_empty() {
        "Not specified".to_string()
    } else {
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_br_and_tags() {
        let html = "<strong>OS:</strong> Windows 10<br/>RAM: 8 GB<br>GPU: any";
        assert_eq!(strip_html(html), "OS: Windows 10\nRAM: 8 GB\nGPU: any");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(
            strip_html("Dungeons &amp; Dragons &lt;remake&gt; &#39;24 &quot;beta&quot;"),
            "Dungeons & Dragons <remake> '24 \"beta\""
        );
    }

    #[test]
    fn test_strip_html_trims() {
        assert_eq!(strip_html("  <p>hello</p>  "), "hello");
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(90), "1.5");
        assert_eq!(minutes_to_hours(0), "0.0");
        assert_eq!(minutes_to_hours(61), "1.0");
    }

    #[test]
    fn test_persona_state_names() {
        assert_eq!(persona_state_name(0), "Offline");
        assert_eq!(persona_state_name(6), "Looking to Play");
        assert_eq!(persona_state_name(42), "Unknown");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(1700000000), "2023-11-14");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_price_free() {
        assert_eq!(format_price(true, None), "Free to Play");
    }

    #[test]
    fn test_format_price_discounted() {
        let price = PriceOverview {
            currency: "EUR".to_string(),
            initial: 5999,
            r#final: 2999,
            discount_percent: 50,
            initial_formatted: "59,99€".to_string(),
            final_formatted: "29,99€".to_string(),
        };
        assert_eq!(
            format_price(false, Some(&price)),
            "29,99€ (50% off, was 59,99€)"
        );
    }

    #[test]
    fn test_format_price_plain() {
        let price = PriceOverview {
            currency: "USD".to_string(),
            initial: 1999,
            r#final: 1999,
            discount_percent: 0,
            initial_formatted: String::new(),
            final_formatted: "$19.99".to_string(),
        };
        assert_eq!(format_price(false, Some(&price)), "$19.99");
    }

    #[test]
    fn test_format_requirements_empty_array_form() {
        assert_eq!(
            format_requirements(Some(&Requirements::Empty(vec![]))),
            "Not specified"
        );
        assert_eq!(format_requirements(None), "Not specified");
    }

    #[test]
    fn test_format_requirements_both_fields() {
        let reqs = Requirements::Fields {
            minimum: Some("<strong>OS:</strong> Windows 10".to_string()),
            recommended: Some("OS: Windows 11".to_string()),
        };
        assert_eq!(
            format_requirements(Some(&reqs)),
            "Minimum: OS: Windows 10\nRecommended: OS: Windows 11"
        );
    }
}

// Value Formatting
// Canonical forms for numbers, colors, dates and times

use chrono::{NaiveDate, NaiveTime};
use ratatui::style::Color;

/// Format a number the way labels show it (`5` not `5.0`)
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Convert hex color to ratatui Color
pub fn hex_color(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    )
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into RGB
pub fn parse_color(input: &str) -> Option<(u8, u8, u8)> {
    let s = input.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match s.len() {
        3 => s.chars().flat_map(|c| [c, c]).collect(),
        6 => s.to_string(),
        _ => return None,
    };

    let hex = u32::from_str_radix(&expanded, 16).ok()?;
    Some((
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    ))
}

/// Canonical `#rrggbb` lowercase form
pub fn canonical_color(input: &str) -> Option<String> {
    parse_color(input).map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Canonical `YYYY-MM-DD` form; accepts unpadded month/day
pub fn canonical_date(input: &str) -> Option<String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Canonical `HH:MM` form; accepts `H:MM` and `HH:MM:SS`
pub fn canonical_time(input: &str) -> Option<String> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .ok()
        .map(|time| time.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_drops_trailing_zero() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.5), "-3.5");
    }

    #[test]
    fn test_canonical_color() {
        assert_eq!(canonical_color("#FF8800"), Some("#ff8800".to_string()));
        assert_eq!(canonical_color("f80"), Some("#ff8800".to_string()));
        assert_eq!(canonical_color("#12345"), None);
        assert_eq!(canonical_color("#gg0000"), None);
    }

    #[test]
    fn test_canonical_date() {
        assert_eq!(canonical_date("2024-1-5"), Some("2024-01-05".to_string()));
        assert_eq!(canonical_date("2024-02-30"), None);
    }

    #[test]
    fn test_canonical_time() {
        assert_eq!(canonical_time("9:05"), Some("09:05".to_string()));
        assert_eq!(canonical_time("23:59:10"), Some("23:59".to_string()));
        assert_eq!(canonical_time("25:00"), None);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0x3FA7D6), Color::Rgb(0x3F, 0xA7, 0xD6));
    }
}

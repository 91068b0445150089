//! Hue lookup: query value to target angle, token to hue match.

use super::codec;
use super::dataset::Token;

pub const DEFAULT_TOLERANCE: f64 = 30.0;

/// Tokens at or below this saturation are treated as gray and never match a
/// hue.
const MIN_SATURATION: u8 = 10;

const HUE_NAMES: &[(&str, f64)] = &[
    ("red", 0.0),
    ("orange", 30.0),
    ("yellow", 60.0),
    ("green", 120.0),
    ("cyan", 180.0),
    ("blue", 240.0),
    ("purple", 270.0),
    ("magenta", 300.0),
];

/// Resolve a hue query to degrees.
///
/// A leading integer (`"240"`, `"-30"`, `"200deg"`, `"0x1e"`) is taken as-is,
/// without range checks. Otherwise the value is looked up in the color-name
/// table; names not in the table resolve to 0, so they behave exactly like
/// `"red"`.
pub fn classify(value: &str) -> f64 {
    if let Some(degrees) = leading_integer(value) {
        return degrees;
    }
    let name = value.to_lowercase();
    HUE_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(0.0, |(_, h)| *h)
}

/// Whether the token's light value is a saturated color within `tolerance`
/// degrees of `target` on the hue circle.
///
/// A target far outside [0, 360) makes `360 - diff` negative, so every
/// saturated token matches.
pub fn matches_hue(token: &Token, target: f64, tolerance: f64) -> bool {
    let Some(rgb) = token.light_value().and_then(codec::decode) else {
        return false;
    };
    let hsl = rgb.to_hsl();
    let diff = (f64::from(hsl.h) - target).abs();
    let circular = diff.min(360.0 - diff);
    circular <= tolerance && hsl.s > MIN_SATURATION
}

/// Optional whitespace, optional sign, then decimal digits or `0x` and hex
/// digits; trailing text is ignored. Never overflows: long inputs lose
/// precision or become infinite instead.
fn leading_integer(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, s) = match s.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => (16, &s[2..]),
        _ => (10, s),
    };

    let len = s
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(s.len());
    if len == 0 {
        return None;
    }
    let digits = &s[..len];
    let magnitude = if radix == 10 {
        // Correctly rounded; out-of-range input parses to infinity.
        digits.parse::<f64>().ok()?
    } else {
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d))
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_names() {
        assert_eq!(classify("blue"), 240.0);
        assert_eq!(classify("Purple"), 270.0);
        assert_eq!(classify("MAGENTA"), 300.0);
        assert_eq!(classify("orange"), 30.0);
    }

    #[test]
    fn test_classify_numbers_pass_through() {
        assert_eq!(classify("240"), 240.0);
        assert_eq!(classify("-30"), -30.0);
        assert_eq!(classify("725"), 725.0);
        assert_eq!(classify(" 200deg"), 200.0);
    }

    #[test]
    fn test_unknown_name_is_red() {
        assert_eq!(classify("not-a-color"), 0.0);
        assert_eq!(classify("not-a-color"), classify("red"));
        assert_eq!(classify(""), 0.0);
    }

    #[test]
    fn test_matches_within_tolerance() {
        let orange = Token::light("#ff5500"); // hue 20
        assert!(matches_hue(&orange, 0.0, DEFAULT_TOLERANCE));
        assert!(matches_hue(&orange, 30.0, DEFAULT_TOLERANCE));
        assert!(!matches_hue(&orange, 60.0, DEFAULT_TOLERANCE));
        assert!(!matches_hue(&orange, 0.0, 10.0));
    }

    #[test]
    fn test_hue_distance_wraps_around() {
        let pink = Token::light("rgb(255, 0, 128)"); // hue 330
        assert!(matches_hue(&pink, 0.0, DEFAULT_TOLERANCE));
        assert!(matches_hue(&pink, -30.0, DEFAULT_TOLERANCE));
        assert!(!matches_hue(&pink, 240.0, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_grays_never_match() {
        // Saturation 10 exactly, hue 0.
        let barely = Token::light("rgb(140, 115, 115)");
        assert_eq!(codec::decode("rgb(140, 115, 115)").unwrap().to_hsl().s, 10);
        assert!(!matches_hue(&barely, 0.0, DEFAULT_TOLERANCE));
        assert!(!matches_hue(&Token::light("#808080"), 0.0, 360.0));
        assert!(!matches_hue(&Token::light("#ffffff"), 0.0, 360.0));
    }

    #[test]
    fn test_non_colors_never_match() {
        assert!(!matches_hue(&Token::light("{red-600}"), 0.0, 360.0));
        assert!(!matches_hue(&Token::light("#f00"), 0.0, 360.0));
        assert!(!matches_hue(&Token::default(), 0.0, 360.0));
    }

    #[test]
    fn test_classify_hex_prefix() {
        assert_eq!(classify("0x1e"), 30.0);
        assert_eq!(classify("-0XF0"), -240.0);
        assert_eq!(classify("0x"), 0.0);
        assert_eq!(classify("0xzz"), classify("red"));
    }

    #[test]
    fn test_huge_targets_do_not_overflow() {
        let min = classify("-9223372036854775808");
        assert_eq!(min, -9_223_372_036_854_775_808.0);
        let big = classify("99999999999999999999");
        assert_eq!(big, 1e20);

        // Far off the circle every saturated token matches, grays still don't.
        let green = Token::light("#00ff00");
        assert!(matches_hue(&green, min, DEFAULT_TOLERANCE));
        assert!(matches_hue(&green, big, DEFAULT_TOLERANCE));
        assert!(!matches_hue(&Token::light("#808080"), big, DEFAULT_TOLERANCE));

        let endless = "9".repeat(400);
        assert_eq!(classify(&endless), f64::INFINITY);
        assert!(matches_hue(&green, classify(&endless), DEFAULT_TOLERANCE));
    }
}

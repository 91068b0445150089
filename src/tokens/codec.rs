//! Token color decoding and RGB to HSL conversion.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::ServerError;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rgba?\(\s*(\d+),\s*(\d+),\s*(\d+)").expect("rgb() pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees [0, 360), saturation and lightness in percent, all rounded
/// to whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[allow(clippy::many_single_char_names)]
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut h = if delta == 0.0 {
            0.0
        } else if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        h = (h * 60.0).min(360.0);
        if h < 0.0 {
            h += 360.0;
        }

        let l = (min + max) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        Hsl {
            // 359.5 and up rounds onto 360, which is the same angle as 0.
            h: (h.round() as u16) % 360,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Decode a token's stored value. Only `#RRGGBB` and `rgb()`/`rgba()` are
/// colors; everything else (aliases, named colors, dimensions) is `None`.
pub fn decode(raw: &str) -> Option<Rgb> {
    if let Some(hex) = raw.strip_prefix('#') {
        return decode_hex6(hex);
    }
    if raw.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("rgb")) {
        let caps = RGB_FUNCTION.captures(raw)?;
        return Some(Rgb::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        ));
    }
    None
}

/// Parse a caller-supplied `#RGB` or `#RRGGBB` color.
pub fn parse_input_hex(value: &str) -> Result<Rgb, ServerError> {
    let invalid = || {
        ServerError::InvalidColor("Invalid color format. Please use #RGB or #RRGGBB format.".into())
    };

    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    let rgb = match hex.len() {
        3 => {
            let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
            decode_hex6(&doubled)
        }
        6 => decode_hex6(hex),
        _ => None,
    };
    rgb.ok_or_else(invalid)
}

fn decode_hex6(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(Rgb::new(
        u8::from_str_radix(&hex[0..2], 16).ok()?,
        u8::from_str_radix(&hex[2..4], 16).ok()?,
        u8::from_str_radix(&hex[4..6], 16).ok()?,
    ))
}

//! Contrast Validator - WCAG 2.x Relative Luminance
//!
//! Pure and total over well-formed `RRGGBB` colors (leading `#` optional).

use serde::{Deserialize, Serialize};

use crate::error::ContrastError;

pub const AA_NORMAL_TEXT: f64 = 4.5;
pub const AAA_NORMAL_TEXT: f64 = 7.0;

/// Per-channel step used when searching for an accessible variant.
const ADJUST_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn parse(hex: &str) -> Result<Self, ContrastError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ContrastError::InvalidColorFormat(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ContrastError::InvalidColorFormat(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn relative_luminance(&self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    fn lighten(&self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }

    fn darken(&self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastReport {
    pub contrast_ratio: f64,
    pub meets_aa: bool,
    pub meets_aaa: bool,
}

impl ContrastReport {
    fn from_ratio(ratio: f64) -> Self {
        let rounded = (ratio * 100.0).round() / 100.0;
        Self {
            contrast_ratio: rounded,
            meets_aa: rounded >= AA_NORMAL_TEXT,
            meets_aaa: rounded >= AAA_NORMAL_TEXT,
        }
    }
}

/// Unrounded WCAG contrast ratio between two parsed colors.
pub fn ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

pub fn contrast(color_a: &str, color_b: &str) -> Result<ContrastReport, ContrastError> {
    let a = Rgb::parse(color_a)?;
    let b = Rgb::parse(color_b)?;
    Ok(ContrastReport::from_ratio(ratio(a, b)))
}

/// Step `color` away from `background` until `target` is reached or
/// `max_iterations` steps were taken. Returns the last candidate either way.
pub fn adjust_for_contrast(
    color: &str,
    background: &str,
    target: f64,
    max_iterations: u32,
) -> Result<String, ContrastError> {
    let bg = Rgb::parse(background)?;
    let mut current = Rgb::parse(color)?;
    // Move away from the background's luminance, never toward it.
    let lighten = current.relative_luminance() > bg.relative_luminance();

    let mut iterations = 0;
    while ratio(current, bg) < target && iterations < max_iterations {
        current = if lighten {
            current.lighten(ADJUST_STEP)
        } else {
            current.darken(ADJUST_STEP)
        };
        iterations += 1;
    }

    Ok(current.to_hex())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeVariations {
    pub lighter: String,
    pub light: String,
    pub base: String,
    pub dark: String,
    pub darker: String,
}

pub fn shade_variations(color: &str) -> Result<ShadeVariations, ContrastError> {
    let base = Rgb::parse(color)?;
    Ok(ShadeVariations {
        lighter: base.lighten(60).to_hex(),
        light: base.lighten(30).to_hex(),
        base: base.to_hex(),
        dark: base.darken(30).to_hex(),
        darker: base.darken(60).to_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_on_white_is_maximum() {
        let report = contrast("#000000", "#FFFFFF").unwrap();
        assert_eq!(report.contrast_ratio, 21.0);
        assert!(report.meets_aa);
        assert!(report.meets_aaa);
    }

    #[test]
    fn test_close_grays_fail_aa() {
        let report = contrast("#777777", "#808080").unwrap();
        assert!(report.contrast_ratio < 1.5);
        assert!(report.contrast_ratio >= 1.0);
        assert!(!report.meets_aa);
        assert!(!report.meets_aaa);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("#0066FF", "#FFFFFF"),
            ("FDE047", "#171717"),
            ("#10B981", "#7C3AED"),
            ("#123456", "#123456"),
        ];
        for (a, b) in pairs {
            assert_eq!(contrast(a, b).unwrap(), contrast(b, a).unwrap());
        }
    }

    #[test]
    fn test_identical_colors_ratio_one() {
        assert_eq!(contrast("#ABCDEF", "abcdef").unwrap().contrast_ratio, 1.0);
    }

    #[test]
    fn test_rejects_malformed_colors() {
        for bad in ["#FFF", "#GGGGGG", "", "#1234567", "##123456", "12 456"] {
            assert!(
                matches!(contrast(bad, "#FFFFFF"), Err(ContrastError::InvalidColorFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_known_brand_blue() {
        // #0066FF on white sits just above AA.
        let report = contrast("#0066FF", "#FFFFFF").unwrap();
        assert!(report.meets_aa);
        assert!(!report.meets_aaa);
    }

    #[test]
    fn test_adjust_reaches_target() {
        let adjusted = adjust_for_contrast("#60A5FA", "#FFFFFF", AA_NORMAL_TEXT, 100).unwrap();
        let report = contrast(&adjusted, "#FFFFFF").unwrap();
        assert!(report.meets_aa, "{adjusted} -> {}", report.contrast_ratio);
    }

    #[test]
    fn test_adjust_leaves_passing_color_alone() {
        assert_eq!(
            adjust_for_contrast("#000000", "#FFFFFF", AA_NORMAL_TEXT, 100).unwrap(),
            "#000000"
        );
    }

    #[test]
    fn test_shade_variations_clamp() {
        let shades = shade_variations("#F0F0F0").unwrap();
        assert_eq!(shades.lighter, "#FFFFFF");
        assert_eq!(shades.base, "#F0F0F0");
        assert_eq!(shades.darker, "#B4B4B4");
    }
}

//! Design Token Synthesizer
//!
//! Emits a DTCG-shaped token tree (`$value` / `$type` / `$description`).
//! Only brand colors and font families vary per brand; every other section is
//! a fixed scale so each package ships a complete, renderable token system.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::brand::BrandAnalysis;

pub const TOKEN_SCHEMA: &str = "https://design-tokens.org/schema/version/1.0.0";

const FALLBACK_PRIMARY: &str = "#0066FF";
const FALLBACK_SECONDARY: &str = "#9333EA";
const FALLBACK_ACCENT: &str = "#F97316";
const FALLBACK_FONT: &str = "Inter";

const SEMANTIC_COLORS: [(&str, &str); 4] = [
    ("success", "#10B981"),
    ("error", "#EF4444"),
    ("warning", "#F59E0B"),
    ("info", "#3B82F6"),
];

const NEUTRAL_SCALE: [(&str, &str); 10] = [
    ("50", "#FAFAFA"),
    ("100", "#F5F5F5"),
    ("200", "#E5E5E5"),
    ("300", "#D4D4D4"),
    ("400", "#A3A3A3"),
    ("500", "#737373"),
    ("600", "#525252"),
    ("700", "#404040"),
    ("800", "#262626"),
    ("900", "#171717"),
];

const FONT_SIZES: [(&str, &str); 9] = [
    ("xs", "0.75rem"),
    ("sm", "0.875rem"),
    ("base", "1rem"),
    ("lg", "1.125rem"),
    ("xl", "1.25rem"),
    ("2xl", "1.5rem"),
    ("3xl", "1.875rem"),
    ("4xl", "2.25rem"),
    ("5xl", "3rem"),
];

const FONT_WEIGHTS: [(&str, &str); 5] = [
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
    ("black", "900"),
];

const SPACING: [(&str, &str); 7] = [
    ("xs", "0.25rem"),
    ("sm", "0.5rem"),
    ("md", "1rem"),
    ("lg", "1.5rem"),
    ("xl", "2rem"),
    ("2xl", "2.5rem"),
    ("3xl", "3rem"),
];

const BORDER_RADIUS: [(&str, &str); 6] = [
    ("none", "0"),
    ("sm", "0.25rem"),
    ("md", "0.5rem"),
    ("lg", "1rem"),
    ("xl", "1.5rem"),
    ("full", "9999px"),
];

const SHADOWS: [(&str, &str); 4] = [
    ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
    ("md", "0 4px 6px -1px rgba(0, 0, 0, 0.1)"),
    ("lg", "0 10px 15px -3px rgba(0, 0, 0, 0.1)"),
    ("xl", "0 20px 25px -5px rgba(0, 0, 0, 0.1)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    FontFamily,
    FontWeight,
    Dimension,
    Shadow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "$value")]
    pub value: String,
    #[serde(rename = "$type")]
    pub token_type: TokenType,
    #[serde(rename = "$description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenNode {
    Token(Token),
    Group(BTreeMap<String, TokenNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokenTree {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(flatten)]
    pub groups: BTreeMap<String, TokenNode>,
}

impl DesignTokenTree {
    /// Look up a token by dotted path, e.g. `color.brand.primary`.
    pub fn get(&self, path: &str) -> Option<&Token> {
        let mut parts = path.split('.');
        let mut node = self.groups.get(parts.next()?)?;
        for part in parts {
            node = match node {
                TokenNode::Group(children) => children.get(part)?,
                TokenNode::Token(_) => return None,
            };
        }
        match node {
            TokenNode::Token(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    pub fn group(&self, name: &str) -> Option<&TokenNode> {
        self.groups.get(name)
    }
}

fn token(value: &str, token_type: TokenType) -> TokenNode {
    TokenNode::Token(Token {
        value: value.to_string(),
        token_type,
        description: None,
    })
}

fn described(value: &str, token_type: TokenType, description: &str) -> TokenNode {
    TokenNode::Token(Token {
        value: value.to_string(),
        token_type,
        description: Some(description.to_string()),
    })
}

fn scale(entries: &[(&str, &str)], token_type: TokenType) -> TokenNode {
    TokenNode::Group(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), token(v, token_type)))
            .collect(),
    )
}

fn group<const N: usize>(children: [(&str, TokenNode); N]) -> TokenNode {
    TokenNode::Group(
        children
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

pub fn synthesize(analysis: &BrandAnalysis) -> DesignTokenTree {
    let colors = &analysis.colors;
    let typography = &analysis.typography;

    let color = group([
        (
            "brand",
            group([
                (
                    "primary",
                    described(
                        or_fallback(&colors.primary, FALLBACK_PRIMARY),
                        TokenType::Color,
                        "Primary brand color",
                    ),
                ),
                (
                    "secondary",
                    described(
                        or_fallback(&colors.secondary, FALLBACK_SECONDARY),
                        TokenType::Color,
                        "Secondary brand color",
                    ),
                ),
                (
                    "accent",
                    described(
                        or_fallback(&colors.accent, FALLBACK_ACCENT),
                        TokenType::Color,
                        "Accent color",
                    ),
                ),
            ]),
        ),
        ("semantic", scale(&SEMANTIC_COLORS, TokenType::Color)),
        ("neutral", scale(&NEUTRAL_SCALE, TokenType::Color)),
    ]);

    let typography = group([
        (
            "font-family",
            group([
                (
                    "heading",
                    token(
                        or_fallback(&typography.heading, FALLBACK_FONT),
                        TokenType::FontFamily,
                    ),
                ),
                (
                    "body",
                    token(or_fallback(&typography.body, FALLBACK_FONT), TokenType::FontFamily),
                ),
            ]),
        ),
        ("font-size", scale(&FONT_SIZES, TokenType::Dimension)),
        ("font-weight", scale(&FONT_WEIGHTS, TokenType::FontWeight)),
    ]);

    let groups = [
        ("color", color),
        ("typography", typography),
        ("spacing", scale(&SPACING, TokenType::Dimension)),
        ("border-radius", scale(&BORDER_RADIUS, TokenType::Dimension)),
        ("shadow", scale(&SHADOWS, TokenType::Shadow)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    DesignTokenTree {
        schema: TOKEN_SCHEMA.to_string(),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandColors, Typography};

    fn analysis(primary: &str, heading: &str) -> BrandAnalysis {
        BrandAnalysis {
            name: "Brewline".to_string(),
            tagline: "Fresh beans, zero waste".to_string(),
            colors: BrandColors {
                primary: primary.to_string(),
                secondary: "#7C3AED".to_string(),
                accent: "#047857".to_string(),
                neutrals: vec![],
            },
            typography: Typography {
                heading: heading.to_string(),
                body: "Source Sans Pro".to_string(),
            },
            personality: vec![],
            target_audience: String::new(),
            messaging: vec![],
            visual_style: String::new(),
            contrast_report: None,
            palette_audit: None,
        }
    }

    #[test]
    fn test_brand_values_flow_through() {
        let tree = synthesize(&analysis("#1F2937", "Playfair Display"));
        assert_eq!(tree.get("color.brand.primary").unwrap().value, "#1F2937");
        assert_eq!(tree.get("typography.font-family.heading").unwrap().value, "Playfair Display");
        assert_eq!(
            tree.get("typography.font-family.heading").unwrap().token_type,
            TokenType::FontFamily
        );
    }

    #[test]
    fn test_fallbacks_for_blank_fields() {
        let tree = synthesize(&analysis("", "  "));
        assert_eq!(tree.get("color.brand.primary").unwrap().value, FALLBACK_PRIMARY);
        assert_eq!(tree.get("typography.font-family.heading").unwrap().value, FALLBACK_FONT);
    }

    #[test]
    fn test_fixed_sections_do_not_vary() {
        let a = synthesize(&analysis("#000000", "Inter"));
        let b = synthesize(&analysis("#FFFFFF", "Georgia"));
        for section in ["spacing", "border-radius", "shadow"] {
            assert_eq!(a.group(section), b.group(section), "{section} varied");
        }
        assert_eq!(a.get("color.neutral.900"), b.get("color.neutral.900"));
        assert_eq!(a.get("typography.font-size.5xl"), b.get("typography.font-size.5xl"));
    }

    #[test]
    fn test_serialized_shape() {
        let tree = synthesize(&analysis("#1F2937", "Inter"));
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["$schema"], TOKEN_SCHEMA);
        assert_eq!(value["color"]["semantic"]["error"]["$value"], "#EF4444");
        assert_eq!(value["shadow"]["sm"]["$type"], "shadow");
        assert!(value["spacing"]["md"].get("$description").is_none());
    }

    #[test]
    fn test_path_to_group_is_not_a_token() {
        let tree = synthesize(&analysis("#1F2937", "Inter"));
        assert!(tree.get("color.brand").is_none());
        assert!(tree.get("color.brand.primary.extra").is_none());
        assert!(tree.get("missing").is_none());
    }
}

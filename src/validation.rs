//! Palette Audit - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! The audit is advisory: it certifies a palette, it never rewrites one.

use serde::{Deserialize, Serialize};

use crate::brand::BrandColors;
use crate::contrast::{self, Rgb, AAA_NORMAL_TEXT, AA_NORMAL_TEXT};

pub const WHITE: &str = "#FFFFFF";

const ADJUST_MAX_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum WcagLevel {
    #[default]
    #[value(name = "aa")]
    AA,
    #[value(name = "aaa")]
    AAA,
}

impl WcagLevel {
    pub fn target_ratio(&self) -> f64 {
        match self {
            WcagLevel::AA => AA_NORMAL_TEXT,
            WcagLevel::AAA => AAA_NORMAL_TEXT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteAudit {
    pub valid: bool,
    pub level: WcagLevel,
    /// Lowest ratio against white among the brand colors that parsed.
    pub min_ratio: Option<f64>,
    pub violations: Vec<ValidationViolation>,
}

impl PaletteAudit {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Palette rule trait - produces violations
pub trait PaletteRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, colors: &BrandColors, level: WcagLevel) -> Vec<ValidationViolation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
}

impl ColorRole {
    fn label(&self) -> &'static str {
        match self {
            ColorRole::Primary => "Primary",
            ColorRole::Secondary => "Secondary",
            ColorRole::Accent => "Accent",
        }
    }

    fn pick<'a>(&self, colors: &'a BrandColors) -> &'a str {
        match self {
            ColorRole::Primary => &colors.primary,
            ColorRole::Secondary => &colors.secondary,
            ColorRole::Accent => &colors.accent,
        }
    }
}

// --- Concrete Rules ---

/// Brand color used as text on a white surface.
pub struct ContrastOnWhiteRule {
    role: ColorRole,
}

impl ContrastOnWhiteRule {
    pub fn new(role: ColorRole) -> Self {
        Self { role }
    }
}

impl PaletteRule for ContrastOnWhiteRule {
    fn name(&self) -> &'static str {
        match self.role {
            ColorRole::Primary => "primary_contrast",
            ColorRole::Secondary => "secondary_contrast",
            ColorRole::Accent => "accent_contrast",
        }
    }

    fn validate(&self, colors: &BrandColors, level: WcagLevel) -> Vec<ValidationViolation> {
        let color = self.role.pick(colors);
        let target = level.target_ratio();

        let report = match contrast::contrast(color, WHITE) {
            Ok(report) => report,
            Err(e) => {
                return vec![ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: e.to_string(),
                    expected: Some("#RRGGBB".to_string()),
                    actual: Some(color.to_string()),
                    remediation: vec![format!(
                        "Provide {} color as a 6-digit hex code",
                        self.role.label()
                    )],
                }];
            }
        };

        if report.contrast_ratio >= target {
            return vec![];
        }

        let mut remediation = vec![];
        if let Ok(adjusted) =
            contrast::adjust_for_contrast(color, WHITE, target, ADJUST_MAX_ITERATIONS)
        {
            remediation.push(format!("Use {} instead", adjusted));
        }
        remediation.push("Reserve this color for large text or decoration".to_string());

        vec![ValidationViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            message: format!(
                "{} color {} has insufficient contrast with white",
                self.role.label(),
                color
            ),
            expected: Some(format!("{:.1}:1", target)),
            actual: Some(format!("{:.2}:1", report.contrast_ratio)),
            remediation,
        }]
    }
}

pub struct NeutralFormatRule;

impl PaletteRule for NeutralFormatRule {
    fn name(&self) -> &'static str {
        "neutral_format"
    }

    fn validate(&self, colors: &BrandColors, _level: WcagLevel) -> Vec<ValidationViolation> {
        colors
            .neutrals
            .iter()
            .filter(|n| Rgb::parse(n).is_err())
            .map(|n| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: "Neutral is not a 6-digit hex color".to_string(),
                expected: Some("#RRGGBB".to_string()),
                actual: Some(n.clone()),
                remediation: vec!["Drop or replace the neutral".to_string()],
            })
            .collect()
    }
}

/// Runs every rule and folds the result into one audit.
pub struct PaletteValidator {
    rules: Vec<Box<dyn PaletteRule>>,
}

impl PaletteValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ContrastOnWhiteRule::new(ColorRole::Primary)),
                Box::new(ContrastOnWhiteRule::new(ColorRole::Secondary)),
                Box::new(ContrastOnWhiteRule::new(ColorRole::Accent)),
                Box::new(NeutralFormatRule),
            ],
        }
    }

    pub fn audit(&self, colors: &BrandColors, level: WcagLevel) -> PaletteAudit {
        let mut violations = vec![];
        for rule in &self.rules {
            violations.extend(rule.validate(colors, level));
        }

        let min_ratio = [ColorRole::Primary, ColorRole::Secondary, ColorRole::Accent]
            .iter()
            .filter_map(|role| contrast::contrast(role.pick(colors), WHITE).ok())
            .map(|r| r.contrast_ratio)
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.min(r))));

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        PaletteAudit {
            valid,
            level,
            min_ratio,
            violations,
        }
    }
}

impl Default for PaletteValidator {
    fn default() -> Self {
        Self::new()
    }
}

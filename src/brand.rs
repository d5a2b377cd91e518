//! Brand Data Model
//!
//! Requests come in, packages go out. Everything in between is owned by a
//! single pipeline run and never shared.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::contrast::ContrastReport;
use crate::error::Phase;
use crate::tokens::DesignTokenTree;
use crate::validation::PaletteAudit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Modern,
    Classic,
    Bold,
    Minimal,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Modern => "modern",
            Style::Classic => "classic",
            Style::Bold => "bold",
            Style::Minimal => "minimal",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
    pub target_audience: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub include_ai_logos: bool,
    #[serde(default)]
    pub include_ai_imagery: bool,
}

impl GenerationRequest {
    pub fn new(
        description: impl Into<String>,
        target_audience: impl Into<String>,
        style: Style,
    ) -> Self {
        Self {
            description: description.into(),
            target_audience: target_audience.into(),
            style,
            industry: None,
            subdomain: None,
            include_ai_logos: false,
            include_ai_imagery: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    #[serde(default)]
    pub neutrals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typography {
    pub heading: String,
    pub body: String,
}

/// Brand strategy as returned by the analysis producer.
///
/// `contrast_report` and `palette_audit` are computed locally; analyses that
/// come out of the pipeline always carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    pub colors: BrandColors,
    pub typography: Typography,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default, alias = "targetAudience")]
    pub target_audience: String,
    #[serde(default)]
    pub messaging: Vec<String>,
    #[serde(default, alias = "visualStyle")]
    pub visual_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast_report: Option<ContrastReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_audit: Option<PaletteAudit>,
}

/// Opaque image bytes; serialized as standard base64.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob(pub Vec<u8>);

impl ImageBlob {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map(ImageBlob)
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageBlob({} bytes)", self.0.len())
    }
}

impl Serialize for ImageBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for ImageBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        ImageBlob::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlCssLogo {
    pub html: String,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiLogoSet {
    pub images: Vec<ImageBlob>,
    pub method: String,
}

/// The markup logo is always present; the AI set only when requested and produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoSet {
    pub html_css: HtmlCssLogo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiLogoSet>,
}

pub const MOCKUP_BUSINESS_CARD: &str = "business_card";
pub const MOCKUP_SOCIAL_INSTAGRAM: &str = "social_instagram";
pub const MOCKUP_SOCIAL_LINKEDIN: &str = "social_linkedin";
pub const MOCKUP_WEBSITE_HERO: &str = "website_hero";
pub const MOCKUP_AI_IMAGERY: &str = "ai_imagery";

pub const MANDATORY_MOCKUP_KEYS: [&str; 4] = [
    MOCKUP_BUSINESS_CARD,
    MOCKUP_SOCIAL_INSTAGRAM,
    MOCKUP_SOCIAL_LINKEDIN,
    MOCKUP_WEBSITE_HERO,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MockupEntry {
    Single(ImageBlob),
    Many(Vec<ImageBlob>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockupSet(BTreeMap<String, MockupEntry>);

impl MockupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_single(&mut self, key: impl Into<String>, image: ImageBlob) {
        self.0.insert(key.into(), MockupEntry::Single(image));
    }

    pub fn insert_many(&mut self, key: impl Into<String>, images: Vec<ImageBlob>) {
        self.0.insert(key.into(), MockupEntry::Many(images));
    }

    pub fn get(&self, key: &str) -> Option<&MockupEntry> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_mandatory_keys(&self) -> bool {
        MANDATORY_MOCKUP_KEYS.iter().all(|k| self.contains(k))
    }
}

/// An optional phase that failed and whose artifact was omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedPhase {
    pub phase: Phase,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub run_id: Uuid,
    pub engine_version: String,
    pub elapsed_seconds: f64,
    pub start_timestamp: DateTime<Utc>,
    pub style: Style,
    #[serde(default)]
    pub industry: Option<String>,
    pub includes_ai_logos: bool,
    pub includes_ai_imagery: bool,
    pub request_hash: String,
    #[serde(default)]
    pub degraded: Vec<DegradedPhase>,
}

/// Terminal artifact of a pipeline run. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandPackage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subdomain: Option<String>,
    pub analysis: BrandAnalysis,
    pub logos: LogoSet,
    pub mockups: MockupSet,
    pub tokens: DesignTokenTree,
    pub metadata: PackageMetadata,
    pub content_hash: String,
}

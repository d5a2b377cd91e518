//! Artifact Assembler
//!
//! Folds phase outputs into the immutable `BrandPackage`. No I/O.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::brand::{
    BrandAnalysis, BrandPackage, DegradedPhase, GenerationRequest, LogoSet, MockupSet,
    PackageMetadata,
};
use crate::hashing::{compute_content_hash, compute_request_hash};
use crate::tokens::DesignTokenTree;
use crate::ENGINE_VERSION;

/// When and under which id a run started.
#[derive(Debug, Clone, Copy)]
pub struct RunStart {
    pub run_id: Uuid,
    pub at: DateTime<Utc>,
    clock: Instant,
}

impl RunStart {
    pub fn now() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            at: Utc::now(),
            clock: Instant::now(),
        }
    }

    /// Fixed start time, for replaying a run.
    pub fn at(run_id: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            at,
            clock: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }
}

/// Lowercase, non-alphanumeric runs collapsed to one `-`, trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("brand");
    }
    slug
}

pub fn package_id(name: &str, started: &DateTime<Utc>) -> String {
    format!("{}-{}", slugify(name), started.timestamp())
}

#[derive(Serialize)]
struct PackageContent<'a> {
    analysis: &'a BrandAnalysis,
    logos: &'a LogoSet,
    mockups: &'a MockupSet,
    tokens: &'a DesignTokenTree,
}

pub fn assemble(
    request: &GenerationRequest,
    analysis: BrandAnalysis,
    logos: LogoSet,
    mockups: MockupSet,
    tokens: DesignTokenTree,
    start: &RunStart,
    degraded: Vec<DegradedPhase>,
) -> BrandPackage {
    // Both hashes cover plain data structures, which always serialize.
    let content_hash = compute_content_hash(&PackageContent {
        analysis: &analysis,
        logos: &logos,
        mockups: &mockups,
        tokens: &tokens,
    })
    .unwrap_or_default();
    let request_hash = compute_request_hash(request, ENGINE_VERSION).unwrap_or_default();

    BrandPackage {
        id: package_id(&analysis.name, &start.at),
        name: analysis.name.clone(),
        subdomain: request.subdomain.clone(),
        metadata: PackageMetadata {
            run_id: start.run_id,
            engine_version: ENGINE_VERSION.to_string(),
            elapsed_seconds: start.elapsed_seconds(),
            start_timestamp: start.at,
            style: request.style,
            industry: request.industry.clone(),
            includes_ai_logos: request.include_ai_logos,
            includes_ai_imagery: request.include_ai_imagery,
            request_hash,
            degraded,
        },
        analysis,
        logos,
        mockups,
        tokens,
        content_hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandColors, HtmlCssLogo, ImageBlob, Style, Typography};
    use crate::tokens::synthesize;
    use chrono::TimeZone;

    fn analysis() -> BrandAnalysis {
        BrandAnalysis {
            name: "Bean & Bike".to_string(),
            tagline: "Coffee at pedal speed".to_string(),
            colors: BrandColors {
                primary: "#1F2937".to_string(),
                secondary: "#7C3AED".to_string(),
                accent: "#047857".to_string(),
                neutrals: vec![],
            },
            typography: Typography {
                heading: "Inter".to_string(),
                body: "Inter".to_string(),
            },
            personality: vec!["bold".to_string()],
            target_audience: "urban professionals".to_string(),
            messaging: vec![],
            visual_style: "modern".to_string(),
            contrast_report: None,
            palette_audit: None,
        }
    }

    fn logos() -> LogoSet {
        LogoSet {
            html_css: HtmlCssLogo {
                html: "<div>Bean & Bike</div>".to_string(),
                css: ".logo{}".to_string(),
            },
            ai: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Bean & Bike"), "bean-bike");
        assert_eq!(slugify("  GONADS.io  "), "gonads-io");
        assert_eq!(slugify("Café Noir"), "café-noir");
        assert_eq!(slugify("!!!"), "brand");
    }

    #[test]
    fn test_id_uses_floor_of_start_seconds() {
        let at = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        assert_eq!(package_id("Bean & Bike", &at), "bean-bike-1700000000");
    }

    #[test]
    fn test_assemble_fills_metadata() {
        let mut request = GenerationRequest::new(
            "Sustainable coffee delivery",
            "urban professionals",
            Style::Bold,
        );
        request.subdomain = Some("beanbike".to_string());
        let start = RunStart::at(Uuid::nil(), Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let analysis = analysis();
        let tokens = synthesize(&analysis);
        let mut mockups = MockupSet::new();
        mockups.insert_single("business_card", ImageBlob(vec![1, 2, 3]));

        let package = assemble(&request, analysis, logos(), mockups, tokens, &start, vec![]);

        assert_eq!(package.id, "bean-bike-1700000000");
        assert_eq!(package.name, "Bean & Bike");
        assert_eq!(package.subdomain.as_deref(), Some("beanbike"));
        assert_eq!(package.metadata.style, Style::Bold);
        assert!(package.metadata.elapsed_seconds >= 0.0);
        assert_eq!(package.metadata.engine_version, ENGINE_VERSION);
        assert_eq!(package.content_hash.len(), 64);
        assert_eq!(package.metadata.request_hash.len(), 64);
    }

    #[test]
    fn test_content_hash_ignores_run_metadata() {
        let request = GenerationRequest::new(
            "Sustainable coffee delivery",
            "urban professionals",
            Style::Modern,
        );
        let build = |run_id: Uuid, secs: i64| {
            let analysis = analysis();
            let tokens = synthesize(&analysis);
            let start = RunStart::at(run_id, Utc.timestamp_opt(secs, 0).unwrap());
            assemble(&request, analysis, logos(), MockupSet::new(), tokens, &start, vec![])
        };
        let a = build(Uuid::new_v4(), 1_700_000_000);
        let b = build(Uuid::new_v4(), 1_800_000_000);
        assert_ne!(a.id, b.id);
        assert_eq!(a.content_hash, b.content_hash);
    }
}

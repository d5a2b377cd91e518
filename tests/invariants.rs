//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees through the public API.

use brandforge_core::{
    assembly::{assemble, package_id, slugify, RunStart},
    brand::{HtmlCssLogo, ImageBlob, LogoSet, MockupSet, MANDATORY_MOCKUP_KEYS},
    canonical_json, contrast, synthesize, BrandAnalysis, BrandColors, ContrastError,
    GenerationRequest, PaletteValidator, Style, Typography, WcagLevel,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn create_analysis(primary: &str) -> BrandAnalysis {
    BrandAnalysis {
        name: "Bean & Bike".to_string(),
        tagline: "Coffee at pedal speed".to_string(),
        colors: BrandColors {
            primary: primary.to_string(),
            secondary: "#7C3AED".to_string(),
            accent: "#047857".to_string(),
            neutrals: vec!["#FAFAFA".to_string(), "#171717".to_string()],
        },
        typography: Typography {
            heading: "Playfair Display".to_string(),
            body: "Inter".to_string(),
        },
        personality: vec!["warm".to_string()],
        target_audience: "urban professionals".to_string(),
        messaging: vec![],
        visual_style: "earthy modern".to_string(),
        contrast_report: None,
        palette_audit: None,
    }
}

#[test]
fn invariant_contrast_is_symmetric_and_bounded() {
    let colors = ["#000000", "#FFFFFF", "#0066FF", "#7C3AED", "#777777", "#F97316"];
    for a in colors {
        for b in colors {
            let ab = contrast(a, b).unwrap();
            let ba = contrast(b, a).unwrap();
            assert_eq!(ab, ba, "{} vs {}", a, b);
            assert!(ab.contrast_ratio >= 1.0 && ab.contrast_ratio <= 21.0);
            // AAA implies AA
            assert!(!ab.meets_aaa || ab.meets_aa);
        }
    }
}

#[test]
fn invariant_contrast_known_values() {
    assert_eq!(contrast("#000000", "#FFFFFF").unwrap().contrast_ratio, 21.0);
    assert_eq!(contrast("#ABCDEF", "#abcdef").unwrap().contrast_ratio, 1.0);

    let blue = contrast("#0066FF", "#FFFFFF").unwrap();
    assert!(blue.meets_aa);
    assert!(!blue.meets_aaa);
}

#[test]
fn invariant_contrast_rejects_malformed_colors() {
    for bad in ["#FFF", "GGGGGG", "#12345", "", "##FFFFFF", "#1234567"] {
        assert!(
            matches!(contrast(bad, "#FFFFFF"), Err(ContrastError::InvalidColorFormat(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn invariant_tokens_deterministic() {
    let analysis = create_analysis("#1F2937");
    let first = canonical_json(&synthesize(&analysis)).unwrap();
    let second = canonical_json(&synthesize(&analysis)).unwrap();

    // Byte-identical across invocations
    assert_eq!(first, second);
}

#[test]
fn invariant_token_fixed_sections_ignore_brand() {
    let a = synthesize(&create_analysis("#1F2937"));
    let b = synthesize(&create_analysis("#B91C1C"));

    for group in ["spacing", "border-radius", "shadow"] {
        assert_eq!(a.group(group), b.group(group), "{} must not vary by brand", group);
    }
    assert_eq!(
        a.get("color.brand.primary").map(|t| t.value.as_str()),
        Some("#1F2937")
    );
    assert_eq!(
        b.get("color.brand.primary").map(|t| t.value.as_str()),
        Some("#B91C1C")
    );
}

#[test]
fn invariant_canonical_json_deterministic() {
    use serde_json::json;

    let obj1 = json!({"z": 1, "a": 2, "m": {"b": 1, "a": 2}});
    let obj2 = json!({"a": 2, "m": {"a": 2, "b": 1}, "z": 1});

    // Must be identical despite different input ordering
    assert_eq!(canonical_json(&obj1).unwrap(), canonical_json(&obj2).unwrap());
}

#[test]
fn invariant_audit_is_advisory() {
    let mut analysis = create_analysis("#93C5FD");
    let before = analysis.colors.clone();
    let audit = PaletteValidator::new().audit(&analysis.colors, WcagLevel::AA);

    assert!(!audit.valid);
    assert!(!audit.violations.is_empty());
    for v in &audit.violations {
        assert!(!v.rule.is_empty());
        assert!(!v.message.is_empty());
    }
    // Never rewrites the palette
    analysis.palette_audit = Some(audit);
    assert_eq!(analysis.colors, before);
}

#[test]
fn invariant_package_id_derived_from_name_and_start() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(package_id("Bean & Bike", &at), format!("bean-bike-{}", at.timestamp()));
    assert_eq!(slugify("  --  "), "brand");
    assert_eq!(slugify("Nova Labs 2"), "nova-labs-2");
}

#[test]
fn invariant_assembly_is_stable_for_fixed_start() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let start = RunStart::at(Uuid::nil(), at);
    let request = GenerationRequest::new("Coffee by bicycle", "commuters", Style::Bold);
    let analysis = create_analysis("#1F2937");

    let mut mockups = MockupSet::new();
    for key in MANDATORY_MOCKUP_KEYS {
        mockups.insert_single(key, ImageBlob(vec![0x89, 0x50]));
    }
    let logos = LogoSet {
        html_css: HtmlCssLogo {
            html: "<div>Bean &amp; Bike</div>".to_string(),
            css: ".logo {}".to_string(),
        },
        ai: None,
    };
    let tokens = synthesize(&analysis);

    let first = assemble(
        &request,
        analysis.clone(),
        logos.clone(),
        mockups.clone(),
        tokens.clone(),
        &start,
        vec![],
    );
    let second = assemble(&request, analysis, logos, mockups, tokens, &start, vec![]);

    assert_eq!(first.id, second.id);
    assert_eq!(first.content_hash, second.content_hash);
    assert_eq!(first.metadata.request_hash, second.metadata.request_hash);
    assert_eq!(first.metadata.style, Style::Bold);
    assert!(first.mockups.has_mandatory_keys());
}

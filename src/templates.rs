//! Mockup Templates - Enforceable Contracts
//!
//! Each mockup kind renders at a fixed pixel size and maps to a fixed key in
//! the package's mockup set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::brand::{
    MOCKUP_BUSINESS_CARD, MOCKUP_SOCIAL_INSTAGRAM, MOCKUP_SOCIAL_LINKEDIN, MOCKUP_WEBSITE_HERO,
};

pub const AI_LOGO_SIZE: [u32; 2] = [512, 512];
pub const AI_IMAGERY_SIZE: [u32; 2] = [1024, 1024];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockupKind {
    BusinessCard,
    Instagram,
    Linkedin,
    Twitter,
    Facebook,
    WebsiteHero,
}

impl MockupKind {
    /// Kinds every package must contain.
    pub const MANDATORY: [MockupKind; 4] = [
        MockupKind::BusinessCard,
        MockupKind::Instagram,
        MockupKind::Linkedin,
        MockupKind::WebsiteHero,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MockupKind::BusinessCard => MOCKUP_BUSINESS_CARD,
            MockupKind::Instagram => MOCKUP_SOCIAL_INSTAGRAM,
            MockupKind::Linkedin => MOCKUP_SOCIAL_LINKEDIN,
            MockupKind::Twitter => "social_twitter",
            MockupKind::Facebook => "social_facebook",
            MockupKind::WebsiteHero => MOCKUP_WEBSITE_HERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupTemplate {
    pub kind: MockupKind,
    pub description: String,
    pub canonical_size: [u32; 2],
    /// Headline with `{name}` substituted by the brand name.
    #[serde(default)]
    pub headline: Option<String>,
}

impl MockupTemplate {
    pub fn builtin(kind: MockupKind) -> Self {
        let (description, size, headline) = match kind {
            MockupKind::BusinessCard => ("Business card, front", [1050, 600], None),
            MockupKind::Instagram => ("Instagram post", [1080, 1080], Some("Introducing {name}")),
            MockupKind::Linkedin => ("LinkedIn post", [1200, 628], Some("Welcome to {name}")),
            MockupKind::Twitter => ("Twitter post", [1200, 675], Some("Introducing {name}")),
            MockupKind::Facebook => ("Facebook post", [1200, 630], Some("Introducing {name}")),
            MockupKind::WebsiteHero => (
                "Website hero section",
                [1920, 1080],
                Some("Welcome to {name}"),
            ),
        };
        Self {
            kind,
            description: description.to_string(),
            canonical_size: size,
            headline: headline.map(str::to_string),
        }
    }

    pub fn headline_for(&self, brand_name: &str) -> Option<String> {
        self.headline.as_ref().map(|h| h.replace("{name}", brand_name))
    }
}

/// Template registry - built-ins plus any overrides loaded from disk
pub struct TemplateRegistry {
    templates: HashMap<MockupKind, MockupTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self { templates: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in [
            MockupKind::BusinessCard,
            MockupKind::Instagram,
            MockupKind::Linkedin,
            MockupKind::Twitter,
            MockupKind::Facebook,
            MockupKind::WebsiteHero,
        ] {
            registry.register(MockupTemplate::builtin(kind));
        }
        registry
    }

    /// Built-ins overridden by every `*.json` template in `dir`.
    /// Files that fail to parse are skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::builtin();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "json") {
                    if let Ok(content) = fs::read_to_string(&path) {
                        match serde_json::from_str::<MockupTemplate>(&content) {
                            Ok(template) => registry.register(template),
                            Err(e) => tracing::warn!(
                                path = %path.display(),
                                error = %e,
                                "Skipping unreadable mockup template"
                            ),
                        }
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, kind: MockupKind) -> Option<&MockupTemplate> {
        self.templates.get(&kind)
    }

    /// Registered template, or the built-in when none is registered.
    pub fn resolve(&self, kind: MockupKind) -> MockupTemplate {
        self.get(kind)
            .cloned()
            .unwrap_or_else(|| MockupTemplate::builtin(kind))
    }

    pub fn list(&self) -> Vec<&MockupTemplate> {
        self.templates.values().collect()
    }

    pub fn register(&mut self, template: MockupTemplate) {
        self.templates.insert(template.kind, template);
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_keys_match_package_contract() {
        let keys: Vec<_> = MockupKind::MANDATORY.iter().map(|k| k.key()).collect();
        assert_eq!(keys, crate::brand::MANDATORY_MOCKUP_KEYS.to_vec());
    }

    #[test]
    fn test_platform_dimensions() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.resolve(MockupKind::BusinessCard).canonical_size, [1050, 600]);
        assert_eq!(registry.resolve(MockupKind::Instagram).canonical_size, [1080, 1080]);
        assert_eq!(registry.resolve(MockupKind::Linkedin).canonical_size, [1200, 628]);
        assert_eq!(registry.resolve(MockupKind::WebsiteHero).canonical_size, [1920, 1080]);
    }

    #[test]
    fn test_headline_substitution() {
        let t = MockupTemplate::builtin(MockupKind::Instagram);
        assert_eq!(t.headline_for("Brewline").as_deref(), Some("Introducing Brewline"));
        assert!(MockupTemplate::builtin(MockupKind::BusinessCard)
            .headline_for("Brewline")
            .is_none());
    }

    #[test]
    fn test_load_overrides_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hero.json"),
            r#"{"kind": "website_hero", "description": "Retina hero",
                "canonicalSize": [3840, 2160]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let registry = TemplateRegistry::load_from_dir(dir.path()).unwrap();
        let hero = registry.resolve(MockupKind::WebsiteHero);
        assert_eq!(hero.canonical_size, [3840, 2160]);
        assert!(hero.headline.is_none());
        assert_eq!(registry.list().len(), 6);
    }

    #[test]
    fn test_empty_registry_resolves_builtin() {
        let registry = TemplateRegistry::new();
        assert_eq!(
            registry.resolve(MockupKind::Linkedin),
            MockupTemplate::builtin(MockupKind::Linkedin)
        );
    }
}

//! Analysis adapter: brief -> prompt -> model text -> `BrandAnalysis`.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AnalysisBrief, BrandAnalyzer};
use crate::brand::BrandAnalysis;
use crate::error::AdapterError;

/// Single-turn text completion backend (an LLM behind some API).
#[async_trait]
pub trait TextCompleter: Send + Sync {
    fn producer_id(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String, AdapterError>;
}

pub fn build_prompt(brief: &AnalysisBrief) -> String {
    let industry = brief
        .industry
        .as_deref()
        .map(|i| format!("Industry: {}\n", i))
        .unwrap_or_default();

    format!(
        r##"You are a senior brand strategist. Build a brand strategy for the business below.

Business: {description}
Target audience: {audience}
Style: {style}
{industry}
Provide:
1. A memorable brand name of one or two words
2. A tagline under 60 characters
3. Primary, secondary and accent colors plus 5-7 neutrals, all as #RRGGBB
4. A heading font family and a body font family
5. Five personality adjectives
6. A detailed target audience profile
7. Three to five key messaging points
8. A visual style direction

Text colors must reach WCAG AA contrast (4.5:1) against white.

Reply with JSON only, in exactly this shape:
{{
  "name": "string",
  "tagline": "string",
  "colors": {{
    "primary": "#RRGGBB",
    "secondary": "#RRGGBB",
    "accent": "#RRGGBB",
    "neutrals": ["#RRGGBB"]
  }},
  "typography": {{ "heading": "font", "body": "font" }},
  "personality": ["adjective"],
  "target_audience": "string",
  "messaging": ["string"],
  "visual_style": "string"
}}"##,
        description = brief.description.trim(),
        audience = brief.target_audience.trim(),
        style = brief.style,
        industry = industry,
    )
}

/// The structured payload inside a model reply.
///
/// Prefers the first ```` ```json ```` block, then the first fenced block of
/// any kind, then the whole reply. An unterminated fence runs to the end.
pub fn extract_payload(raw: &str) -> &str {
    fenced_block(raw, "```json")
        .or_else(|| fenced_block(raw, "```"))
        .unwrap_or_else(|| raw.trim())
}

fn fenced_block<'a>(raw: &'a str, opener: &str) -> Option<&'a str> {
    let start = raw.find(opener)? + opener.len();
    let mut body = &raw[start..];

    // Skip an info string such as `JSON` or `javascript` on the fence line.
    if let Some(newline) = body.find('\n') {
        let tag = body[..newline].trim();
        if tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            body = &body[newline + 1..];
        }
    }

    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

pub fn parse_analysis(raw: &str) -> Result<BrandAnalysis, AdapterError> {
    let payload = extract_payload(raw);
    let mut analysis: BrandAnalysis = serde_json::from_str(payload).map_err(|e| {
        AdapterError::MalformedOutput(format!("analysis is not a valid record: {}", e))
    })?;

    let required = [
        ("name", analysis.name.as_str()),
        ("colors.primary", analysis.colors.primary.as_str()),
        ("colors.secondary", analysis.colors.secondary.as_str()),
        ("colors.accent", analysis.colors.accent.as_str()),
        ("typography.heading", analysis.typography.heading.as_str()),
        ("typography.body", analysis.typography.body.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(AdapterError::MalformedOutput(format!(
            "analysis is missing required field {}",
            field
        )));
    }

    // Computed locally, never trusted from the producer.
    analysis.contrast_report = None;
    analysis.palette_audit = None;
    Ok(analysis)
}

/// `BrandAnalyzer` over any text completer.
pub struct LlmAnalyzer {
    completer: Arc<dyn TextCompleter>,
}

impl LlmAnalyzer {
    pub fn new(completer: Arc<dyn TextCompleter>) -> Self {
        Self { completer }
    }
}

#[async_trait]
impl BrandAnalyzer for LlmAnalyzer {
    fn producer_id(&self) -> &'static str {
        self.completer.producer_id()
    }

    async fn analyze(&self, brief: &AnalysisBrief) -> Result<BrandAnalysis, AdapterError> {
        let prompt = build_prompt(brief);
        let reply = self.completer.complete(&prompt).await?;
        tracing::debug!(
            producer = self.completer.producer_id(),
            prompt_chars = prompt.len(),
            reply_chars = reply.len(),
            "Analysis reply received"
        );
        parse_analysis(&reply)
    }
}

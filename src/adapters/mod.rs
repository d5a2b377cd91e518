//! Producer Adapters
//!
//! One trait per external capability. Every call is a single independent
//! request/response: no retries, no state carried between invocations.
//! Implementations map their own failures onto `AdapterError`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::brand::{BrandAnalysis, HtmlCssLogo, ImageBlob, Style};
use crate::error::AdapterError;
use crate::templates::MockupKind;

pub mod analysis;
pub mod claude;
pub mod logo;
pub mod remote;

pub use analysis::{extract_payload, parse_analysis, LlmAnalyzer, TextCompleter};
pub use claude::ClaudeClient;
pub use logo::HtmlCssLogoRenderer;
pub use remote::RemoteRenderer;

/// Inputs the analysis producer works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisBrief {
    pub description: String,
    pub target_audience: String,
    pub style: Style,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoSpec {
    pub brand_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePurpose {
    Logo,
    Hero,
    Product,
    Abstract,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub purpose: ImagePurpose,
    pub prompt: String,
    pub negative_prompt: String,
    pub style: Style,
    pub count: u32,
    pub size: [u32; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockupRequest {
    pub kind: MockupKind,
    pub size: [u32; 2],
    pub brand_name: String,
    pub tagline: String,
    pub logo: HtmlCssLogo,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_heading: String,
    pub font_body: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subheadline: Option<String>,
}

/// Turns a brief into a parsed brand analysis.
#[async_trait]
pub trait BrandAnalyzer: Send + Sync {
    fn producer_id(&self) -> &'static str;

    async fn analyze(&self, brief: &AnalysisBrief) -> Result<BrandAnalysis, AdapterError>;
}

/// Markup logos are cheap and local, so this one is synchronous.
pub trait LogoRenderer: Send + Sync {
    fn render(&self, spec: &LogoSpec) -> Result<HtmlCssLogo, AdapterError>;
}

/// Diffusion-style image producer used for AI logos and brand imagery.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn producer_id(&self) -> &'static str;

    /// Returns at least one image on success.
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<ImageBlob>, AdapterError>;
}

#[async_trait]
pub trait MockupRenderer: Send + Sync {
    async fn render(&self, request: &MockupRequest) -> Result<ImageBlob, AdapterError>;
}

/// Bound a producer call; elapsing maps to `AdapterError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, AdapterError>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AdapterError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, AdapterError>(())
        };
        assert_eq!(
            with_timeout(Duration::from_millis(10), slow).await,
            Err(AdapterError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let fast = async { Err::<(), _>(AdapterError::Transport("refused".into())) };
        assert_eq!(
            with_timeout(Duration::from_secs(1), fast).await,
            Err(AdapterError::Transport("refused".into()))
        );
    }
}

//! Process-wide configuration.
//!
//! Resolved once at start-up (TOML file, then environment) and handed to
//! adapter constructors. Nothing reads configuration after that.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_ANALYSIS_MODEL: &str = "BRANDFORGE_ANALYSIS_MODEL";
pub const ENV_RENDER_URL: &str = "BRANDFORGE_RENDER_URL";
pub const ENV_RENDER_TOKEN: &str = "BRANDFORGE_RENDER_TOKEN";
pub const ENV_RUN_TIMEOUT: &str = "BRANDFORGE_RUN_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub analysis: AnalysisConfig,
    pub render: RenderConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Remote render service hosting the GPU imagery and browser mockup endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub base_url: Option<String>,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub analysis_secs: u64,
    pub logo_secs: u64,
    pub imagery_secs: u64,
    pub mockup_secs: u64,
    pub run_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            analysis_secs: 300,
            logo_secs: 600,
            imagery_secs: 900,
            mockup_secs: 300,
            run_secs: 1800,
        }
    }
}

impl TimeoutConfig {
    pub fn analysis(&self) -> Duration {
        Duration::from_secs(self.analysis_secs)
    }

    pub fn logo(&self) -> Duration {
        Duration::from_secs(self.logo_secs)
    }

    pub fn imagery(&self) -> Duration {
        Duration::from_secs(self.imagery_secs)
    }

    pub fn mockup(&self) -> Duration {
        Duration::from_secs(self.mockup_secs)
    }

    pub fn run(&self) -> Duration {
        Duration::from_secs(self.run_secs)
    }
}

impl PipelineConfig {
    /// Load from an optional TOML file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Environment wins over file values. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.analysis.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_ANALYSIS_MODEL).filter(|v| !v.is_empty()) {
            self.analysis.model = model;
        }
        if let Some(url) = lookup(ENV_RENDER_URL).filter(|v| !v.is_empty()) {
            self.render.base_url = Some(url);
        }
        if let Some(token) = lookup(ENV_RENDER_TOKEN).filter(|v| !v.is_empty()) {
            self.render.auth_token = Some(token);
        }
        if let Some(raw) = lookup(ENV_RUN_TIMEOUT) {
            self.timeouts.run_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_RUN_TIMEOUT,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }
}

//! BrandForge Core - Brand Identity Compiler
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Complete Or Nothing: a run returns a whole package or one phase error
//! 2. Contrast Is Measured, Never Guessed
//! 3. Tokens Are Deterministic
//! 4. Optional Phases Degrade, Mandatory Phases Fail
//! 5. Producers Suggest, Engine Enforces

pub mod adapters;
pub mod assembly;
pub mod brand;
pub mod config;
pub mod contrast;
pub mod error;
pub mod hashing;
pub mod pipeline;
pub mod progress;
pub mod templates;
pub mod tokens;
pub mod validation;

pub use brand::{BrandAnalysis, BrandColors, BrandPackage, GenerationRequest, Style, Typography};
pub use config::PipelineConfig;
pub use contrast::{contrast, ContrastReport};
pub use error::{AdapterError, ConfigError, ContrastError, Phase, PipelineError};
pub use hashing::{canonical_json, compute_content_hash, compute_request_hash};
pub use pipeline::{BrandPipeline, OptionalOutcome};
pub use progress::{progress_channel, ProgressStage, RunProgress};
pub use tokens::{synthesize, DesignTokenTree};
pub use validation::{
    PaletteAudit, PaletteValidator, ValidationViolation, ViolationSeverity, WcagLevel,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

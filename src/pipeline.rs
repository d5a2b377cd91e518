//! Brand Pipeline - Single Entry Point
//!
//! CRITICAL: every run goes analysis -> logos -> mockups -> imagery -> tokens
//! -> assembly. A caller gets a complete package or one error naming the phase.
//! Optional phases (AI logos, AI imagery) degrade; mandatory phases do not.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::adapters::{
    AnalysisBrief, BrandAnalyzer, ClaudeClient, HtmlCssLogoRenderer, ImageGenerator, ImagePurpose,
    ImageRequest, LlmAnalyzer, LogoRenderer, LogoSpec, MockupRenderer, MockupRequest,
    RemoteRenderer,
};
use crate::assembly::{assemble, RunStart};
use crate::brand::{
    AiLogoSet, BrandAnalysis, BrandPackage, DegradedPhase, GenerationRequest, HtmlCssLogo,
    ImageBlob, LogoSet, MockupSet, Style, MOCKUP_AI_IMAGERY,
};
use crate::config::{PipelineConfig, TimeoutConfig};
use crate::contrast::contrast;
use crate::error::{AdapterError, ConfigError, Phase, PipelineError};
use crate::progress::{ProgressReporter, ProgressStage, RunProgress};
use crate::templates::{MockupKind, TemplateRegistry, AI_IMAGERY_SIZE, AI_LOGO_SIZE};
use crate::tokens::synthesize;
use crate::validation::{PaletteValidator, WcagLevel, WHITE};

pub const AI_LOGO_VARIATIONS: u32 = 3;
pub const AI_IMAGERY_VARIATIONS: u32 = 2;
pub const AI_LOGO_METHOD: &str = "stable-diffusion";

const LOGO_NEGATIVE_PROMPT: &str = "blurry, low quality, pixelated, text, words, letters, \
    watermark, signature, photo-realistic, 3d render, cluttered, busy, gradient mesh, photographic";

const IMAGERY_NEGATIVE_PROMPT: &str = "blurry, low quality, pixelated, grainy, noisy, text, \
    words, letters, watermark, signature, cluttered, messy, amateur, cheap, ugly, distorted";

const DEFAULT_VISUAL_STYLE: &str = "modern minimalist";

/// Result of an optional phase, caught at the phase boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalOutcome<T> {
    NotRequested,
    Succeeded(T),
    Failed(AdapterError),
}

impl<T> OptionalOutcome<T> {
    fn from_result(result: Result<T, AdapterError>) -> Self {
        match result {
            Ok(value) => OptionalOutcome::Succeeded(value),
            Err(e) => OptionalOutcome::Failed(e),
        }
    }

    pub fn succeeded(self) -> Option<T> {
        match self {
            OptionalOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&AdapterError> {
        match self {
            OptionalOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// The brand pipeline - owns the adapters, never any per-run state.
pub struct BrandPipeline {
    analyzer: Arc<dyn BrandAnalyzer>,
    logo_renderer: Arc<dyn LogoRenderer>,
    image_generator: Arc<dyn ImageGenerator>,
    mockup_renderer: Arc<dyn MockupRenderer>,
    templates: TemplateRegistry,
    validator: PaletteValidator,
    run_timeout: Duration,
    progress: Option<broadcast::Sender<RunProgress>>,
}

impl BrandPipeline {
    pub fn new(
        analyzer: Arc<dyn BrandAnalyzer>,
        logo_renderer: Arc<dyn LogoRenderer>,
        image_generator: Arc<dyn ImageGenerator>,
        mockup_renderer: Arc<dyn MockupRenderer>,
    ) -> Self {
        Self {
            analyzer,
            logo_renderer,
            image_generator,
            mockup_renderer,
            templates: TemplateRegistry::default(),
            validator: PaletteValidator::new(),
            run_timeout: TimeoutConfig::default().run(),
            progress: None,
        }
    }

    /// Claude for analysis, local markup logos, the remote render service for
    /// everything else.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let completer = Arc::new(ClaudeClient::new(&config.analysis, &config.timeouts)?);
        let remote = Arc::new(RemoteRenderer::new(&config.render, &config.timeouts)?);

        Ok(Self::new(
            Arc::new(LlmAnalyzer::new(completer)),
            Arc::new(HtmlCssLogoRenderer::new()),
            remote.clone(),
            remote,
        )
        .with_run_timeout(config.timeouts.run()))
    }

    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_run_timeout(mut self, limit: Duration) -> Self {
        self.run_timeout = limit;
        self
    }

    /// Send run progress to `tx`. Events are dropped when nobody listens.
    pub fn with_progress(mut self, tx: broadcast::Sender<RunProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Run with the configured whole-run timeout.
    pub async fn run(&self, request: &GenerationRequest) -> Result<BrandPackage, PipelineError> {
        self.run_with_timeout(request, self.run_timeout).await
    }

    /// Elapsing the limit cancels the run; the error phase is `cancelled`.
    /// Dropping the returned future drops the whole run, timer included.
    pub async fn run_with_timeout(
        &self,
        request: &GenerationRequest,
        limit: Duration,
    ) -> Result<BrandPackage, PipelineError> {
        let cancel = CancellationToken::new();
        let run = self.run_with_cancel(request, cancel.clone());
        tokio::pin!(run);

        tokio::select! {
            result = &mut run => result,
            _ = tokio::time::sleep(limit) => {
                tracing::warn!(limit_secs = limit.as_secs_f64(), "Run timeout elapsed, cancelling");
                cancel.cancel();
                run.await
            }
        }
    }

    /// Cancelling `cancel` drops every in-flight adapter call and ends the run
    /// with `PipelineError { phase: Cancelled }`.
    pub async fn run_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<BrandPackage, PipelineError> {
        let start = RunStart::now();
        let progress = ProgressReporter::new(self.progress.clone(), start.run_id);
        let span = tracing::info_span!("brand_run", run_id = %start.run_id);

        let result = self
            .execute(request, &start, &cancel, &progress)
            .instrument(span)
            .await;
        if let Err(e) = &result {
            progress.fail(e.to_string());
        }
        result
    }

    async fn execute(
        &self,
        request: &GenerationRequest,
        start: &RunStart,
        cancel: &CancellationToken,
        progress: &ProgressReporter,
    ) -> Result<BrandPackage, PipelineError> {
        tracing::info!(
            style = %request.style,
            ai_logos = request.include_ai_logos,
            ai_imagery = request.include_ai_imagery,
            "Starting brand run"
        );
        let mut degraded = Vec::new();

        progress.emit(ProgressStage::Analysis, 5, "Analyzing brand brief");
        let phase_start = Instant::now();
        let analysis = self.phase_analysis(request, cancel).await?;
        log_phase(Phase::Analysis, phase_start);
        progress.emit(
            ProgressStage::Analysis,
            20,
            format!("Brand strategy ready for {}", analysis.name),
        );

        progress.emit(ProgressStage::Logos, 20, "Rendering logos");
        let phase_start = Instant::now();
        let (html_css, ai_logos) = self.phase_logos(request, &analysis, cancel).await?;
        record_degraded(Phase::Logos, &ai_logos, &mut degraded);
        let logos = LogoSet {
            html_css,
            ai: ai_logos.succeeded().map(|images| AiLogoSet {
                images,
                method: AI_LOGO_METHOD.to_string(),
            }),
        };
        log_phase(Phase::Logos, phase_start);
        progress.emit(ProgressStage::Logos, 35, "Logos ready");

        progress.emit(ProgressStage::Mockups, 35, "Rendering mockups");
        let phase_start = Instant::now();
        let mut mockups = self.phase_mockups(&analysis, &logos.html_css, cancel).await?;
        log_phase(Phase::Mockups, phase_start);
        progress.emit(ProgressStage::Mockups, 70, "Mockups ready");

        progress.emit(ProgressStage::Imagery, 70, "Generating imagery");
        let phase_start = Instant::now();
        let imagery = self.phase_imagery(request, &analysis, cancel).await?;
        record_degraded(Phase::Imagery, &imagery, &mut degraded);
        if let Some(images) = imagery.succeeded() {
            mockups.insert_many(MOCKUP_AI_IMAGERY, images);
        }
        log_phase(Phase::Imagery, phase_start);
        progress.emit(ProgressStage::Imagery, 85, "Imagery phase finished");

        progress.emit(ProgressStage::Tokens, 85, "Synthesizing design tokens");
        let tokens = synthesize(&analysis);

        if cancel.is_cancelled() {
            return Err(PipelineError::cancelled());
        }

        let package = assemble(request, analysis, logos, mockups, tokens, start, degraded);
        tracing::info!(
            package_id = %package.id,
            elapsed_seconds = package.metadata.elapsed_seconds,
            degraded = package.metadata.degraded.len(),
            "Brand run complete"
        );
        progress.emit(ProgressStage::Complete, 100, format!("Brand package {} ready", package.id));
        Ok(package)
    }

    async fn phase_analysis(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<BrandAnalysis, PipelineError> {
        let brief = AnalysisBrief {
            description: request.description.clone(),
            target_audience: request.target_audience.clone(),
            style: request.style,
            industry: request.industry.clone(),
        };

        let mut analysis = guarded(cancel, self.analyzer.analyze(&brief))
            .await?
            .map_err(|e| PipelineError::new(Phase::Analysis, e))?;

        let report = contrast(&analysis.colors.primary, WHITE)
            .map_err(|e| PipelineError::new(Phase::Analysis, e))?;

        let audit = self.validator.audit(&analysis.colors, WcagLevel::AA);
        for violation in &audit.violations {
            tracing::warn!(
                rule = %violation.rule,
                expected = violation.expected.as_deref().unwrap_or(""),
                actual = violation.actual.as_deref().unwrap_or(""),
                remediation = %violation.remediation.join("; "),
                "{}",
                violation.message
            );
        }

        analysis.contrast_report = Some(report);
        analysis.palette_audit = Some(audit);
        Ok(analysis)
    }

    async fn phase_logos(
        &self,
        request: &GenerationRequest,
        analysis: &BrandAnalysis,
        cancel: &CancellationToken,
    ) -> Result<(HtmlCssLogo, OptionalOutcome<Vec<ImageBlob>>), PipelineError> {
        let spec = LogoSpec {
            brand_name: analysis.name.clone(),
            primary_color: analysis.colors.primary.clone(),
            secondary_color: analysis.colors.secondary.clone(),
            font_family: analysis.typography.heading.clone(),
        };
        let html_css = self
            .logo_renderer
            .render(&spec)
            .map_err(|e| PipelineError::new(Phase::Logos, e))?;

        if !request.include_ai_logos {
            return Ok((html_css, OptionalOutcome::NotRequested));
        }

        let image_request = ImageRequest {
            purpose: ImagePurpose::Logo,
            prompt: logo_prompt(analysis, request.style),
            negative_prompt: LOGO_NEGATIVE_PROMPT.to_string(),
            style: request.style,
            count: AI_LOGO_VARIATIONS,
            size: AI_LOGO_SIZE,
        };
        let result = guarded(cancel, self.generate_images(&image_request)).await?;
        Ok((html_css, OptionalOutcome::from_result(result)))
    }

    async fn phase_mockups(
        &self,
        analysis: &BrandAnalysis,
        logo: &HtmlCssLogo,
        cancel: &CancellationToken,
    ) -> Result<MockupSet, PipelineError> {
        let [card, instagram, linkedin, hero] =
            MockupKind::MANDATORY.map(|kind| self.mockup_request(kind, analysis, logo));
        let renderer = &self.mockup_renderer;

        let (card_img, instagram_img, linkedin_img, hero_img) = guarded(cancel, async {
            tokio::try_join!(
                renderer.render(&card),
                renderer.render(&instagram),
                renderer.render(&linkedin),
                renderer.render(&hero),
            )
        })
        .await?
        .map_err(|e| PipelineError::new(Phase::Mockups, e))?;

        let mut mockups = MockupSet::new();
        mockups.insert_single(card.kind.key(), card_img);
        mockups.insert_single(instagram.kind.key(), instagram_img);
        mockups.insert_single(linkedin.kind.key(), linkedin_img);
        mockups.insert_single(hero.kind.key(), hero_img);
        Ok(mockups)
    }

    async fn phase_imagery(
        &self,
        request: &GenerationRequest,
        analysis: &BrandAnalysis,
        cancel: &CancellationToken,
    ) -> Result<OptionalOutcome<Vec<ImageBlob>>, PipelineError> {
        if !request.include_ai_imagery {
            return Ok(OptionalOutcome::NotRequested);
        }

        let image_request = ImageRequest {
            purpose: ImagePurpose::Hero,
            prompt: imagery_prompt(analysis),
            negative_prompt: IMAGERY_NEGATIVE_PROMPT.to_string(),
            style: request.style,
            count: AI_IMAGERY_VARIATIONS,
            size: AI_IMAGERY_SIZE,
        };
        let result = guarded(cancel, self.generate_images(&image_request)).await?;
        Ok(OptionalOutcome::from_result(result))
    }

    /// An empty image list is a failed generation whatever the adapter says.
    async fn generate_images(
        &self,
        request: &ImageRequest,
    ) -> Result<Vec<ImageBlob>, AdapterError> {
        let images = self.image_generator.generate(request).await?;
        if images.is_empty() {
            return Err(AdapterError::MalformedOutput(format!(
                "{} returned no images",
                self.image_generator.producer_id()
            )));
        }
        Ok(images)
    }

    fn mockup_request(
        &self,
        kind: MockupKind,
        analysis: &BrandAnalysis,
        logo: &HtmlCssLogo,
    ) -> MockupRequest {
        let template = self.templates.resolve(kind);
        MockupRequest {
            kind,
            size: template.canonical_size,
            brand_name: analysis.name.clone(),
            tagline: analysis.tagline.clone(),
            logo: logo.clone(),
            primary_color: analysis.colors.primary.clone(),
            secondary_color: analysis.colors.secondary.clone(),
            accent_color: analysis.colors.accent.clone(),
            font_heading: analysis.typography.heading.clone(),
            font_body: analysis.typography.body.clone(),
            headline: template.headline_for(&analysis.name),
            subheadline: Some(analysis.tagline.clone()).filter(|t| !t.trim().is_empty()),
        }
    }
}

/// Race `fut` against the run's cancellation token. Losing the race drops it.
async fn guarded<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, PipelineError> {
    if cancel.is_cancelled() {
        return Err(PipelineError::cancelled());
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PipelineError::cancelled()),
        output = fut => Ok(output),
    }
}

fn log_phase(phase: Phase, started: Instant) {
    tracing::info!(
        phase = phase.as_str(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Phase complete"
    );
}

fn record_degraded<T>(
    phase: Phase,
    outcome: &OptionalOutcome<T>,
    degraded: &mut Vec<DegradedPhase>,
) {
    if let Some(e) = outcome.failure() {
        tracing::warn!(
            phase = phase.as_str(),
            error = %e,
            "Optional phase failed, artifact omitted"
        );
        degraded.push(DegradedPhase {
            phase,
            reason: e.to_string(),
        });
    }
}

fn style_modifiers(style: Style) -> &'static str {
    match style {
        Style::Modern => "clean, minimalist, geometric, sleek, contemporary",
        Style::Classic => "elegant, timeless, serif, traditional, refined",
        Style::Bold => "strong, impactful, dynamic, vibrant, powerful",
        Style::Minimal => "simple, clean lines, monochrome, understated, zen",
    }
}

pub fn logo_prompt(analysis: &BrandAnalysis, style: Style) -> String {
    let mut prompt = format!("professional logo design for {}", analysis.name);
    if !analysis.personality.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(&analysis.personality.join(", "));
    }
    format!(
        "{}, {}, {} and {} colors, vector art style, flat design, clean background, \
         high quality, corporate identity, brand mark",
        prompt,
        style_modifiers(style),
        analysis.colors.primary,
        analysis.colors.secondary,
    )
}

pub fn imagery_prompt(analysis: &BrandAnalysis) -> String {
    let visual_style = match analysis.visual_style.trim() {
        "" => DEFAULT_VISUAL_STYLE,
        style => style,
    };
    format!(
        "professional hero image for {}, {}, {}, website banner, high-end corporate, \
         using colors: {}, {}, high quality, clean composition, balanced",
        analysis.name,
        analysis.tagline,
        visual_style,
        analysis.colors.primary,
        analysis.colors.secondary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandColors, Typography};

    fn analysis() -> BrandAnalysis {
        BrandAnalysis {
            name: "Brewline".to_string(),
            tagline: "Fresh beans, zero waste".to_string(),
            colors: BrandColors {
                primary: "#1F2937".to_string(),
                secondary: "#7C3AED".to_string(),
                accent: "#047857".to_string(),
                neutrals: vec![],
            },
            typography: Typography {
                heading: "Playfair Display".to_string(),
                body: "Inter".to_string(),
            },
            personality: vec!["warm".to_string(), "precise".to_string()],
            target_audience: String::new(),
            messaging: vec![],
            visual_style: String::new(),
            contrast_report: None,
            palette_audit: None,
        }
    }

    #[test]
    fn test_logo_prompt_uses_style_modifiers() {
        let prompt = logo_prompt(&analysis(), Style::Minimal);
        assert!(prompt.starts_with("professional logo design for Brewline, warm, precise"));
        assert!(prompt.contains("monochrome, understated, zen"));
        assert!(prompt.contains("#1F2937 and #7C3AED colors"));
    }

    #[test]
    fn test_imagery_prompt_defaults_visual_style() {
        let prompt = imagery_prompt(&analysis());
        assert!(prompt.contains("Fresh beans, zero waste, modern minimalist"));

        let mut custom = analysis();
        custom.visual_style = "earthy modern".to_string();
        assert!(imagery_prompt(&custom).contains("earthy modern"));
    }

    #[test]
    fn test_optional_outcome_accessors() {
        let failed: OptionalOutcome<u8> = OptionalOutcome::from_result(Err(AdapterError::Timeout));
        assert_eq!(failed.failure(), Some(&AdapterError::Timeout));
        assert_eq!(failed.succeeded(), None);
        assert_eq!(OptionalOutcome::Succeeded(3u8).succeeded(), Some(3));
        assert!(OptionalOutcome::<u8>::NotRequested.failure().is_none());
    }

    #[test]
    fn test_record_degraded_only_on_failure() {
        let mut degraded = Vec::new();
        record_degraded(Phase::Logos, &OptionalOutcome::<()>::NotRequested, &mut degraded);
        record_degraded(Phase::Logos, &OptionalOutcome::Succeeded(()), &mut degraded);
        record_degraded(
            Phase::Imagery,
            &OptionalOutcome::<()>::Failed(AdapterError::Transport("503".into())),
            &mut degraded,
        );
        assert_eq!(degraded.len(), 1);
        assert_eq!(degraded[0].phase, Phase::Imagery);
        assert!(degraded[0].reason.contains("503"));
    }

    #[tokio::test]
    async fn test_guarded_prefers_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = guarded(&cancel, async { 1 }).await.unwrap_err();
        assert_eq!(err.phase, Phase::Cancelled);
    }
}

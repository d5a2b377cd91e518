//! BrandForge CLI - Bridge interface for the web tier
//!
//! Commands: contrast, audit, tokens, parse-analysis, generate
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a check or a run fails, 1 on bad input

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::broadcast;

use brandforge_core::{
    adapters::parse_analysis,
    contrast::{self, shade_variations},
    templates::TemplateRegistry,
    progress_channel, BrandColors, BrandPipeline, GenerationRequest, PaletteValidator,
    PipelineConfig, RunProgress, Style, WcagLevel,
};

#[derive(Parser)]
#[command(name = "brandforge-cli")]
#[command(about = "BrandForge CLI - Brand Identity Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (environment variables override it)
    #[arg(short, long, global = true, env = "BRANDFORGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// WCAG contrast between two colors
    Contrast {
        foreground: String,

        #[arg(default_value = "#FFFFFF")]
        background: String,
    },

    /// Audit a palette against white
    Audit {
        /// JSON payload (BrandColors)
        #[arg(short, long)]
        payload: String,

        #[arg(short, long, value_enum, default_value_t = WcagLevel::AA)]
        level: WcagLevel,
    },

    /// Synthesize design tokens from an analysis
    Tokens {
        /// JSON payload (BrandAnalysis)
        #[arg(short, long)]
        payload: String,
    },

    /// Parse raw analysis text (fenced or bare JSON); `-` reads stdin
    ParseAnalysis {
        #[arg(default_value = "-")]
        file: String,
    },

    /// Run the full pipeline
    Generate {
        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        audience: String,

        #[arg(short, long, value_enum, default_value_t = Style::Modern)]
        style: Style,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        subdomain: Option<String>,

        #[arg(long)]
        ai_logos: bool,

        #[arg(long)]
        ai_imagery: bool,

        /// Mockup template overrides directory
        #[arg(short, long)]
        templates_dir: Option<PathBuf>,

        /// Whole-run timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Stream progress events to stderr as JSON lines
        #[arg(long)]
        progress: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandforge_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_json(&serde_json::json!({
                "success": false,
                "error": format!("{:#}", e),
            }));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Contrast { foreground, background } => {
            let report = contrast::contrast(&foreground, &background)?;
            print_json(&report);
            Ok(exit_if(report.meets_aa))
        }

        Commands::Audit { payload, level } => {
            let colors: BrandColors = serde_json::from_str(&payload).context("Invalid payload")?;
            let audit = PaletteValidator::new().audit(&colors, level);
            // Shades only for colors that parse; the audit already reports the rest.
            let roles = [
                ("primary", &colors.primary),
                ("secondary", &colors.secondary),
                ("accent", &colors.accent),
            ];
            let shades: serde_json::Map<String, serde_json::Value> = roles
                .into_iter()
                .filter_map(|(role, color)| {
                    let shades = shade_variations(color).ok()?;
                    Some((role.to_string(), serde_json::to_value(shades).ok()?))
                })
                .collect();

            let valid = audit.valid;
            print_json(&serde_json::json!({
                "audit": audit,
                "shades": shades,
            }));
            Ok(exit_if(valid))
        }

        Commands::Tokens { payload } => {
            let analysis = serde_json::from_str(&payload).context("Invalid payload")?;
            print_json(&brandforge_core::synthesize(&analysis));
            Ok(ExitCode::SUCCESS)
        }

        Commands::ParseAnalysis { file } => {
            let raw = read_input(&file)?;
            match parse_analysis(&raw) {
                Ok(analysis) => {
                    print_json(&analysis);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": e.to_string()}));
                    Ok(ExitCode::from(2))
                }
            }
        }

        Commands::Generate {
            description,
            audience,
            style,
            industry,
            subdomain,
            ai_logos,
            ai_imagery,
            templates_dir,
            timeout,
            progress,
        } => {
            let mut config = PipelineConfig::load(cli.config.as_deref())?;
            if let Some(secs) = timeout {
                config.timeouts.run_secs = secs;
            }

            let mut pipeline = BrandPipeline::from_config(&config)?;
            if let Some(dir) = templates_dir {
                let registry = TemplateRegistry::load_from_dir(&dir)
                    .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
                pipeline = pipeline.with_templates(registry);
            }

            let reporter = if progress {
                let (tx, rx) = progress_channel(64);
                pipeline = pipeline.with_progress(tx);
                Some(tokio::spawn(report_progress(rx)))
            } else {
                None
            };

            let request = GenerationRequest {
                industry,
                subdomain,
                include_ai_logos: ai_logos,
                include_ai_imagery: ai_imagery,
                ..GenerationRequest::new(description, audience, style)
            };

            let result = pipeline.run(&request).await;
            // Dropping the pipeline closes the channel so the reporter drains and exits.
            drop(pipeline);
            if let Some(reporter) = reporter {
                let _ = reporter.await;
            }

            match result {
                Ok(package) => {
                    print_json(&serde_json::json!({"success": true, "package": package}));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&serde_json::json!({
                        "success": false,
                        "phase": e.phase,
                        "error": e.to_string(),
                    }));
                    Ok(ExitCode::from(2))
                }
            }
        }
    }
}

async fn report_progress(mut rx: broadcast::Receiver<RunProgress>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => eprintln!("{}", line),
                Err(e) => eprintln!("unserializable progress event: {}", e),
            },
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                eprintln!("{{\"progress_lagged\": {}}}", missed);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn exit_if(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => println!(r#"{{"success": false, "error": "Unserializable output: {}"}}"#, e),
    }
}

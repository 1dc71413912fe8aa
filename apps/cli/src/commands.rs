//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pricestage_core::pipeline::{PipelineConfig, PipelineReport, ProgressReporter, run_pipeline};
use pricestage_core::{ProcessDownloader, ProcessParser, artifacts};
use pricestage_shared::{
    AppConfig, FileType, ParserId, Preset, SourceId, WorkingDirs, config_file_path, init_config,
    load_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pricestage — stage Israeli supermarket price data for import.
#[derive(Parser)]
#[command(
    name = "pricestage",
    version,
    about = "Download and parse Israeli supermarket price data, staging CSV for import.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `run` with the configured preset when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full staging pipeline: download, parse, verify, report.
    Run {
        /// Configuration preset: testing-subset or full-chains.
        #[arg(short, long)]
        preset: Option<String>,

        /// Chain to download from (repeatable; overrides the preset).
        #[arg(short, long)]
        source: Vec<String>,

        /// Cap on files fetched per chain (overrides the preset).
        #[arg(short, long)]
        limit: Option<u32>,

        /// Publication type to parse (repeatable; overrides the preset).
        #[arg(short = 't', long)]
        file_type: Vec<String>,

        /// Chain parser to run (repeatable; default all).
        #[arg(long)]
        parser: Vec<String>,

        /// Directory for raw chain dumps.
        #[arg(long)]
        dumps_dir: Option<PathBuf>,

        /// Directory for staged CSV output.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Verify that an output directory holds staged artifacts, without
    /// running the pipeline.
    Verify {
        /// Directory to inspect (defaults to the configured output dir).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Emit the artifact list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the named configuration presets.
    Presets,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pricestage=info",
        1 => "pricestage=debug",
        _ => "pricestage=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    // A bare `pricestage` runs the pipeline with the configured defaults.
    let command = cli.command.unwrap_or(Command::Run {
        preset: None,
        source: Vec::new(),
        limit: None,
        file_type: Vec::new(),
        parser: Vec::new(),
        dumps_dir: None,
        output_dir: None,
    });

    match command {
        Command::Run {
            preset,
            source,
            limit,
            file_type,
            parser,
            dumps_dir,
            output_dir,
        } => {
            cmd_run(
                preset.as_deref(),
                &source,
                limit,
                &file_type,
                &parser,
                dumps_dir,
                output_dir,
            )
            .await
        }
        Command::Verify { output_dir, json } => cmd_verify(output_dir, json).await,
        Command::Presets => cmd_presets(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

async fn cmd_run(
    preset: Option<&str>,
    sources: &[String],
    limit: Option<u32>,
    file_types: &[String],
    parsers: &[String],
    dumps_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;

    // Preset gives the baseline; individual flags override its fields.
    let preset_name = preset.unwrap_or(&config.defaults.preset);
    let preset: Preset = preset_name.parse()?;
    let spec = preset.spec();

    let dirs = WorkingDirs::new(
        dumps_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.dumps_dir)),
        output_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir)),
    );

    let sources = if sources.is_empty() {
        spec.sources
    } else {
        sources
            .iter()
            .map(|s| s.parse::<SourceId>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let file_types = if file_types.is_empty() {
        spec.file_types
    } else {
        Some(
            file_types
                .iter()
                .map(|s| s.parse::<FileType>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    let parsers = if parsers.is_empty() {
        spec.parsers
    } else {
        Some(
            parsers
                .iter()
                .map(|s| s.parse::<ParserId>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    let pipeline_config = PipelineConfig {
        dirs,
        sources,
        file_limit: limit.or(spec.file_limit),
        parsers,
        file_types,
        artifact_extension: config.defaults.artifact_extension.clone(),
    };

    info!(
        preset = preset.name(),
        sources = pipeline_config.sources.len(),
        "running staging pipeline"
    );

    let download = ProcessDownloader::new(config.collaborators.scraper_cmd.as_str());
    let parse = ProcessParser::new(config.collaborators.parser_cmd.as_str());
    let reporter = CliProgress::new();

    let report = run_pipeline(&pipeline_config, &download, &parse, &reporter).await?;

    print_report(&report, &pipeline_config, &config);

    Ok(())
}

/// Final summary block plus guidance for the downstream import step.
fn print_report(report: &PipelineReport, pipeline_config: &PipelineConfig, config: &AppConfig) {
    println!();
    println!("  Staging pipeline complete!");
    if let Some(warning) = &report.download_warning {
        println!("  Warning: download stage failed: {warning}");
        println!("           continued with previously downloaded files");
    }
    println!("  Artifacts: {}", report.artifacts.len());
    for artifact in &report.artifacts {
        println!("    - {} ({})", artifact.name, artifact.display_size());
    }
    println!(
        "  Output:  {}",
        pipeline_config.dirs.output_dir.display()
    );
    println!("  Time:    {:.1}s", report.elapsed.as_secs_f64());
    println!();
    println!("  Next step: import into MongoDB:");
    println!(
        "    {}=\"<connection string>\" {} {}",
        config.import.mongodb_uri_env,
        config.import.import_command,
        pipeline_config.dirs.output_dir.display()
    );
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &PipelineReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// verify
// ---------------------------------------------------------------------------

async fn cmd_verify(output_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config()?;
    let dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));

    info!(dir = %dir.display(), "verifying staged artifacts");

    let artifacts = artifacts::verify(&dir, &config.defaults.artifact_extension)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
        return Ok(());
    }

    println!("Found {} artifact(s) in {}:", artifacts.len(), dir.display());
    for artifact in &artifacts {
        println!("  - {} ({})", artifact.name, artifact.display_size());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// presets
// ---------------------------------------------------------------------------

fn cmd_presets() -> Result<()> {
    for preset in Preset::ALL {
        let spec = preset.spec();
        println!("{}", preset.name());
        println!("  {}", preset.description());
        println!(
            "  sources:    {}",
            spec.sources
                .iter()
                .map(SourceId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        match spec.file_limit {
            Some(limit) => println!("  file limit: {limit}"),
            None => println!("  file limit: none"),
        }
        match &spec.file_types {
            Some(types) => println!(
                "  file types: {}",
                types
                    .iter()
                    .map(|t| t.feed_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => println!("  file types: all"),
        }
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    println!("# {}", config_file_path()?.display());
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

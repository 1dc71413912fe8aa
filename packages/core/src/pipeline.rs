//! End-to-end staging pipeline: prepare directories → download → parse →
//! verify → report.
//!
//! The two stages carry different failure policies: scraping the chain
//! portals is inherently unreliable (rate limiting, site changes), so a
//! download failure is downgraded to a warning and the run continues with
//! whatever files landed. A parse failure is fatal — without CSV output the
//! downstream import has nothing to consume, and continuing would be
//! misleading. A parse that "succeeds" but stages nothing is fatal too,
//! under its own error so the two cases stay distinguishable.

use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};

use pricestage_shared::{
    DownloadConfig, FileType, ParseConfig, ParserId, PriceStageError, Result, SourceId, WorkingDirs,
};

use crate::artifacts::{self, Artifact};
use crate::collaborators::{
    DownloadCollaborator, FailurePolicy, ParseCollaborator, StageOutcome,
};

/// Per-stage failure policy table. The classification is deliberate design,
/// not an accident of catch blocks; see the module docs.
const DOWNLOAD_POLICY: FailurePolicy = FailurePolicy::Tolerate;
const PARSE_POLICY: FailurePolicy = FailurePolicy::Fatal;

/// Configuration for one pipeline run. Constructed once from a preset merged
/// with CLI overrides; immutable afterwards.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The dumps/output directory pair used as the stage handoff.
    pub dirs: WorkingDirs,
    /// Chains to download from.
    pub sources: Vec<SourceId>,
    /// Cap on files fetched per chain. `None` = no cap.
    pub file_limit: Option<u32>,
    /// Chain parsers to run. `None` = all available.
    pub parsers: Option<Vec<ParserId>>,
    /// Publication types to parse. `None` = all.
    pub file_types: Option<Vec<FileType>>,
    /// Extension the verification stage looks for (no leading dot).
    pub artifact_extension: String,
}

impl PipelineConfig {
    fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            sources: self.sources.clone(),
            file_limit: self.file_limit,
            destination: self.dirs.dumps_dir.clone(),
        }
    }

    fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            parsers: self.parsers.clone(),
            file_types: self.file_types.clone(),
            source: self.dirs.dumps_dir.clone(),
            destination: self.dirs.output_dir.clone(),
        }
    }
}

/// Result of a completed pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Staged files discovered by the verification stage, sorted by name.
    pub artifacts: Vec<Artifact>,
    /// Download-stage failure detail, if the stage failed and was tolerated.
    pub download_warning: Option<String>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &PipelineReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &PipelineReport) {}
}

/// Ensure both working directories exist and are directories, creating them
/// if missing. Any failure here aborts the pipeline before a stage runs.
pub fn prepare_directories(dirs: &WorkingDirs) -> Result<()> {
    for path in [&dirs.dumps_dir, &dirs.output_dir] {
        std::fs::create_dir_all(path).map_err(|e| PriceStageError::directory(path, e))?;
        if !path.is_dir() {
            return Err(PriceStageError::directory(
                path,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
    }
    Ok(())
}

/// Run the full staging pipeline.
///
/// 1. Prepare working directories (fatal on failure)
/// 2. Download raw dumps (failure tolerated)
/// 3. Parse dumps to CSV (failure fatal)
/// 4. Verify staged artifacts (empty set fatal)
#[instrument(skip_all, fields(
    dumps = %config.dirs.dumps_dir.display(),
    output = %config.dirs.output_dir.display(),
))]
pub async fn run_pipeline(
    config: &PipelineConfig,
    download: &dyn DownloadCollaborator,
    parse: &dyn ParseCollaborator,
    progress: &dyn ProgressReporter,
) -> Result<PipelineReport> {
    let start = Instant::now();

    info!(
        sources = config.sources.len(),
        file_limit = config.file_limit,
        "starting staging pipeline"
    );

    progress.phase("Preparing working directories");
    prepare_directories(&config.dirs)?;

    // --- Download stage (tolerated) ---
    progress.phase("Downloading chain dumps");
    let download_outcome = match download.run(&config.download_config()).await {
        Ok(()) => {
            info!("download stage complete");
            StageOutcome::Completed
        }
        Err(err) => match DOWNLOAD_POLICY {
            FailurePolicy::Tolerate => {
                warn!(error = %err, "download stage failed, continuing with any downloaded files");
                StageOutcome::Failed(err.to_string())
            }
            FailurePolicy::Fatal => {
                error!(error = %err, "download stage failed");
                return Err(PriceStageError::download(err.to_string()));
            }
        },
    };

    // --- Parse stage (fatal) ---
    progress.phase("Parsing dumps to CSV");
    if let Err(err) = parse.run(&config.parse_config()).await {
        match PARSE_POLICY {
            FailurePolicy::Tolerate => {
                warn!(error = %err, "parse stage failed, continuing");
            }
            FailurePolicy::Fatal => {
                error!(error = %err, "parse stage failed");
                return Err(PriceStageError::parse(err.to_string()));
            }
        }
    } else {
        info!("parse stage complete");
    }

    // --- Verification stage ---
    progress.phase("Verifying staged artifacts");
    let artifacts = artifacts::verify(&config.dirs.output_dir, &config.artifact_extension)?;

    let report = PipelineReport {
        artifacts,
        download_warning: download_outcome.failure().map(String::from),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        artifact_count = report.artifacts.len(),
        download_failed = report.download_warning.is_some(),
        elapsed_ms = report.elapsed.as_millis(),
        "staging pipeline complete"
    );

    Ok(report)
}

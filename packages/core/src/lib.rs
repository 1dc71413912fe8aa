//! Pipeline orchestration for pricestage.
//!
//! This crate ties the two external collaborators (scraper, parser) into the
//! end-to-end staging pipeline: prepare directories → download (tolerated) →
//! parse (fatal on failure) → verify artifacts → report.

pub mod artifacts;
pub mod collaborators;
pub mod pipeline;
pub mod process;

pub use artifacts::{Artifact, format_size, scan, verify};
pub use collaborators::{
    DownloadCollaborator, FailurePolicy, ParseCollaborator, StageFailure, StageOutcome,
};
pub use pipeline::{
    PipelineConfig, PipelineReport, ProgressReporter, SilentProgress, prepare_directories,
    run_pipeline,
};
pub use process::{ProcessDownloader, ProcessParser};

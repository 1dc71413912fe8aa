//! Collaborator interfaces for the two external stages.
//!
//! The scraper and parser are not implemented here; the pipeline talks to
//! them through these narrow traits so production can plug in the real
//! subprocess-backed implementations ([`crate::process`]) and tests can plug
//! in fakes.

use async_trait::async_trait;

use pricestage_shared::{DownloadConfig, ParseConfig};

/// Error raised by a collaborator when its stage fails.
///
/// Deliberately opaque: the pipeline classifies the failure by stage, not by
/// cause, so one message-carrying type covers both collaborators.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StageFailure {
    pub message: String,
}

impl StageFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The download collaborator: fetches raw dump files from the chain portals
/// into the destination directory.
///
/// Contract: best-effort. It may write zero or more files before failing, and
/// a failure must not corrupt files already written — partial downloads are
/// still useful input to the parse stage.
#[async_trait]
pub trait DownloadCollaborator: Send + Sync {
    async fn run(&self, config: &DownloadConfig) -> Result<(), StageFailure>;
}

/// The parse collaborator: reads raw dumps from the source directory and
/// writes normalized CSV into the destination directory.
///
/// Contract: on failure the destination contents are undefined and must be
/// treated as unusable.
#[async_trait]
pub trait ParseCollaborator: Send + Sync {
    async fn run(&self, config: &ParseConfig) -> Result<(), StageFailure>;
}

/// How the pipeline treats a stage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log a warning and continue with whatever the stage managed to produce.
    Tolerate,
    /// Abort the run with a stage-specific error.
    #[default]
    Fatal,
}

/// Outcome of a single stage after its failure policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Failed(String),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The failure message, if the stage failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Completed => None,
            Self::Failed(message) => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failure_display() {
        let err = StageFailure::new("connection reset by portal");
        assert_eq!(err.to_string(), "connection reset by portal");
    }

    #[test]
    fn stage_outcome_accessors() {
        assert!(StageOutcome::Completed.is_success());
        assert!(StageOutcome::Completed.failure().is_none());

        let failed = StageOutcome::Failed("timed out".into());
        assert!(!failed.is_success());
        assert_eq!(failed.failure(), Some("timed out"));
    }
}

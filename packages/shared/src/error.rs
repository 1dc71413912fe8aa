//! Error types for pricestage.
//!
//! Library crates use [`PriceStageError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics and maps each
//! fatal variant to a distinct process exit code.

use std::path::PathBuf;

/// Exit code for generic failures (config, I/O).
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when a working directory cannot be created or accessed.
pub const EXIT_DIRECTORY: u8 = 2;
/// Exit code when the parse collaborator fails.
pub const EXIT_PARSE: u8 = 3;
/// Exit code when the parse stage produced zero staged artifacts.
pub const EXIT_NO_ARTIFACTS: u8 = 4;

/// Top-level error type for all pricestage operations.
#[derive(Debug, thiserror::Error)]
pub enum PriceStageError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Working directory cannot be created or accessed. Aborts the pipeline
    /// before any stage runs.
    #[error("directory error at {path:?}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Download collaborator failure. Non-fatal: the runner downgrades this
    /// to a warning and continues with whatever files were written.
    #[error("download error: {0}")]
    Download(String),

    /// Parse collaborator failure. Fatal: without parsed CSV there is nothing
    /// for the import step to consume.
    #[error("parse error: {0}")]
    Parse(String),

    /// Parse reported success but the output directory holds no artifacts
    /// with the expected extension. Kept distinct from [`Parse`] so operators
    /// can tell "stage errored" apart from "stage silently produced nothing".
    ///
    /// [`Parse`]: PriceStageError::Parse
    #[error("no artifacts found in {path:?}")]
    NoArtifacts { path: PathBuf },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PriceStageError>;

impl PriceStageError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` from working-directory preparation.
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    /// Create a download error from any displayable message.
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// The process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Directory { .. } => EXIT_DIRECTORY,
            Self::Parse(_) => EXIT_PARSE,
            Self::NoArtifacts { .. } => EXIT_NO_ARTIFACTS,
            Self::Config { .. } | Self::Io { .. } | Self::Download(_) => EXIT_FAILURE,
        }
    }

    /// A suggested remediation printed alongside fatal diagnostics.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Directory { .. } => {
                Some("check that the dumps and output directories are writable")
            }
            Self::Parse(_) => Some(
                "inspect the dumps directory for truncated downloads, then re-run \
                 after verifying network access to the chain portals",
            ),
            Self::NoArtifacts { .. } => Some(
                "the parser produced nothing — check that the dumps directory \
                 contains downloaded files and that the file-type filter is not \
                 excluding everything",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PriceStageError::config("unknown preset 'quick'");
        assert_eq!(err.to_string(), "config error: unknown preset 'quick'");

        let err = PriceStageError::parse("unexpected end of XML document");
        assert!(err.to_string().contains("unexpected end of XML"));
    }

    #[test]
    fn fatal_variants_have_distinct_exit_codes() {
        let dir = PriceStageError::directory(
            "/var/dumps",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        let parse = PriceStageError::parse("boom");
        let empty = PriceStageError::NoArtifacts {
            path: "/var/outputs".into(),
        };

        let codes = [dir.exit_code(), parse.exit_code(), empty.exit_code()];
        assert_eq!(codes, [EXIT_DIRECTORY, EXIT_PARSE, EXIT_NO_ARTIFACTS]);
        assert!(codes.iter().all(|&c| c != 0 && c != EXIT_FAILURE));
    }

    #[test]
    fn fatal_variants_carry_remediation() {
        let empty = PriceStageError::NoArtifacts {
            path: "/var/outputs".into(),
        };
        assert!(empty.remediation().unwrap().contains("file-type filter"));
        assert!(PriceStageError::config("x").remediation().is_none());
    }
}

//! Subprocess-backed collaborator implementations.
//!
//! Production runs delegate the download and parse stages to the external
//! scraper/parser CLIs named in the config. The pipeline only cares about
//! the exit status; anything the tools print goes straight through to the
//! operator's terminal via stderr capture in the failure message.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use pricestage_shared::{DownloadConfig, ParseConfig};

use crate::collaborators::{DownloadCollaborator, ParseCollaborator, StageFailure};

/// Runs the external scraper CLI for the download stage.
#[derive(Debug, Clone)]
pub struct ProcessDownloader {
    command: String,
}

impl ProcessDownloader {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Runs the external parser CLI for the parse stage.
#[derive(Debug, Clone)]
pub struct ProcessParser {
    command: String,
}

impl ProcessParser {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Argument vector for the scraper CLI.
fn download_args(config: &DownloadConfig) -> Vec<String> {
    let mut args = Vec::new();
    for source in &config.sources {
        args.push("--source".to_string());
        args.push(source.to_string());
    }
    if let Some(limit) = config.file_limit {
        args.push("--limit".to_string());
        args.push(limit.to_string());
    }
    args.push("--dest".to_string());
    args.push(path_arg(&config.destination));
    args
}

/// Argument vector for the parser CLI.
fn parse_args(config: &ParseConfig) -> Vec<String> {
    let mut args = Vec::new();
    for parser in config.parsers.iter().flatten() {
        args.push("--parser".to_string());
        args.push(parser.to_string());
    }
    for file_type in config.file_types.iter().flatten() {
        args.push("--file-type".to_string());
        args.push(file_type.to_string());
    }
    args.push("--input".to_string());
    args.push(path_arg(&config.source));
    args.push("--output".to_string());
    args.push(path_arg(&config.destination));
    args
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Spawn `command args…`, wait for it, and map a spawn failure or non-zero
/// exit into a [`StageFailure`] carrying the stderr tail.
fn run_command(command: &str, args: &[String]) -> Result<(), StageFailure> {
    debug!(command, ?args, "invoking collaborator");

    let output = std::process::Command::new(command)
        .args(args)
        .output()
        .map_err(|e| StageFailure::new(format!("failed to spawn '{command}': {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim().lines().last().unwrap_or("no output");
        return Err(StageFailure::new(format!(
            "'{command}' exited with status {}: {detail}",
            output.status.code().unwrap_or(-1)
        )));
    }

    info!(command, "collaborator finished");
    Ok(())
}

#[async_trait]
impl DownloadCollaborator for ProcessDownloader {
    async fn run(&self, config: &DownloadConfig) -> Result<(), StageFailure> {
        run_command(&self.command, &download_args(config))
    }
}

#[async_trait]
impl ParseCollaborator for ProcessParser {
    async fn run(&self, config: &ParseConfig) -> Result<(), StageFailure> {
        run_command(&self.command, &parse_args(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pricestage_shared::FileType;

    #[test]
    fn download_args_cover_sources_limit_and_dest() {
        let config = DownloadConfig {
            sources: vec!["shufersal".parse().unwrap(), "rami_levy".parse().unwrap()],
            file_limit: Some(10),
            destination: "/data/dumps".into(),
        };

        let args = download_args(&config);
        assert_eq!(
            args,
            [
                "--source", "shufersal", "--source", "rami_levy", "--limit", "10", "--dest",
                "/data/dumps",
            ]
        );
    }

    #[test]
    fn download_args_omit_limit_when_uncapped() {
        let config = DownloadConfig {
            sources: vec!["shufersal".parse().unwrap()],
            file_limit: None,
            destination: "/data/dumps".into(),
        };

        let args = download_args(&config);
        assert!(!args.contains(&"--limit".to_string()));
    }

    #[test]
    fn parse_args_cover_filters_and_directories() {
        let config = ParseConfig {
            parsers: None,
            file_types: Some(vec![FileType::Stores, FileType::PromoFull]),
            source: "/data/dumps".into(),
            destination: "/data/outputs".into(),
        };

        let args = parse_args(&config);
        assert_eq!(
            args,
            [
                "--file-type",
                "Stores",
                "--file-type",
                "PromoFull",
                "--input",
                "/data/dumps",
                "--output",
                "/data/outputs",
            ]
        );
    }

    #[test]
    fn spawn_failure_is_stage_failure() {
        let err = run_command("pricestage-no-such-binary", &[]).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}

//! Shared types, error model, and configuration for pricestage.
//!
//! This crate is the foundation depended on by the other pricestage crates.
//! It provides:
//! - [`PriceStageError`] — the unified error type, with process exit codes
//! - Domain types ([`SourceId`], [`ParserId`], [`FileType`], stage configs, presets)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CollaboratorsConfig, DefaultsConfig, ImportConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{
    EXIT_DIRECTORY, EXIT_FAILURE, EXIT_NO_ARTIFACTS, EXIT_PARSE, PriceStageError, Result,
};
pub use types::{
    DownloadConfig, FileType, ParseConfig, ParserId, Preset, PresetSpec, SourceId, WorkingDirs,
};

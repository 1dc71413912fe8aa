//! Application configuration for pricestage.
//!
//! User config lives at `~/.pricestage/pricestage.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PriceStageError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pricestage.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pricestage";

// ---------------------------------------------------------------------------
// Config structs (matching pricestage.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External scraper/parser commands.
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Downstream import guidance.
    #[serde(default)]
    pub import: ImportConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory where raw chain dumps are written.
    #[serde(default = "default_dumps_dir")]
    pub dumps_dir: String,

    /// Directory where staged CSV files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Preset used when `--preset` is not given.
    #[serde(default = "default_preset")]
    pub preset: String,

    /// File extension the verification stage looks for.
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dumps_dir: default_dumps_dir(),
            output_dir: default_output_dir(),
            preset: default_preset(),
            artifact_extension: default_artifact_extension(),
        }
    }
}

fn default_dumps_dir() -> String {
    "israeli_dumps".into()
}
fn default_output_dir() -> String {
    "israeli_outputs".into()
}
fn default_preset() -> String {
    "testing-subset".into()
}
fn default_artifact_extension() -> String {
    "csv".into()
}

/// `[collaborators]` section — the external commands the pipeline delegates to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    /// Command invoked for the download stage.
    #[serde(default = "default_scraper_cmd")]
    pub scraper_cmd: String,

    /// Command invoked for the parse stage.
    #[serde(default = "default_parser_cmd")]
    pub parser_cmd: String,
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            scraper_cmd: default_scraper_cmd(),
            parser_cmd: default_parser_cmd(),
        }
    }
}

fn default_scraper_cmd() -> String {
    "il-supermarket-scraper".into()
}
fn default_parser_cmd() -> String {
    "il-supermarket-parser".into()
}

/// `[import]` section — guidance for the downstream MongoDB import step.
/// The pipeline never consumes the connection string itself; it only names
/// the env var in its final report (never store the credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Name of the env var holding the MongoDB connection string.
    #[serde(default = "default_mongodb_uri_env")]
    pub mongodb_uri_env: String,

    /// The import command suggested in the final report.
    #[serde(default = "default_import_command")]
    pub import_command: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            mongodb_uri_env: default_mongodb_uri_env(),
            import_command: default_import_command(),
        }
    }
}

fn default_mongodb_uri_env() -> String {
    "MONGODB_URI".into()
}
fn default_import_command() -> String {
    "node scripts/import-israeli-products.js".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pricestage/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PriceStageError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pricestage/pricestage.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PriceStageError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PriceStageError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PriceStageError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PriceStageError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PriceStageError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

//! Core domain types for the pricestage pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PriceStageError;

// ---------------------------------------------------------------------------
// SourceId / ParserId
// ---------------------------------------------------------------------------

/// Identifier for a supermarket chain's data feed (e.g. `shufersal`,
/// `rami_levy`). The set of chains is open-ended, so this is a validated
/// string rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

/// Identifier for a chain-specific parser in the parse collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserId(String);

fn validate_ident(kind: &str, s: &str) -> Result<(), PriceStageError> {
    if s.is_empty() {
        return Err(PriceStageError::config(format!("empty {kind} identifier")));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(PriceStageError::config(format!(
            "invalid {kind} identifier '{s}': expected lowercase letters, digits, and underscores"
        )));
    }
    Ok(())
}

impl SourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ParserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ParserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SourceId {
    type Err = PriceStageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        validate_ident("source", s)?;
        Ok(Self(s.to_string()))
    }
}

impl std::str::FromStr for ParserId {
    type Err = PriceStageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        validate_ident("parser", s)?;
        Ok(Self(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// Publication types used by the Israeli price-transparency feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Stores,
    Prices,
    PricesFull,
    Promos,
    PromoFull,
}

impl FileType {
    /// All publication types, in feed order.
    pub const ALL: [FileType; 5] = [
        FileType::Stores,
        FileType::Prices,
        FileType::PricesFull,
        FileType::Promos,
        FileType::PromoFull,
    ];

    /// The name the feeds (and the parse collaborator) use for this type.
    pub fn feed_name(&self) -> &'static str {
        match self {
            Self::Stores => "Stores",
            Self::Prices => "Prices",
            Self::PricesFull => "PricesFull",
            Self::Promos => "Promos",
            Self::PromoFull => "PromoFull",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.feed_name())
    }
}

impl std::str::FromStr for FileType {
    type Err = PriceStageError;

    /// Accepts the feed spelling (`PromoFull`) as well as the kebab/lowercase
    /// spelling used on the command line (`promo-full`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "stores" => Ok(Self::Stores),
            "prices" => Ok(Self::Prices),
            "pricesfull" => Ok(Self::PricesFull),
            "promos" => Ok(Self::Promos),
            "promofull" => Ok(Self::PromoFull),
            _ => Err(PriceStageError::config(format!(
                "unknown file type '{s}': expected one of Stores, Prices, PricesFull, Promos, PromoFull"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Working directories
// ---------------------------------------------------------------------------

/// The pair of filesystem directories used as the stage handoff: raw dumps
/// land in `dumps_dir`, staged CSV lands in `output_dir`. Both persist across
/// runs and are never cleaned up by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirs {
    pub dumps_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl WorkingDirs {
    pub fn new(dumps_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            dumps_dir: dumps_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage configurations
// ---------------------------------------------------------------------------

/// Immutable configuration handed to the download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Chains to download from.
    pub sources: Vec<SourceId>,
    /// Cap on files fetched per chain. `None` = no cap.
    pub file_limit: Option<u32>,
    /// Where raw dump files are written.
    pub destination: PathBuf,
}

/// Immutable configuration handed to the parse collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Chain parsers to run. `None` = all available.
    pub parsers: Option<Vec<ParserId>>,
    /// Publication types to parse. `None` = all.
    pub file_types: Option<Vec<FileType>>,
    /// Directory holding raw dump files.
    pub source: PathBuf,
    /// Where normalized CSV files are written.
    pub destination: PathBuf,
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Frozen stage settings for one named pipeline profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetSpec {
    pub sources: Vec<SourceId>,
    pub file_limit: Option<u32>,
    pub parsers: Option<Vec<ParserId>>,
    pub file_types: Option<Vec<FileType>>,
}

/// Named configuration presets.
///
/// `testing-subset` stages a handful of Shufersal files and only the
/// product-related publication types; `full-chains` covers the two largest
/// chains with every publication type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    TestingSubset,
    FullChains,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::TestingSubset, Preset::FullChains];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TestingSubset => "testing-subset",
            Self::FullChains => "full-chains",
        }
    }

    /// One-line description for `pricestage presets`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TestingSubset => "Shufersal only, 5 files, product-related types",
            Self::FullChains => "Shufersal + Rami Levy, 10 files, all types",
        }
    }

    /// The frozen stage settings for this preset.
    pub fn spec(&self) -> PresetSpec {
        match self {
            Self::TestingSubset => PresetSpec {
                sources: vec![SourceId("shufersal".into())],
                file_limit: Some(5),
                parsers: None,
                file_types: Some(vec![FileType::Stores, FileType::Prices, FileType::PromoFull]),
            },
            Self::FullChains => PresetSpec {
                sources: vec![SourceId("shufersal".into()), SourceId("rami_levy".into())],
                file_limit: Some(10),
                parsers: None,
                file_types: None,
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Preset {
    type Err = PriceStageError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "testing-subset" => Ok(Self::TestingSubset),
            "full-chains" => Ok(Self::FullChains),
            _ => Err(PriceStageError::config(format!(
                "unknown preset '{s}': expected 'testing-subset' or 'full-chains'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_validation() {
        assert!("shufersal".parse::<SourceId>().is_ok());
        assert!("rami_levy".parse::<SourceId>().is_ok());
        assert!("".parse::<SourceId>().is_err());
        assert!("Rami Levy".parse::<SourceId>().is_err());
    }

    #[test]
    fn file_type_parses_feed_and_cli_spellings() {
        assert_eq!("Stores".parse::<FileType>().unwrap(), FileType::Stores);
        assert_eq!("promo-full".parse::<FileType>().unwrap(), FileType::PromoFull);
        assert_eq!("PricesFull".parse::<FileType>().unwrap(), FileType::PricesFull);
        assert!("Receipts".parse::<FileType>().is_err());
    }

    #[test]
    fn file_type_display_matches_feed_names() {
        assert_eq!(FileType::PromoFull.to_string(), "PromoFull");
        assert_eq!(FileType::Stores.to_string(), "Stores");
    }

    #[test]
    fn testing_subset_preset() {
        let spec = Preset::TestingSubset.spec();
        assert_eq!(spec.sources.len(), 1);
        assert_eq!(spec.sources[0].as_str(), "shufersal");
        assert_eq!(spec.file_limit, Some(5));
        assert!(spec.parsers.is_none());
        assert_eq!(
            spec.file_types,
            Some(vec![FileType::Stores, FileType::Prices, FileType::PromoFull])
        );
    }

    #[test]
    fn full_chains_preset() {
        let spec = Preset::FullChains.spec();
        let names: Vec<&str> = spec.sources.iter().map(SourceId::as_str).collect();
        assert_eq!(names, ["shufersal", "rami_levy"]);
        assert_eq!(spec.file_limit, Some(10));
        assert!(spec.file_types.is_none());
    }

    #[test]
    fn preset_roundtrip() {
        for preset in Preset::ALL {
            let parsed: Preset = preset.name().parse().expect("parse preset");
            assert_eq!(parsed, preset);
        }
        assert!("quick".parse::<Preset>().is_err());
    }
}

//! Configuration structures for the bulletin pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{IdspError, Result};
use crate::models::record::Era;

/// Main configuration for the idsp pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdspConfig {
    /// Era detection and segmentation configuration.
    pub segmentation: SegmentationConfig,

    /// Gazetteer matching configuration.
    pub resolution: ResolutionConfig,

    /// Vocabulary file locations.
    pub gazetteer: GazetteerConfig,
}

/// Era detection and record segmentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// First year printed in the post-2016 tabular layout.
    pub era_boundary_year: u32,

    /// Era assumed when a dump contains no 4-digit year at all.
    pub fallback_era: Era,

    /// Minimum number of ID anchors before anchor segmentation is trusted.
    pub min_anchors: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            era_boundary_year: 2016,
            fallback_era: Era::Post2016,
            min_anchors: 2,
        }
    }
}

/// How the fuzzy tier takes part in a matcher chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FuzzyMode {
    /// Exact containment first, fuzzy only when it finds nothing.
    Fallback,
    /// Fuzzy scoring only.
    Always,
    /// Exact containment only.
    ExactOnly,
}

/// Which district list is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistrictScope {
    /// The resolved state's districts, or the national list when no state resolved.
    StateScoped,
    /// Always the national list.
    National,
    /// Only the resolved state's districts; no state means no district.
    StateOnly,
}

/// Gazetteer matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum fuzzy score (0 - 100) to accept a state.
    pub state_threshold: u8,

    /// Minimum fuzzy score (0 - 100) to accept a district.
    pub district_threshold: u8,

    /// Fuzzy tier behaviour for states and districts.
    pub fuzzy_mode: FuzzyMode,

    /// District lookup scope.
    pub district_scope: DistrictScope,

    /// Resolve against the text before the case/death pair only.
    pub resolve_within_head: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            state_threshold: 85,
            district_threshold: 85,
            fuzzy_mode: FuzzyMode::Fallback,
            district_scope: DistrictScope::StateScoped,
            resolve_within_head: true,
        }
    }
}

/// Vocabulary file locations, newline delimited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    pub states: PathBuf,
    pub districts: PathBuf,
    pub diseases: PathBuf,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            states: PathBuf::from("state_names.txt"),
            districts: PathBuf::from("district_names.txt"),
            diseases: PathBuf::from("disease_names.txt"),
        }
    }
}

impl IdspConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| IdspError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| IdspError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject thresholds outside the 0 - 100 score range.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("resolution.state_threshold", self.resolution.state_threshold),
            ("resolution.district_threshold", self.resolution.district_threshold),
        ] {
            if value > 100 {
                return Err(IdspError::Config(format!("{name} must be at most 100, got {value}")));
            }
        }
        if self.segmentation.min_anchors == 0 {
            return Err(IdspError::Config("segmentation.min_anchors must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: IdspConfig =
            serde_json::from_str(r#"{"resolution": {"fuzzy_mode": "exact-only"}}"#).unwrap();

        assert_eq!(config.resolution.fuzzy_mode, FuzzyMode::ExactOnly);
        assert_eq!(config.resolution.state_threshold, 85);
        assert_eq!(config.segmentation.era_boundary_year, 2016);
        assert_eq!(config.segmentation.fallback_era, Era::Post2016);
    }

    #[test]
    fn test_validate_threshold() {
        let mut config = IdspConfig::default();
        config.resolution.district_threshold = 120;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = IdspConfig::default();
        config.resolution.district_scope = DistrictScope::National;
        config.save(&path).unwrap();

        let loaded = IdspConfig::from_file(&path).unwrap();
        assert_eq!(loaded.resolution.district_scope, DistrictScope::National);
    }
}

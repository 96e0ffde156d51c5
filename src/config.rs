//! Extraction settings.
//!
//! Every field has a default matching the printed card sheets (a 4 x 2 grid
//! per page, banner in the top quarter), so an empty `{}` file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::color::ColorBands;
use crate::core::grid::GridShape;
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub rows: u32,
    pub columns: u32,
    /// Names shorter than this many characters are treated as OCR noise.
    pub min_name_length: usize,
    /// Top fraction of each cell sampled for the banner color.
    pub banner_fraction: f32,
    /// Pixels skipped inside the cell border before sampling.
    pub banner_margin: u32,
    pub color_bands: ColorBands,
    pub placeholders: Placeholders,
    pub metadata: MetadataSettings,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 2,
            min_name_length: 3,
            banner_fraction: 0.25,
            banner_margin: 20,
            color_bands: ColorBands::default(),
            placeholders: Placeholders::default(),
            metadata: MetadataSettings::default(),
        }
    }
}

/// Values written for fields that only the curation pass can know.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Placeholders {
    pub age: u8,
    pub icons: Vec<String>,
    pub dogma_symbol: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            age: 1,
            icons: vec!["LEAF".to_string(); 4],
            dogma_symbol: "LEAF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetadataSettings {
    pub schema: String,
    pub version: String,
    pub source: String,
    pub language: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            schema: "https://innovation-game-engine/schemas/card-schema-v2.json".to_string(),
            version: "1.2.0-extracted".to_string(),
            source: "Scans Complets IELLO".to_string(),
            language: "fr".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Reads settings from `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn grid(&self) -> GridShape {
        GridShape::new(self.rows, self.columns)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            grid: self.grid(),
            min_name_length: self.min_name_length,
            banner_fraction: self.banner_fraction,
            banner_margin: self.banner_margin,
            color_bands: self.color_bands.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::HsvRange;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let config: ExtractConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExtractConfig::default());
        assert_eq!(config.grid(), GridShape::new(4, 2));
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config: ExtractConfig = serde_json::from_str(
            r#"{
                "rows": 3,
                "placeholders": {"age": 0},
                "color_bands": {"blue": [{"lower": [95, 40, 40], "upper": [130, 255, 255]}]}
            }"#,
        )
        .unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.columns, 2);
        assert_eq!(config.placeholders.age, 0);
        assert_eq!(config.placeholders.dogma_symbol, "LEAF");
        assert_eq!(
            config.color_bands.blue,
            vec![HsvRange::new([95, 40, 40], [130, 255, 255])]
        );
        assert_eq!(config.color_bands.red, ColorBands::default().red);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ExtractConfig::load(Some(Path::new("/nonexistent/cardscan.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}

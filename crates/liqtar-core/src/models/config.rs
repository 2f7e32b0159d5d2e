//! Configuration structures for the extraction pipeline.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Main configuration for the liqtar pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiqtarConfig {
    /// Category extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF input configuration.
    pub pdf: PdfConfig,

    /// Report rendering configuration.
    pub report: ReportConfig,
}

/// Rounding applied at aggregation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go away from zero (0.125 -> 0.13).
    #[default]
    HalfUp,
    /// Ties go to the even neighbour (0.125 -> 0.12).
    HalfEven,
}

impl RoundingMode {
    /// Round to cents.
    pub fn round(self, value: Decimal) -> Decimal {
        let strategy = match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        value.round_dp_with_strategy(2, strategy)
    }
}

/// Category extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Abort the run on the first malformed amount instead of skipping it.
    pub strict: bool,

    /// Rounding for final and derived totals.
    pub rounding: RoundingMode,

    /// Drop "-IVA ..." rows from the presented summary.
    pub suppress_negative_iva: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strict: false,
            rounding: RoundingMode::HalfUp,
            suppress_negative_iva: true,
        }
    }
}

/// PDF input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted document in megabytes (0 = unlimited).
    pub max_file_size_mb: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
        }
    }
}

impl PdfConfig {
    /// Size limit in bytes, if any.
    pub fn max_bytes(&self) -> Option<u64> {
        (self.max_file_size_mb > 0).then(|| self.max_file_size_mb * 1024 * 1024)
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Document title.
    pub title: String,

    /// Heading printed above the table.
    pub heading: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Resumen de importes".to_string(),
            heading: "Resumen de importes".to_string(),
        }
    }
}

impl LiqtarConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_rounding_modes_differ_on_ties() {
        let tie = Decimal::from_str("0.125").unwrap();
        assert_eq!(RoundingMode::HalfUp.round(tie), Decimal::from_str("0.13").unwrap());
        assert_eq!(RoundingMode::HalfEven.round(tie), Decimal::from_str("0.12").unwrap());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LiqtarConfig =
            serde_json::from_str(r#"{"extraction": {"strict": true}}"#).unwrap();
        assert!(config.extraction.strict);
        assert!(config.extraction.suppress_negative_iva);
        assert_eq!(config.extraction.rounding, RoundingMode::HalfUp);
        assert_eq!(config.pdf.max_file_size_mb, 50);
        assert_eq!(config.report.title, "Resumen de importes");
    }

    #[test]
    fn test_max_bytes() {
        assert_eq!(PdfConfig::default().max_bytes(), Some(50 * 1024 * 1024));
        assert_eq!(PdfConfig { max_file_size_mb: 0 }.max_bytes(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = LiqtarConfig::default();
        config.extraction.rounding = RoundingMode::HalfEven;
        config.save(&path).unwrap();

        let loaded = LiqtarConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.rounding, RoundingMode::HalfEven);
    }
}

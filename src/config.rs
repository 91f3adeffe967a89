use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::schema::ColumnKind;
use crate::error::{EdaError, Result};

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// What a kernel density estimate does when an axis has zero range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Smooth with `bandwidth_factor × max(|value|, 1)`.
    #[default]
    UnitScale,
    /// Fail with [`EdaError::ZeroBandwidth`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeConfig {
    /// Bandwidth as a fraction of the observed range.
    pub bandwidth_factor: f64,
    /// Points per axis of the evaluation grid.
    pub grid_size: usize,
    pub degenerate: DegeneratePolicy,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            bandwidth_factor: 0.1,
            grid_size: 50,
            degenerate: DegeneratePolicy::UnitScale,
        }
    }
}

/// Tunables for every derived chart. Missing JSON keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub kde: KdeConfig,
    pub histogram_bins: usize,
    pub outlier_sigma: f64,
    /// Kind assumed for columns the schema does not list.
    pub fallback_kind: ColumnKind,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kde: KdeConfig::default(),
            histogram_bins: 30,
            outlier_sigma: 3.0,
            fallback_kind: ColumnKind::Categorical,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EdaError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.kde.bandwidth_factor > 0.0 && self.kde.bandwidth_factor.is_finite()) {
            return Err(EdaError::InvalidConfig(format!(
                "kde.bandwidth_factor must be positive, got {}",
                self.kde.bandwidth_factor
            )));
        }
        if self.kde.grid_size < 2 {
            return Err(EdaError::InvalidConfig(format!(
                "kde.grid_size must be at least 2, got {}",
                self.kde.grid_size
            )));
        }
        if self.histogram_bins == 0 {
            return Err(EdaError::InvalidConfig("histogram_bins must be at least 1".into()));
        }
        if !(self.outlier_sigma > 0.0) {
            return Err(EdaError::InvalidConfig(format!(
                "outlier_sigma must be positive, got {}",
                self.outlier_sigma
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.kde.grid_size, 50);
        assert_eq!(config.kde.bandwidth_factor, 0.1);
        assert_eq!(config.histogram_bins, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config =
            AnalysisConfig::from_json_str(r#"{"kde": {"degenerate": "reject"}, "histogram_bins": 10}"#)
                .unwrap();
        assert_eq!(config.kde.degenerate, DegeneratePolicy::Reject);
        assert_eq!(config.kde.grid_size, 50);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.fallback_kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{"kde": {"grid_size": 1}}"#),
            Err(EdaError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{"kde": {"bandwidth_factor": 0}}"#),
            Err(EdaError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str("not json"),
            Err(EdaError::Json(_))
        ));
    }
}

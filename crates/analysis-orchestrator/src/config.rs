use analysis_core::{ScoringModel, SectorProfile};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    pub model: ScoringModel,
    /// Companies scored at the same time
    pub max_concurrency: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            model: ScoringModel::General,
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScreenerConfig {
    /// Load from `SCORING_MODEL` and `SCORING_CONCURRENCY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model = lookup("SCORING_MODEL")
            .unwrap_or_else(|| "general".to_string())
            .parse::<ScoringModel>()
            .map_err(anyhow::Error::msg)
            .context("Invalid SCORING_MODEL")?;
        let max_concurrency = lookup("SCORING_CONCURRENCY")
            .unwrap_or_else(|| DEFAULT_CONCURRENCY.to_string())
            .parse()
            .context("Invalid SCORING_CONCURRENCY")?;

        let config = Self {
            model,
            max_concurrency,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            anyhow::bail!("max_concurrency must be at least 1");
        }
        Ok(())
    }
}

/// Read a sector profile from JSON.
pub fn load_sector_profile(path: &Path) -> Result<SectorProfile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sector profile {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse sector profile {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::SectorTag;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScreenerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ScreenerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ScreenerConfig::from_lookup(lookup(&[
            ("SCORING_MODEL", "Banks"),
            ("SCORING_CONCURRENCY", "3"),
        ]))
        .unwrap();
        assert_eq!(config.model, ScoringModel::Bank);
        assert_eq!(config.max_concurrency, 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ScreenerConfig::from_lookup(lookup(&[("SCORING_MODEL", "momentum")])).is_err());
        assert!(ScreenerConfig::from_lookup(lookup(&[("SCORING_CONCURRENCY", "0")])).is_err());
        assert!(ScreenerConfig::from_lookup(lookup(&[("SCORING_CONCURRENCY", "many")])).is_err());
    }

    #[test]
    fn test_sector_profile_json() {
        let profile: SectorProfile = serde_json::from_str(
            r#"{
                "companies": {
                    "IBE.MC": { "name": "Iberdrola", "sector": "utility" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(profile.display_name("IBE.MC"), "Iberdrola");
        assert_eq!(profile.sector_of("IBE.MC"), SectorTag::Utility);
        // overrides fall back to the built-in table
        assert_eq!(profile.thresholds_for(SectorTag::Utility).roic_bar, 8.0);
    }
}

//! Sector reference data
//!
//! Identifier → display name and identifier → sector tag, plus the per-sector
//! threshold overrides used by the sector-adjusted scorer. Built once by the
//! caller and shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sector classification used to branch and perturb scoring thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorTag {
    Bank,
    Insurance,
    Utility,
    RealEstate,
    Telecom,
    Energy,
    Industrial,
    Consumer,
    Healthcare,
    Technology,
    Materials,
    Other,
}

impl SectorTag {
    /// Banks and insurers are scored on balance-sheet ratios instead of
    /// operating metrics.
    pub fn is_financial(&self) -> bool {
        matches!(self, SectorTag::Bank | SectorTag::Insurance)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectorTag::Bank => "Banking",
            SectorTag::Insurance => "Insurance",
            SectorTag::Utility => "Utilities",
            SectorTag::RealEstate => "Real Estate",
            SectorTag::Telecom => "Telecom",
            SectorTag::Energy => "Energy",
            SectorTag::Industrial => "Industrials",
            SectorTag::Consumer => "Consumer",
            SectorTag::Healthcare => "Healthcare",
            SectorTag::Technology => "Technology",
            SectorTag::Materials => "Materials",
            SectorTag::Other => "Other",
        }
    }
}

/// Thresholds the sector-adjusted scorer reads per sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorThresholds {
    /// Minimum ROIC (percent) for the "good" quality tier
    pub roic_bar: f64,
    /// Highest acceptable net-debt/EBITDA
    pub max_net_debt_ebitda: f64,
}

impl Default for SectorThresholds {
    fn default() -> Self {
        Self {
            roic_bar: 15.0,
            max_net_debt_ebitda: 3.0,
        }
    }
}

/// Built-in overrides. Sectors not listed use [`SectorThresholds::default`].
pub const DEFAULT_SECTOR_OVERRIDES: &[(SectorTag, SectorThresholds)] = &[
    (SectorTag::Utility, SectorThresholds { roic_bar: 8.0, max_net_debt_ebitda: 5.0 }),
    (SectorTag::RealEstate, SectorThresholds { roic_bar: 6.0, max_net_debt_ebitda: 7.0 }),
    (SectorTag::Telecom, SectorThresholds { roic_bar: 8.0, max_net_debt_ebitda: 4.5 }),
    (SectorTag::Energy, SectorThresholds { roic_bar: 12.0, max_net_debt_ebitda: 3.0 }),
];

/// A company entry in the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub sector: SectorTag,
}

/// Immutable reference configuration passed into the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProfile {
    #[serde(default)]
    companies: HashMap<String, CompanyInfo>,
    #[serde(default = "default_overrides", deserialize_with = "merge_overrides")]
    overrides: HashMap<SectorTag, SectorThresholds>,
}

fn default_overrides() -> HashMap<SectorTag, SectorThresholds> {
    DEFAULT_SECTOR_OVERRIDES.iter().copied().collect()
}

/// Overrides read from configuration extend the built-in table instead of
/// replacing it.
fn merge_overrides<'de, D>(deserializer: D) -> Result<HashMap<SectorTag, SectorThresholds>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let configured = HashMap::<SectorTag, SectorThresholds>::deserialize(deserializer)?;
    let mut overrides = default_overrides();
    overrides.extend(configured);
    Ok(overrides)
}

impl Default for SectorProfile {
    fn default() -> Self {
        Self {
            companies: HashMap::new(),
            overrides: default_overrides(),
        }
    }
}

impl SectorProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(mut self, symbol: &str, name: &str, sector: SectorTag) -> Self {
        self.companies.insert(
            symbol.to_string(),
            CompanyInfo {
                name: name.to_string(),
                sector,
            },
        );
        self
    }

    pub fn with_override(mut self, sector: SectorTag, thresholds: SectorThresholds) -> Self {
        self.overrides.insert(sector, thresholds);
        self
    }

    /// Display name, falling back to the identifier itself.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.companies
            .get(symbol)
            .map(|c| c.name.as_str())
            .unwrap_or(symbol)
    }

    pub fn sector_of(&self, symbol: &str) -> SectorTag {
        self.companies
            .get(symbol)
            .map(|c| c.sector)
            .unwrap_or(SectorTag::Other)
    }

    pub fn thresholds_for(&self, sector: SectorTag) -> SectorThresholds {
        self.overrides.get(&sector).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One financial statement: line-item name to a multi-period series.
///
/// Periods are ordered most-recent-first, so index 0 is the current period and
/// index 1 the prior period. A cell may be absent when the provider did not
/// report the item for that period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement {
    items: BTreeMap<String, Vec<Option<f64>>>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, item: &str, values: &[f64]) -> Self {
        self.insert(item, values.iter().copied().map(Some).collect());
        self
    }

    pub fn insert(&mut self, item: &str, values: Vec<Option<f64>>) {
        self.items.insert(item.to_string(), values);
    }

    pub fn series(&self, item: &str) -> Option<&[Option<f64>]> {
        self.items.get(item).map(|v| v.as_slice())
    }

    /// Value of `item` at `period`, ignoring non-finite cells.
    pub fn value(&self, item: &str, period: usize) -> Option<f64> {
        self.items
            .get(item)
            .and_then(|series| series.get(period).copied().flatten())
            .filter(|v| v.is_finite())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(|series| series.iter().all(|v| v.is_none()))
    }

    /// Longest series length across all line items.
    pub fn periods(&self) -> usize {
        self.items.values().map(|s| s.len()).max().unwrap_or(0)
    }
}

/// Immutable per-company input handed over by the data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSnapshot {
    pub symbol: String,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
    /// Fraction, e.g. 0.045 for 4.5%
    pub dividend_yield: Option<f64>,
    /// Provider-reported, fraction
    pub return_on_invested_capital: Option<f64>,
    /// Provider-reported, fraction
    pub return_on_equity: Option<f64>,
    pub price_to_book: Option<f64>,
    pub trailing_eps: Option<f64>,
    /// Analyst forward EPS growth estimate in percent
    pub earnings_growth_estimate: Option<f64>,
    /// Multi-year average EV/EBITDA used as the historical valuation band
    pub historical_ev_ebitda: Option<f64>,
    /// 52-week price change, fraction
    pub price_change_52w: Option<f64>,
    pub income_statement: Statement,
    pub balance_sheet: Statement,
    pub cash_flow: Statement,
}

impl FinancialSnapshot {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }
}

/// Gross/operating margin direction between the prior and current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTrend {
    Rising,
    FlatOrMixed,
    Falling,
}

impl MarginTrend {
    pub fn label(&self) -> &'static str {
        match self {
            MarginTrend::Rising => "rising",
            MarginTrend::FlatOrMixed => "flat/mixed",
            MarginTrend::Falling => "falling",
        }
    }
}

/// Current EV/EBITDA relative to the company's own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBand {
    Undervalued,
    InLine,
    Overvalued,
}

impl ValuationBand {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationBand::Undervalued => "undervalued",
            ValuationBand::InLine => "in line",
            ValuationBand::Overvalued => "overvalued",
        }
    }
}

/// Why a metric fell back to its neutral value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    MissingField { field: String },
    InsufficientHistory { metric: String, needed: usize, available: usize },
}

/// Raw figures for one period, consumed by the accounting-quality checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodFigures {
    pub return_on_assets: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub net_income: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub current_ratio: Option<f64>,
    pub shares: Option<f64>,
    pub gross_margin: Option<f64>,
    pub asset_turnover: Option<f64>,
}

/// Flat set of derived ratios. Every value is finite; unavailable inputs leave
/// the metric at 0 (or its documented neutral value) and record a [`DataIssue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub price: f64,
    pub market_cap: f64,
    /// Percent
    pub roic: f64,
    /// Percent
    pub roe: f64,
    pub cash_conversion: f64,
    pub ebitda: f64,
    pub net_debt: f64,
    pub net_debt_ebitda: f64,
    pub interest_coverage: f64,
    pub altman_z: f64,
    /// Percent
    pub fcf_yield: f64,
    pub ev_ebitda: f64,
    /// Percent, 3-year compound
    pub revenue_cagr: f64,
    pub margin_trend: MarginTrend,
    pub valuation_band: ValuationBand,
    /// Percent
    pub eps_growth: f64,
    /// Percent
    pub dividend_yield: f64,
    pub eps: f64,
    pub book_value_per_share: f64,
    pub price_to_book: f64,
    /// Percent
    pub net_interest_margin: f64,
    /// Cost-to-income, percent
    pub efficiency: f64,
    /// Percent
    pub equity_to_assets: f64,
    /// Credit-loss provisions over net interest income, percent
    pub credit_risk: f64,
    /// Percent
    pub asset_growth: f64,
    /// 52-week price change, percent
    pub momentum: f64,
    pub current: PeriodFigures,
    pub prior: Option<PeriodFigures>,
    pub issues: Vec<DataIssue>,
}

impl Default for NormalizedMetrics {
    fn default() -> Self {
        Self {
            price: 0.0,
            market_cap: 0.0,
            roic: 0.0,
            roe: 0.0,
            cash_conversion: 0.0,
            ebitda: 0.0,
            net_debt: 0.0,
            net_debt_ebitda: 0.0,
            interest_coverage: 0.0,
            altman_z: 0.0,
            fcf_yield: 0.0,
            ev_ebitda: 0.0,
            revenue_cagr: 0.0,
            margin_trend: MarginTrend::FlatOrMixed,
            valuation_band: ValuationBand::InLine,
            eps_growth: 0.0,
            dividend_yield: 0.0,
            eps: 0.0,
            book_value_per_share: 0.0,
            price_to_book: 0.0,
            net_interest_margin: 0.0,
            efficiency: 60.0,
            equity_to_assets: 0.0,
            credit_risk: 0.0,
            asset_growth: 0.0,
            momentum: 0.0,
            current: PeriodFigures::default(),
            prior: None,
            issues: Vec::new(),
        }
    }
}

impl NormalizedMetrics {
    pub fn has_issue_for(&self, name: &str) -> bool {
        self.issues.iter().any(|issue| match issue {
            DataIssue::MissingField { field } => field == name,
            DataIssue::InsufficientHistory { metric, .. } => metric == name,
        })
    }
}

/// Which pillar model produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    General,
    Bank,
    Expert,
}

impl std::str::FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(ScoringModel::General),
            "bank" | "banks" => Ok(ScoringModel::Bank),
            "expert" => Ok(ScoringModel::Expert),
            other => Err(format!("unknown scoring model '{}'", other)),
        }
    }
}

/// Categorical verdict. Each model uses its own subset of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    EliteBuy,
    TopPick,
    StrongBuy,
    Buy,
    Hold,
    Watchlist,
    Sell,
    Avoid,
    NoData,
}

impl Recommendation {
    /// General model: ≥90 / ≥75 / ≥60 / ≥40 / below.
    pub fn general(score: i32) -> Self {
        match score {
            s if s >= 90 => Recommendation::EliteBuy,
            s if s >= 75 => Recommendation::Buy,
            s if s >= 60 => Recommendation::Hold,
            s if s >= 40 => Recommendation::Watchlist,
            _ => Recommendation::Avoid,
        }
    }

    /// Bank model: ≥85 / ≥70 / ≥50 / below.
    pub fn bank(score: i32) -> Self {
        match score {
            s if s >= 85 => Recommendation::TopPick,
            s if s >= 70 => Recommendation::Buy,
            s if s >= 50 => Recommendation::Hold,
            _ => Recommendation::Avoid,
        }
    }

    /// Expert model: ≥80 / ≥60 / ≤40 / in between.
    pub fn expert(score: i32) -> Self {
        match score {
            s if s >= 80 => Recommendation::StrongBuy,
            s if s >= 60 => Recommendation::Buy,
            s if s <= 40 => Recommendation::Sell,
            _ => Recommendation::Hold,
        }
    }

    pub fn for_model(model: ScoringModel, score: i32) -> Self {
        match model {
            ScoringModel::General => Self::general(score),
            ScoringModel::Bank => Self::bank(score),
            ScoringModel::Expert => Self::expert(score),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::EliteBuy => "Strong Buy (Elite)",
            Recommendation::TopPick => "Top Pick (Banks)",
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Watchlist => "Watchlist",
            Recommendation::Sell => "Sell",
            Recommendation::Avoid => "Avoid",
            Recommendation::NoData => "no data available",
        }
    }
}

/// Points earned in one pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    pub name: String,
    pub points: i32,
    pub max: i32,
}

/// Result of one pillar model for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub model: ScoringModel,
    pub total: i32,
    pub pillars: Vec<PillarScore>,
    /// One entry per evaluated criterion, in pillar order
    pub rationale: Vec<String>,
    pub recommendation: Recommendation,
}

impl ScoreBreakdown {
    pub fn pillar(&self, name: &str) -> Option<&PillarScore> {
        self.pillars.iter().find(|p| p.name == name)
    }

    pub fn pillar_sum(&self) -> i32 {
        self.pillars.iter().map(|p| p.points).sum()
    }
}

/// One row of the ranked output table. Output only: NaN cells serialize to
/// JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    /// NaN when the company could not be scored
    pub score: f64,
    pub recommendation: String,
    /// NaN when unknown
    pub price: f64,
    /// Model-specific metric columns
    pub metrics: serde_json::Value,
}

impl RankedRow {
    pub fn has_data(&self) -> bool {
        !self.score.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_breakpoints_are_exhaustive() {
        let cases = [
            (90, Recommendation::EliteBuy),
            (89, Recommendation::Buy),
            (75, Recommendation::Buy),
            (74, Recommendation::Hold),
            (60, Recommendation::Hold),
            (59, Recommendation::Watchlist),
            (40, Recommendation::Watchlist),
            (39, Recommendation::Avoid),
            (0, Recommendation::Avoid),
            (100, Recommendation::EliteBuy),
        ];
        for (score, expected) in cases {
            assert_eq!(Recommendation::general(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_bank_breakpoints() {
        assert_eq!(Recommendation::bank(85), Recommendation::TopPick);
        assert_eq!(Recommendation::bank(84), Recommendation::Buy);
        assert_eq!(Recommendation::bank(70), Recommendation::Buy);
        assert_eq!(Recommendation::bank(69), Recommendation::Hold);
        assert_eq!(Recommendation::bank(50), Recommendation::Hold);
        assert_eq!(Recommendation::bank(49), Recommendation::Avoid);
    }

    #[test]
    fn test_expert_breakpoints_include_negative_scores() {
        assert_eq!(Recommendation::expert(80), Recommendation::StrongBuy);
        assert_eq!(Recommendation::expert(79), Recommendation::Buy);
        assert_eq!(Recommendation::expert(60), Recommendation::Buy);
        assert_eq!(Recommendation::expert(59), Recommendation::Hold);
        assert_eq!(Recommendation::expert(41), Recommendation::Hold);
        assert_eq!(Recommendation::expert(40), Recommendation::Sell);
        assert_eq!(Recommendation::expert(-10), Recommendation::Sell);
    }

    #[test]
    fn test_statement_value_skips_missing_and_non_finite() {
        let mut stmt = Statement::new().with("Total Revenue", &[100.0, 90.0]);
        stmt.insert("EBIT", vec![None, Some(f64::NAN)]);

        assert_eq!(stmt.value("Total Revenue", 1), Some(90.0));
        assert_eq!(stmt.value("Total Revenue", 2), None);
        assert_eq!(stmt.value("EBIT", 0), None);
        assert_eq!(stmt.value("EBIT", 1), None);
        assert_eq!(stmt.periods(), 2);
        assert!(!stmt.is_empty());
    }

    #[test]
    fn test_statement_with_only_missing_cells_is_empty() {
        let mut stmt = Statement::new();
        stmt.insert("Total Assets", vec![None, None]);
        assert!(stmt.is_empty());
        assert!(Statement::new().is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let json = r#"{
            "symbol": "ITX.MC",
            "price": 48.5,
            "income_statement": { "Total Revenue": [35947.0, 32569.0] }
        }"#;
        let snap: FinancialSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.symbol, "ITX.MC");
        assert_eq!(snap.price, Some(48.5));
        assert_eq!(snap.income_statement.value("Total Revenue", 0), Some(35947.0));
        assert!(snap.balance_sheet.is_empty());
    }

    #[test]
    fn test_scoring_model_from_str() {
        assert_eq!("Expert".parse::<ScoringModel>(), Ok(ScoringModel::Expert));
        assert_eq!("banks".parse::<ScoringModel>(), Ok(ScoringModel::Bank));
        assert!("momentum".parse::<ScoringModel>().is_err());
    }
}

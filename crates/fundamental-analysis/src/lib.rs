pub mod bank;
pub mod expert;
pub mod fields;
pub mod general;
pub mod indicators;
pub mod ladder;
pub mod metrics;

pub use bank::BankScorer;
pub use expert::ExpertScorer;
pub use general::GeneralScorer;
pub use indicators::{AccountingQuality, Indicators};
pub use metrics::{bankruptcy_risk_proxy, normalize, safe_div};

use analysis_core::{
    FinancialSnapshot, NormalizedMetrics, PillarScore, PillarScorer, Recommendation, ScoreBreakdown,
    ScoringContext, ScoringError, ScoringModel, SectorProfile, SectorTag,
};
use ladder::PillarTally;
use serde::Serialize;
use serde_json::json;

/// Fold pillar tallies into a breakdown. Each pillar is capped at its maximum;
/// `ceiling` optionally caps the total as well.
pub(crate) fn assemble(model: ScoringModel, tallies: Vec<PillarTally>, ceiling: Option<i32>) -> ScoreBreakdown {
    let mut pillars = Vec::with_capacity(tallies.len());
    let mut rationale = Vec::new();
    for tally in tallies {
        pillars.push(PillarScore {
            name: tally.name.to_string(),
            points: tally.capped(),
            max: tally.max,
        });
        rationale.extend(tally.rationale);
    }

    let sum: i32 = pillars.iter().map(|p| p.points).sum();
    let total = match ceiling {
        Some(ceiling) => sum.min(ceiling),
        None => sum,
    };

    ScoreBreakdown {
        model,
        total,
        pillars,
        rationale,
        recommendation: Recommendation::for_model(model, total),
    }
}

/// Everything the engine derived for one company.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyScore {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub metrics: NormalizedMetrics,
    pub indicators: Indicators,
    pub breakdown: ScoreBreakdown,
}

impl CompanyScore {
    /// Model-specific columns for the ranked table.
    pub fn metric_columns(&self) -> serde_json::Value {
        let m = &self.metrics;
        match self.breakdown.model {
            ScoringModel::General => json!({
                "dividend_yield": m.dividend_yield,
                "fcf_yield": m.fcf_yield,
                "ev_ebitda": m.ev_ebitda,
                "valuation_vs_history": m.valuation_band.label(),
                "roic": m.roic,
                "margin_trend": m.margin_trend.label(),
                "revenue_cagr_3y": m.revenue_cagr,
                "eps_growth_estimate": m.eps_growth,
                "cash_conversion": m.cash_conversion,
                "net_debt_ebitda": m.net_debt_ebitda,
                "interest_coverage": m.interest_coverage,
                "bankruptcy_risk": m.altman_z,
            }),
            ScoringModel::Bank => json!({
                "price_to_book": m.price_to_book,
                "dividend_yield": m.dividend_yield,
                "roe": m.roe,
                "net_interest_margin": m.net_interest_margin,
                "efficiency": m.efficiency,
                "equity_to_assets": m.equity_to_assets,
                "asset_growth": m.asset_growth,
                "credit_risk": m.credit_risk,
            }),
            ScoringModel::Expert => json!({
                "accounting_quality": self.indicators.accounting_quality.score,
                "intrinsic_value": self.indicators.intrinsic_value,
                "intrinsic_upside": self.indicators.intrinsic_upside,
                "roic": m.roic,
                "net_debt_ebitda": m.net_debt_ebitda,
                "fcf_yield": m.fcf_yield,
                "revenue_cagr_3y": m.revenue_cagr,
                "roe": m.roe,
                "price_to_book": m.price_to_book,
                "dividend_yield": m.dividend_yield,
                "momentum": m.momentum,
            }),
        }
    }
}

/// Stateless scoring engine: snapshot in, breakdown out.
pub struct ScoringEngine {
    general: GeneralScorer,
    bank: BankScorer,
    expert: ExpertScorer,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            general: GeneralScorer::new(),
            bank: BankScorer::new(),
            expert: ExpertScorer::new(),
        }
    }

    pub fn scorer(&self, model: ScoringModel) -> &dyn PillarScorer {
        match model {
            ScoringModel::General => &self.general,
            ScoringModel::Bank => &self.bank,
            ScoringModel::Expert => &self.expert,
        }
    }

    /// Pillar model actually applied to a company of `sector`. The general
    /// and bank models are mutually exclusive: financials always get the bank
    /// pillars and everyone else the general ones. The expert model routes by
    /// sector on its own.
    pub fn model_for(requested: ScoringModel, sector: SectorTag) -> ScoringModel {
        match requested {
            ScoringModel::General if sector.is_financial() => ScoringModel::Bank,
            ScoringModel::Bank if !sector.is_financial() => ScoringModel::General,
            other => other,
        }
    }

    /// Reject snapshots that carry no usable statements at all.
    pub fn validate(snapshot: &FinancialSnapshot) -> Result<(), ScoringError> {
        if snapshot.income_statement.is_empty() {
            return Err(ScoringError::InvalidSnapshot(format!(
                "{}: income statement is empty",
                snapshot.symbol
            )));
        }
        if snapshot.balance_sheet.is_empty() {
            return Err(ScoringError::InvalidSnapshot(format!(
                "{}: balance sheet is empty",
                snapshot.symbol
            )));
        }
        Ok(())
    }

    /// Score one company under `model`. Pure: the same snapshot and profile
    /// always produce the same result.
    pub fn score(
        &self,
        snapshot: &FinancialSnapshot,
        profile: &SectorProfile,
        model: ScoringModel,
    ) -> Result<CompanyScore, ScoringError> {
        Self::validate(snapshot)?;

        let metrics = normalize(snapshot);
        let indicators = Indicators::from_metrics(&metrics);
        let sector = profile.sector_of(&snapshot.symbol);
        let context = ScoringContext {
            sector,
            thresholds: profile.thresholds_for(sector),
            accounting_quality: indicators.accounting_quality.score,
            intrinsic_upside: indicators.intrinsic_upside,
        };

        let model = Self::model_for(model, sector);
        let breakdown = self.scorer(model).score(&metrics, &context);

        Ok(CompanyScore {
            symbol: snapshot.symbol.clone(),
            name: profile.display_name(&snapshot.symbol).to_string(),
            sector: sector.label().to_string(),
            metrics,
            indicators,
            breakdown,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

//! Sector-adjusted expert model
//!
//! Financials route to a banking rule set. Everyone else gets the general rule
//! set with thresholds taken from the sector override table, plus a bonus or
//! penalty from the accounting-quality score. The total is capped at 100 but
//! never floored, so a weak company with poor accounting quality can finish
//! below zero.

use crate::assemble;
use crate::ladder::{rationale_line, Assessment, Band, Bound, Ladder, PillarTally, Unit};
use analysis_core::{NormalizedMetrics, PillarScorer, ScoreBreakdown, ScoringContext, ScoringModel};

pub const BANK_PROFITABILITY: &str = "Profitability";
pub const BANK_VALUATION: &str = "Valuation & Income";
pub const BANK_MOMENTUM: &str = "Momentum";

pub const QUALITY: &str = "Quality";
pub const LEVERAGE: &str = "Leverage";
pub const VALUATION: &str = "Valuation";
pub const GROWTH: &str = "Growth";
pub const ACCOUNTING: &str = "Accounting Quality";

const MAX_TOTAL: i32 = 100;

const BANK_ROE: Ladder = Ladder::new(
    "ROE",
    Unit::Percent,
    &[
        Band::new(Bound::Above(15.0), 30, "excellent"),
        Band::new(Bound::AtLeast(10.0), 20, "good"),
        Band::new(Bound::AtLeast(6.0), 10, "modest"),
    ],
    "weak",
);

const BANK_DIVIDEND: Ladder = Ladder::new(
    "Dividend yield",
    Unit::Percent,
    &[
        Band::new(Bound::Above(5.0), 20, "high"),
        Band::new(Bound::AtLeast(3.0), 10, "medium"),
    ],
    "low",
);

const MOMENTUM: Ladder = Ladder::new(
    "52-week momentum",
    Unit::Percent,
    &[
        Band::new(Bound::Above(10.0), 20, "strong"),
        Band::new(Bound::AtLeast(0.0), 10, "positive"),
    ],
    "negative",
);

const FCF_YIELD: Ladder = Ladder::new(
    "FCF yield",
    Unit::Percent,
    &[
        Band::new(Bound::Above(6.0), 15, "high"),
        Band::new(Bound::AtLeast(3.0), 8, "medium"),
    ],
    "low",
);

const MARGIN_OF_SAFETY: Ladder = Ladder::new(
    "Upside to intrinsic value",
    Unit::Percent,
    &[
        Band::new(Bound::Above(20.0), 10, "wide"),
        Band::new(Bound::Above(0.0), 5, "narrow"),
    ],
    "none",
);

const REVENUE_CAGR: Ladder = Ladder::new(
    "Revenue CAGR (3y)",
    Unit::Percent,
    &[
        Band::new(Bound::Above(8.0), 15, "strong"),
        Band::new(Bound::AtLeast(3.0), 8, "moderate"),
    ],
    "weak",
);

const ACCOUNTING_QUALITY: Ladder = Ladder::new(
    "Accounting quality score",
    Unit::Count,
    &[
        Band::new(Bound::AtLeast(7.0), 15, "strong"),
        Band::new(Bound::AtLeast(5.0), 5, "average"),
        Band::new(Bound::AtLeast(0.0), -10, "weak"),
    ],
    "weak",
);

/// Cheap book value backed by real profitability.
fn bargain(price_to_book: f64, roe: f64) -> Assessment {
    let shown = format!("P/B {:.2}x vs ROE {:.1}%", price_to_book, roe);
    let (points, verdict) = if price_to_book > 0.0 && price_to_book < 1.0 && roe >= 10.0 {
        (30, "bargain")
    } else if price_to_book > 0.0 && price_to_book <= 1.5 && roe >= 8.0 {
        (15, "fair for returns")
    } else {
        (0, "no discount")
    };
    Assessment {
        points,
        rationale: rationale_line(points, &format!("{} ({})", verdict, shown)),
    }
}

fn margin_of_safety(upside: Option<f64>) -> Assessment {
    match upside {
        Some(upside) => MARGIN_OF_SAFETY.evaluate(upside),
        None => Assessment {
            points: 0,
            rationale: rationale_line(0, "Intrinsic value unavailable"),
        },
    }
}

/// Sector-adjusted single-pass scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertScorer;

impl ExpertScorer {
    pub fn new() -> Self {
        Self
    }

    fn score_financial(&self, m: &NormalizedMetrics) -> ScoreBreakdown {
        let mut profitability = PillarTally::new(BANK_PROFITABILITY, 30);
        profitability.add(BANK_ROE.evaluate(m.roe));

        let mut valuation = PillarTally::new(BANK_VALUATION, 50);
        valuation.add(bargain(m.price_to_book, m.roe));
        valuation.add(BANK_DIVIDEND.evaluate(m.dividend_yield));

        let mut momentum = PillarTally::new(BANK_MOMENTUM, 20);
        momentum.add(MOMENTUM.evaluate(m.momentum));

        assemble(
            ScoringModel::Expert,
            vec![profitability, valuation, momentum],
            Some(MAX_TOTAL),
        )
    }

    fn score_general(&self, m: &NormalizedMetrics, ctx: &ScoringContext) -> ScoreBreakdown {
        let bar = ctx.thresholds.roic_bar;
        let roic_bands = [
            Band::new(Bound::Above(bar * 1.5), 25, "well above sector bar"),
            Band::new(Bound::AtLeast(bar), 15, "above sector bar"),
        ];
        let roic = Ladder::new("ROIC", Unit::Percent, &roic_bands, "below sector bar");

        let ceiling = ctx.thresholds.max_net_debt_ebitda;
        let leverage_bands = [
            Band::new(Bound::Below(ceiling / 2.0), 20, "conservative"),
            Band::new(Bound::AtMost(ceiling), 10, "within sector tolerance"),
        ];
        let leverage = Ladder::new(
            "Net debt/EBITDA",
            Unit::Multiple,
            &leverage_bands,
            "above sector tolerance",
        );

        let mut quality = PillarTally::new(QUALITY, 25);
        quality.add(roic.evaluate(m.roic));

        let mut debt = PillarTally::new(LEVERAGE, 20);
        debt.add(leverage.evaluate(m.net_debt_ebitda));

        let mut valuation = PillarTally::new(VALUATION, 25);
        valuation.add(FCF_YIELD.evaluate(m.fcf_yield));
        valuation.add(margin_of_safety(ctx.intrinsic_upside));

        let mut growth = PillarTally::new(GROWTH, 15);
        growth.add(REVENUE_CAGR.evaluate(m.revenue_cagr));

        let mut accounting = PillarTally::new(ACCOUNTING, 15);
        accounting.add(ACCOUNTING_QUALITY.evaluate(ctx.accounting_quality as f64));

        assemble(
            ScoringModel::Expert,
            vec![quality, debt, valuation, growth, accounting],
            Some(MAX_TOTAL),
        )
    }
}

impl PillarScorer for ExpertScorer {
    fn score(&self, m: &NormalizedMetrics, ctx: &ScoringContext) -> ScoreBreakdown {
        if ctx.sector.is_financial() {
            self.score_financial(m)
        } else {
            self.score_general(m, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Recommendation, SectorProfile, SectorTag};

    fn ctx(sector: SectorTag, accounting_quality: u8, upside: Option<f64>) -> ScoringContext {
        ScoringContext {
            sector,
            thresholds: SectorProfile::new().thresholds_for(sector),
            accounting_quality,
            intrinsic_upside: upside,
        }
    }

    fn compounder() -> NormalizedMetrics {
        NormalizedMetrics {
            roic: 30.0,
            net_debt_ebitda: 0.8,
            fcf_yield: 7.0,
            revenue_cagr: 9.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_strong_company_hits_the_ceiling() {
        let result = ExpertScorer.score(&compounder(), &ctx(SectorTag::Consumer, 8, Some(35.0)));
        assert_eq!(result.total, 100);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
        assert_eq!(result.rationale.len(), 6);
    }

    #[test]
    fn test_accounting_quality_bonus_and_penalty() {
        let m = compounder();
        let strong = ExpertScorer.score(&m, &ctx(SectorTag::Consumer, 7, None));
        let average = ExpertScorer.score(&m, &ctx(SectorTag::Consumer, 5, None));
        let weak = ExpertScorer.score(&m, &ctx(SectorTag::Consumer, 4, None));

        assert_eq!(strong.pillar(ACCOUNTING).unwrap().points, 15);
        assert_eq!(average.pillar(ACCOUNTING).unwrap().points, 5);
        assert_eq!(weak.pillar(ACCOUNTING).unwrap().points, -10);
        assert_eq!(strong.total - weak.total, 25);
        assert!(weak.rationale.last().unwrap().starts_with("❌"));
    }

    #[test]
    fn test_total_is_not_floored() {
        let m = NormalizedMetrics {
            roic: 2.0,
            net_debt_ebitda: 9.0,
            fcf_yield: -4.0,
            revenue_cagr: -6.0,
            ..Default::default()
        };
        let result = ExpertScorer.score(&m, &ctx(SectorTag::Industrial, 2, Some(-40.0)));
        assert_eq!(result.total, -10);
        assert_eq!(result.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_utility_thresholds_are_relaxed() {
        let m = NormalizedMetrics {
            roic: 9.0,
            net_debt_ebitda: 4.5,
            ..Default::default()
        };
        let industrial = ExpertScorer.score(&m, &ctx(SectorTag::Industrial, 6, None));
        let utility = ExpertScorer.score(&m, &ctx(SectorTag::Utility, 6, None));

        assert_eq!(industrial.pillar(QUALITY).unwrap().points, 0);
        assert_eq!(utility.pillar(QUALITY).unwrap().points, 15);
        assert_eq!(industrial.pillar(LEVERAGE).unwrap().points, 0);
        assert_eq!(utility.pillar(LEVERAGE).unwrap().points, 10);
    }

    #[test]
    fn test_real_estate_leverage_tolerance() {
        let m = NormalizedMetrics {
            net_debt_ebitda: 6.5,
            ..Default::default()
        };
        let result = ExpertScorer.score(&m, &ctx(SectorTag::RealEstate, 5, None));
        assert_eq!(result.pillar(LEVERAGE).unwrap().points, 10);
    }

    #[test]
    fn test_bank_branch() {
        let m = NormalizedMetrics {
            roe: 16.0,
            price_to_book: 0.8,
            dividend_yield: 6.0,
            momentum: 12.0,
            // operating metrics must not matter for financials
            roic: 0.0,
            net_debt_ebitda: 25.0,
            ..Default::default()
        };
        let result = ExpertScorer.score(&m, &ctx(SectorTag::Bank, 0, None));
        assert_eq!(result.total, 100);
        assert_eq!(result.pillars.len(), 3);
        assert!(result.pillar(ACCOUNTING).is_none());
        assert!(result.rationale[1].contains("bargain"));
    }

    #[test]
    fn test_bargain_rule() {
        assert_eq!(bargain(0.8, 12.0).points, 30);
        assert_eq!(bargain(0.8, 9.0).points, 15);
        assert_eq!(bargain(1.5, 8.0).points, 15);
        assert_eq!(bargain(1.6, 20.0).points, 0);
        assert_eq!(bargain(0.0, 20.0).points, 0);
    }

    #[test]
    fn test_insurer_routes_to_bank_rules() {
        let m = NormalizedMetrics {
            roe: 11.0,
            price_to_book: 1.2,
            dividend_yield: 4.0,
            momentum: -5.0,
            ..Default::default()
        };
        let result = ExpertScorer.score(&m, &ctx(SectorTag::Insurance, 9, None));
        assert_eq!(result.total, 20 + 15 + 10);
        assert_eq!(result.recommendation, Recommendation::Hold);
    }
}

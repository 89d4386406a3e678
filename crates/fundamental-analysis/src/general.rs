//! Four-pillar quality score for non-financial companies (max 100).

use crate::ladder::{rationale_line, Assessment, Band, Bound, Ladder, PillarTally, Unit};
use crate::assemble;
use analysis_core::{
    MarginTrend, NormalizedMetrics, PillarScorer, ScoreBreakdown, ScoringContext, ScoringModel,
    ValuationBand,
};

pub const PROFITABILITY: &str = "Profitability & Quality";
pub const STRENGTH: &str = "Financial Strength";
pub const VALUATION: &str = "Valuation";
pub const GROWTH: &str = "Growth";

const ROIC: Ladder = Ladder::new(
    "ROIC",
    Unit::Percent,
    &[
        Band::new(Bound::Above(20.0), 15, "excellent"),
        Band::new(Bound::AtLeast(10.0), 10, "good"),
    ],
    "low",
);

const CASH_CONVERSION: Ladder = Ladder::new(
    "Cash conversion",
    Unit::Multiple,
    &[
        Band::new(Bound::Above(0.85), 10, "high"),
        Band::new(Bound::AtLeast(0.50), 5, "medium"),
    ],
    "low",
);

const NET_DEBT_EBITDA: Ladder = Ladder::new(
    "Net debt/EBITDA",
    Unit::Multiple,
    &[
        Band::new(Bound::Below(1.5), 10, "low"),
        Band::new(Bound::AtMost(3.0), 5, "moderate"),
    ],
    "high",
);

const INTEREST_COVERAGE: Ladder = Ladder::new(
    "Interest coverage",
    Unit::Multiple,
    &[
        Band::new(Bound::Above(10.0), 8, "excellent"),
        Band::new(Bound::AtLeast(4.0), 4, "acceptable"),
    ],
    "dangerous",
);

const BANKRUPTCY_RISK: Ladder = Ladder::new(
    "Z-score",
    Unit::Plain,
    &[
        Band::new(Bound::Above(3.0), 7, "safe zone"),
        Band::new(Bound::AtLeast(1.8), 3, "grey zone"),
    ],
    "distress zone",
);

const FCF_YIELD: Ladder = Ladder::new(
    "FCF yield",
    Unit::Percent,
    &[
        Band::new(Bound::Above(5.0), 10, "high"),
        Band::new(Bound::AtLeast(2.5), 5, "medium"),
    ],
    "low",
);

const REVENUE_CAGR: Ladder = Ladder::new(
    "Revenue CAGR (3y)",
    Unit::Percent,
    &[
        Band::new(Bound::Above(10.0), 10, "strong"),
        Band::new(Bound::AtLeast(5.0), 5, "moderate"),
    ],
    "stagnant",
);

const EPS_GROWTH: Ladder = Ladder::new(
    "Forward EPS growth",
    Unit::Percent,
    &[
        Band::new(Bound::Above(10.0), 10, "strong"),
        Band::new(Bound::AtLeast(0.0), 5, "positive"),
    ],
    "negative",
);

fn margin_trend(trend: MarginTrend) -> Assessment {
    let points = match trend {
        MarginTrend::Rising => 10,
        MarginTrend::FlatOrMixed => 5,
        MarginTrend::Falling => 0,
    };
    Assessment {
        points,
        rationale: rationale_line(points, &format!("Margin trend {}", trend.label())),
    }
}

fn valuation_band(band: ValuationBand) -> Assessment {
    let points = match band {
        ValuationBand::Undervalued => 10,
        ValuationBand::InLine => 5,
        ValuationBand::Overvalued => 0,
    };
    Assessment {
        points,
        rationale: rationale_line(points, &format!("Valuation {} vs history", band.label())),
    }
}

/// General-industry pillar model. Total is the plain pillar sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralScorer;

impl GeneralScorer {
    pub fn new() -> Self {
        Self
    }
}

impl PillarScorer for GeneralScorer {
    fn score(&self, m: &NormalizedMetrics, _ctx: &ScoringContext) -> ScoreBreakdown {
        let mut profitability = PillarTally::new(PROFITABILITY, 35);
        profitability.add(ROIC.evaluate(m.roic));
        profitability.add(margin_trend(m.margin_trend));
        profitability.add(CASH_CONVERSION.evaluate(m.cash_conversion));

        let mut strength = PillarTally::new(STRENGTH, 25);
        strength.add(NET_DEBT_EBITDA.evaluate(m.net_debt_ebitda));
        strength.add(INTEREST_COVERAGE.evaluate(m.interest_coverage));
        strength.add(BANKRUPTCY_RISK.evaluate(m.altman_z));

        let mut valuation = PillarTally::new(VALUATION, 20);
        valuation.add(FCF_YIELD.evaluate(m.fcf_yield));
        valuation.add(valuation_band(m.valuation_band));

        let mut growth = PillarTally::new(GROWTH, 20);
        growth.add(REVENUE_CAGR.evaluate(m.revenue_cagr));
        growth.add(EPS_GROWTH.evaluate(m.eps_growth));

        assemble(
            ScoringModel::General,
            vec![profitability, strength, valuation, growth],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{SectorTag, SectorThresholds};

    fn ctx() -> ScoringContext {
        ScoringContext {
            sector: SectorTag::Industrial,
            thresholds: SectorThresholds::default(),
            accounting_quality: 0,
            intrinsic_upside: None,
        }
    }

    fn elite() -> NormalizedMetrics {
        NormalizedMetrics {
            roic: 25.0,
            margin_trend: MarginTrend::Rising,
            cash_conversion: 1.1,
            net_debt_ebitda: 0.5,
            interest_coverage: 20.0,
            altman_z: 4.2,
            fcf_yield: 6.5,
            valuation_band: ValuationBand::Undervalued,
            revenue_cagr: 12.0,
            eps_growth: 15.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_company_scores_100() {
        let result = GeneralScorer.score(&elite(), &ctx());
        assert_eq!(result.total, 100);
        assert_eq!(result.recommendation.label(), "Strong Buy (Elite)");
        assert_eq!(result.rationale.len(), 10);
    }

    #[test]
    fn test_total_is_exact_pillar_sum_within_maxima() {
        let mut m = elite();
        m.roic = 12.0;
        m.margin_trend = MarginTrend::Falling;
        m.net_debt_ebitda = 2.0;
        m.altman_z = 1.0;
        m.valuation_band = ValuationBand::InLine;
        m.eps_growth = -3.0;
        let result = GeneralScorer.score(&m, &ctx());

        assert_eq!(result.pillar(PROFITABILITY).unwrap().points, 10 + 0 + 10);
        assert_eq!(result.pillar(STRENGTH).unwrap().points, 5 + 8 + 0);
        assert_eq!(result.pillar(VALUATION).unwrap().points, 10 + 5);
        assert_eq!(result.pillar(GROWTH).unwrap().points, 10 + 0);
        assert_eq!(result.total, result.pillar_sum());
        assert_eq!(result.total, 58);
        for pillar in &result.pillars {
            assert!(pillar.points <= pillar.max, "{} exceeds max", pillar.name);
        }
    }

    #[test]
    fn test_roic_boundary() {
        let mut m = NormalizedMetrics::default();
        m.roic = 20.0;
        let at_cutoff = GeneralScorer.score(&m, &ctx());
        m.roic = 20.01;
        let above = GeneralScorer.score(&m, &ctx());
        assert_eq!(
            above.pillar(PROFITABILITY).unwrap().points - at_cutoff.pillar(PROFITABILITY).unwrap().points,
            5
        );
        assert!(at_cutoff.rationale[0].contains("ROIC good"));
        assert!(above.rationale[0].contains("(+15 pts)"));
    }

    #[test]
    fn test_default_metrics_score() {
        // Unavailable data: zero net debt, flat margins, in-line valuation and
        // 0% EPS growth are the only criteria that still earn points.
        let result = GeneralScorer.score(&NormalizedMetrics::default(), &ctx());
        assert_eq!(result.total, 5 + 10 + 5 + 5);
        assert_eq!(result.recommendation.label(), "Avoid");
    }

    #[test]
    fn test_rationale_in_pillar_order() {
        let result = GeneralScorer.score(&elite(), &ctx());
        assert!(result.rationale[0].starts_with("✅ ROIC"));
        assert!(result.rationale[1].contains("Margin trend rising"));
        assert!(result.rationale[3].contains("Net debt/EBITDA"));
        assert!(result.rationale[6].contains("FCF yield"));
        assert!(result.rationale[9].contains("Forward EPS growth"));
    }
}

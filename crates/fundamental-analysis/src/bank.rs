//! Bank pillar model: banking ratios instead of operating metrics (max 100).

use crate::assemble;
use crate::ladder::{Band, Bound, Ladder, PillarTally, Unit};
use analysis_core::{NormalizedMetrics, PillarScorer, ScoreBreakdown, ScoringContext, ScoringModel};

pub const PROFITABILITY: &str = "Profitability";
pub const SOLVENCY: &str = "Solvency";
pub const VALUATION: &str = "Valuation";
pub const GROWTH: &str = "Growth";

const NET_INTEREST_MARGIN: Ladder = Ladder::new(
    "NIM",
    Unit::Percent,
    &[
        Band::new(Bound::Above(3.0), 15, "excellent"),
        Band::new(Bound::AtLeast(2.0), 10, "solid"),
    ],
    "low",
);

const RETURN_ON_EQUITY: Ladder = Ladder::new(
    "ROE",
    Unit::Percent,
    &[
        Band::new(Bound::Above(12.0), 10, "high"),
        Band::new(Bound::AtLeast(8.0), 5, "medium"),
    ],
    "low",
);

const EFFICIENCY: Ladder = Ladder::new(
    "Cost-to-income",
    Unit::Percent,
    &[
        Band::new(Bound::Below(50.0), 10, "efficient"),
        Band::new(Bound::AtMost(60.0), 5, "average"),
    ],
    "inefficient",
);

const EQUITY_TO_ASSETS: Ladder = Ladder::new(
    "Equity/assets",
    Unit::Percent,
    &[
        Band::new(Bound::Above(9.0), 15, "strong"),
        Band::new(Bound::AtLeast(6.0), 8, "adequate"),
    ],
    "thin",
);

const CREDIT_RISK: Ladder = Ladder::new(
    "Cost of risk",
    Unit::Percent,
    &[
        Band::new(Bound::Below(10.0), 15, "low"),
        Band::new(Bound::Below(20.0), 7, "moderate"),
    ],
    "high",
);

const PRICE_TO_BOOK: Ladder = Ladder::new(
    "P/B",
    Unit::Multiple,
    &[
        Band::new(Bound::Below(1.0), 10, "below book"),
        Band::new(Bound::AtMost(1.5), 5, "fair"),
    ],
    "expensive",
);

const DIVIDEND_YIELD: Ladder = Ladder::new(
    "Dividend yield",
    Unit::Percent,
    &[
        Band::new(Bound::Above(4.0), 10, "high"),
        Band::new(Bound::AtLeast(2.0), 5, "medium"),
    ],
    "low",
);

const ASSET_GROWTH: Ladder = Ladder::new(
    "Balance-sheet growth",
    Unit::Percent,
    &[
        Band::new(Bound::Above(5.0), 15, "strong"),
        Band::new(Bound::Above(0.0), 5, "positive"),
    ],
    "contracting",
);

/// Pillar model for banks and insurers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankScorer;

impl BankScorer {
    pub fn new() -> Self {
        Self
    }
}

impl PillarScorer for BankScorer {
    fn score(&self, m: &NormalizedMetrics, _ctx: &ScoringContext) -> ScoreBreakdown {
        let mut profitability = PillarTally::new(PROFITABILITY, 35);
        profitability.add(NET_INTEREST_MARGIN.evaluate(m.net_interest_margin));
        profitability.add(RETURN_ON_EQUITY.evaluate(m.roe));
        profitability.add(EFFICIENCY.evaluate(m.efficiency));

        let mut solvency = PillarTally::new(SOLVENCY, 30);
        solvency.add(EQUITY_TO_ASSETS.evaluate(m.equity_to_assets));
        solvency.add(CREDIT_RISK.evaluate(m.credit_risk));

        let mut valuation = PillarTally::new(VALUATION, 20);
        valuation.add(PRICE_TO_BOOK.evaluate(m.price_to_book));
        valuation.add(DIVIDEND_YIELD.evaluate(m.dividend_yield));

        let mut growth = PillarTally::new(GROWTH, 15);
        growth.add(ASSET_GROWTH.evaluate(m.asset_growth));

        assemble(
            ScoringModel::Bank,
            vec![profitability, solvency, valuation, growth],
            None,
        )
    }
}

//! Supplementary indicators: accounting-quality score and intrinsic value.

use analysis_core::{NormalizedMetrics, PeriodFigures};
use serde::Serialize;

/// Graham multiplier: P/E of 15 times P/B of 1.5.
const GRAHAM_MULTIPLIER: f64 = 22.5;

/// One pass/fail check of the accounting-quality score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityCheck {
    pub name: &'static str,
    pub passed: bool,
}

/// Nine-test year-over-year fundamental improvement score (0-9).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountingQuality {
    pub score: u8,
    pub checks: Vec<QualityCheck>,
}

impl AccountingQuality {
    pub fn passed(&self, name: &str) -> bool {
        self.checks.iter().any(|c| c.name == name && c.passed)
    }
}

fn improved(current: Option<f64>, prior: Option<f64>) -> bool {
    matches!((current, prior), (Some(c), Some(p)) if c > p)
}

fn not_increased(current: Option<f64>, prior: Option<f64>) -> bool {
    matches!((current, prior), (Some(c), Some(p)) if c <= p)
}

/// Score the nine checks. Checks 3-9 compare against the prior period and are
/// not awarded when it is absent; a check with missing inputs simply fails.
pub fn accounting_quality(current: &PeriodFigures, prior: Option<&PeriodFigures>) -> AccountingQuality {
    let mut checks = vec![
        QualityCheck {
            name: "positive_roa",
            passed: current.return_on_assets.map_or(false, |roa| roa > 0.0),
        },
        QualityCheck {
            name: "positive_operating_cash_flow",
            passed: current.operating_cash_flow.map_or(false, |ocf| ocf > 0.0),
        },
    ];

    let comparisons: [(&'static str, bool); 7] = match prior {
        Some(prior) => [
            ("roa_improved", improved(current.return_on_assets, prior.return_on_assets)),
            (
                "cash_flow_exceeds_earnings",
                matches!(
                    (current.operating_cash_flow, current.net_income),
                    (Some(ocf), Some(ni)) if ocf > ni
                ),
            ),
            ("long_term_debt_not_increased", not_increased(current.long_term_debt, prior.long_term_debt)),
            ("current_ratio_improved", improved(current.current_ratio, prior.current_ratio)),
            ("no_dilution", not_increased(current.shares, prior.shares)),
            ("gross_margin_improved", improved(current.gross_margin, prior.gross_margin)),
            ("asset_turnover_improved", improved(current.asset_turnover, prior.asset_turnover)),
        ],
        None => [
            ("roa_improved", false),
            ("cash_flow_exceeds_earnings", false),
            ("long_term_debt_not_increased", false),
            ("current_ratio_improved", false),
            ("no_dilution", false),
            ("gross_margin_improved", false),
            ("asset_turnover_improved", false),
        ],
    };
    checks.extend(
        comparisons
            .into_iter()
            .map(|(name, passed)| QualityCheck { name, passed }),
    );

    let score = checks.iter().filter(|c| c.passed).count() as u8;
    AccountingQuality { score, checks }
}

/// Graham number: √(22.5 × EPS × BVPS) when both are strictly positive, else 0.
pub fn intrinsic_value(eps: f64, book_value_per_share: f64) -> f64 {
    if eps > 0.0 && book_value_per_share > 0.0 {
        (GRAHAM_MULTIPLIER * eps * book_value_per_share).sqrt()
    } else {
        0.0
    }
}

/// Percent upside of the estimate over the current price; undefined without a
/// positive price.
pub fn upside(estimate: f64, price: f64) -> Option<f64> {
    if price > 0.0 {
        Some((estimate / price - 1.0) * 100.0)
    } else {
        None
    }
}

/// Indicators bundled for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicators {
    pub accounting_quality: AccountingQuality,
    pub intrinsic_value: f64,
    pub intrinsic_upside: Option<f64>,
    pub bankruptcy_risk: f64,
}

impl Indicators {
    pub fn from_metrics(metrics: &NormalizedMetrics) -> Self {
        let estimate = intrinsic_value(metrics.eps, metrics.book_value_per_share);
        Self {
            accounting_quality: accounting_quality(&metrics.current, metrics.prior.as_ref()),
            intrinsic_value: estimate,
            intrinsic_upside: upside(estimate, metrics.price),
            bankruptcy_risk: metrics.altman_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_current() -> PeriodFigures {
        PeriodFigures {
            return_on_assets: Some(0.08),
            operating_cash_flow: Some(120.0),
            net_income: Some(100.0),
            long_term_debt: Some(400.0),
            current_ratio: Some(1.6),
            shares: Some(1_000.0),
            gross_margin: Some(0.42),
            asset_turnover: Some(0.9),
        }
    }

    fn weak_prior() -> PeriodFigures {
        PeriodFigures {
            return_on_assets: Some(0.05),
            operating_cash_flow: Some(80.0),
            net_income: Some(70.0),
            long_term_debt: Some(450.0),
            current_ratio: Some(1.4),
            shares: Some(1_000.0),
            gross_margin: Some(0.40),
            asset_turnover: Some(0.85),
        }
    }

    #[test]
    fn test_single_period_with_losses_scores_zero() {
        let current = PeriodFigures {
            return_on_assets: Some(-0.02),
            operating_cash_flow: None,
            ..Default::default()
        };
        assert_eq!(accounting_quality(&current, None).score, 0);

        let breakeven = PeriodFigures {
            return_on_assets: Some(0.0),
            ..Default::default()
        };
        assert_eq!(accounting_quality(&breakeven, None).score, 0);
    }

    #[test]
    fn test_single_period_caps_at_two() {
        let quality = accounting_quality(&strong_current(), None);
        assert_eq!(quality.score, 2);
        assert!(quality.passed("positive_roa"));
        assert!(quality.passed("positive_operating_cash_flow"));
        assert!(!quality.passed("cash_flow_exceeds_earnings"));
        assert_eq!(quality.checks.len(), 9);
    }

    #[test]
    fn test_all_nine_checks() {
        let quality = accounting_quality(&strong_current(), Some(&weak_prior()));
        assert_eq!(quality.score, 9);
    }

    #[test]
    fn test_deterioration_fails_comparisons() {
        let quality = accounting_quality(&weak_prior(), Some(&strong_current()));
        // positive ROA, positive OCF, OCF > NI, no dilution (flat shares)
        assert_eq!(quality.score, 4);
        assert!(!quality.passed("long_term_debt_not_increased"));
        assert!(quality.passed("no_dilution"));
    }

    #[test]
    fn test_missing_prior_field_is_not_awarded() {
        let mut prior = weak_prior();
        prior.current_ratio = None;
        prior.shares = None;
        let quality = accounting_quality(&strong_current(), Some(&prior));
        assert_eq!(quality.score, 7);
        assert!(!quality.passed("current_ratio_improved"));
    }

    #[test]
    fn test_intrinsic_value() {
        assert!((intrinsic_value(2.0, 1.8) - 9.0).abs() < 1e-9);
        assert!((intrinsic_value(2.0, 18.0) - 810.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(intrinsic_value(0.0, 18.0), 0.0);
        assert_eq!(intrinsic_value(-1.5, 100.0), 0.0);
        assert_eq!(intrinsic_value(2.0, -3.0), 0.0);
    }

    #[test]
    fn test_upside_requires_positive_price() {
        assert!((upside(9.0, 6.0).unwrap() - 50.0).abs() < 1e-12);
        assert_eq!(upside(9.0, 0.0), None);
        assert_eq!(upside(9.0, -1.0), None);
    }
}

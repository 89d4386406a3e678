//! Metric normalizer
//!
//! Turns a raw [`FinancialSnapshot`] into [`NormalizedMetrics`]. Never fails:
//! a missing line item leaves the dependent ratio at 0 (or its neutral value)
//! and records a [`DataIssue`] so callers can see what was defaulted.

use crate::fields::{self, FieldChain};
use analysis_core::{
    DataIssue, FinancialSnapshot, MarginTrend, NormalizedMetrics, PeriodFigures, ValuationBand,
};

/// Altman-style weights: liquidity, earnings, capitalization, turnover.
const Z_WEIGHTS: [f64; 4] = [1.2, 3.3, 0.6, 1.0];
/// Cost-to-income assumed for banks that do not report operating expense.
const NEUTRAL_EFFICIENCY: f64 = 60.0;
const CAGR_PERIODS: usize = 4;
/// EV/EBITDA within ±10% of history counts as in line.
const VALUATION_BAND_WIDTH: f64 = 0.10;

/// Zero-safe division: a zero denominator yields 0.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite(numerator / denominator)
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

struct Normalizer<'a> {
    snapshot: &'a FinancialSnapshot,
    issues: Vec<DataIssue>,
}

impl<'a> Normalizer<'a> {
    fn missing(&mut self, field: &str) {
        let already = self
            .issues
            .iter()
            .any(|i| matches!(i, DataIssue::MissingField { field: f } if f == field));
        if !already {
            self.issues.push(DataIssue::MissingField {
                field: field.to_string(),
            });
        }
    }

    fn short_history(&mut self, metric: &str, needed: usize, available: usize) {
        self.issues.push(DataIssue::InsufficientHistory {
            metric: metric.to_string(),
            needed,
            available,
        });
    }

    /// Current-period value, recording a missing-field marker when absent.
    fn current(&mut self, chain: FieldChain) -> Option<f64> {
        let value = chain.current(self.snapshot);
        if value.is_none() {
            self.missing(chain.name);
        }
        value
    }

    fn scalar(&mut self, name: &str, value: Option<f64>) -> Option<f64> {
        let value = value.filter(|v| v.is_finite());
        if value.is_none() {
            self.missing(name);
        }
        value
    }

    fn history(&self) -> usize {
        self.snapshot
            .income_statement
            .periods()
            .max(self.snapshot.balance_sheet.periods())
    }

    fn period_figures(&self, period: usize) -> PeriodFigures {
        let snap = self.snapshot;
        let net_income = fields::NET_INCOME.resolve(snap, period);
        let revenue = fields::REVENUE.resolve(snap, period);
        let total_assets = positive(fields::TOTAL_ASSETS.resolve(snap, period));
        let current_liabilities = positive(fields::CURRENT_LIABILITIES.resolve(snap, period));
        let positive_revenue = positive(revenue);

        PeriodFigures {
            return_on_assets: net_income.zip(total_assets).map(|(ni, ta)| ni / ta),
            operating_cash_flow: fields::OPERATING_CASH_FLOW.resolve(snap, period),
            net_income,
            long_term_debt: fields::LONG_TERM_DEBT.resolve(snap, period),
            current_ratio: fields::CURRENT_ASSETS
                .resolve(snap, period)
                .zip(current_liabilities)
                .map(|(ca, cl)| ca / cl),
            shares: fields::SHARES_ISSUED.resolve(snap, period),
            gross_margin: fields::GROSS_PROFIT
                .resolve(snap, period)
                .zip(positive_revenue)
                .map(|(gp, rev)| gp / rev),
            asset_turnover: revenue.zip(total_assets).map(|(rev, ta)| rev / ta),
        }
    }

    fn margin_trend(&mut self) -> MarginTrend {
        let snap = self.snapshot;
        let margin = |chain: FieldChain, period: usize| {
            chain
                .resolve(snap, period)
                .zip(positive(fields::REVENUE.resolve(snap, period)))
                .map(|(x, rev)| x / rev)
        };

        let deltas: Vec<f64> = [fields::GROSS_PROFIT, fields::EBIT]
            .iter()
            .filter_map(|chain| {
                let current = margin(*chain, 0)?;
                let prior = margin(*chain, 1)?;
                Some(current - prior)
            })
            .collect();

        if deltas.is_empty() {
            let available = self.history();
            if available < 2 {
                self.short_history("margin_trend", 2, available);
            } else {
                self.missing("margin_trend");
            }
            return MarginTrend::FlatOrMixed;
        }
        if deltas.iter().all(|d| *d > 0.0) {
            MarginTrend::Rising
        } else if deltas.iter().all(|d| *d < 0.0) {
            MarginTrend::Falling
        } else {
            MarginTrend::FlatOrMixed
        }
    }

    fn revenue_cagr(&mut self) -> f64 {
        let available = fields::REVENUE.periods(self.snapshot);
        if available < CAGR_PERIODS {
            self.short_history("revenue_cagr", CAGR_PERIODS, available);
            return 0.0;
        }
        let latest = positive(fields::REVENUE.resolve(self.snapshot, 0));
        let base = positive(fields::REVENUE.resolve(self.snapshot, CAGR_PERIODS - 1));
        match latest.zip(base) {
            Some((latest, base)) => finite(((latest / base).powf(1.0 / 3.0) - 1.0) * 100.0),
            None => {
                self.missing("revenue");
                0.0
            }
        }
    }

    fn valuation_band(&mut self, ev_ebitda: f64) -> ValuationBand {
        match positive(self.snapshot.historical_ev_ebitda) {
            Some(history) if ev_ebitda > 0.0 => {
                let ratio = ev_ebitda / history;
                if ratio < 1.0 - VALUATION_BAND_WIDTH {
                    ValuationBand::Undervalued
                } else if ratio > 1.0 + VALUATION_BAND_WIDTH {
                    ValuationBand::Overvalued
                } else {
                    ValuationBand::InLine
                }
            }
            _ => {
                self.missing("historical_ev_ebitda");
                ValuationBand::InLine
            }
        }
    }
}

/// Bankruptcy-risk proxy. Each sub-term contributes 0 when its inputs are
/// missing or its denominator is not positive.
pub fn bankruptcy_risk_proxy(
    current_assets: Option<f64>,
    current_liabilities: Option<f64>,
    ebit: Option<f64>,
    market_cap: Option<f64>,
    total_assets: Option<f64>,
    total_liabilities: Option<f64>,
    revenue: Option<f64>,
) -> f64 {
    let over_assets = |x: Option<f64>| match (x, positive(total_assets)) {
        (Some(x), Some(ta)) => x / ta,
        _ => 0.0,
    };
    let working_capital = current_assets.zip(current_liabilities).map(|(ca, cl)| ca - cl);
    let capitalization = match (market_cap, positive(total_liabilities)) {
        (Some(mc), Some(tl)) => mc / tl,
        _ => 0.0,
    };

    let terms = [
        over_assets(working_capital),
        over_assets(ebit),
        capitalization,
        over_assets(revenue),
    ];
    finite(Z_WEIGHTS.iter().zip(terms).map(|(w, t)| w * t).sum())
}

/// Derive every ratio the scorers consume from one snapshot.
pub fn normalize(snapshot: &FinancialSnapshot) -> NormalizedMetrics {
    let mut n = Normalizer {
        snapshot,
        issues: Vec::new(),
    };

    let price = n.scalar("price", positive(snapshot.price));
    let shares = positive(snapshot.shares_outstanding)
        .or_else(|| positive(fields::SHARES_ISSUED.current(snapshot)))
        .or_else(|| {
            positive(snapshot.market_cap)
                .zip(price)
                .map(|(mc, p)| mc / p)
        });
    let market_cap = n.scalar(
        "market_cap",
        positive(snapshot.market_cap).or_else(|| price.zip(shares).map(|(p, s)| p * s)),
    );

    let revenue = n.current(fields::REVENUE);
    let net_income = n.current(fields::NET_INCOME);
    let ebit = n.current(fields::EBIT);
    let ebitda = match fields::EBITDA.current(snapshot).filter(|v| *v != 0.0).or(ebit) {
        Some(v) => v,
        None => {
            n.missing(fields::EBITDA.name);
            0.0
        }
    };
    let operating_cash_flow = n.current(fields::OPERATING_CASH_FLOW);
    let free_cash_flow = fields::FREE_CASH_FLOW.current(snapshot).or_else(|| {
        fields::CAPITAL_EXPENDITURE
            .current(snapshot)
            .zip(operating_cash_flow)
            .map(|(capex, ocf)| ocf - capex.abs())
    });
    if free_cash_flow.is_none() {
        n.missing(fields::FREE_CASH_FLOW.name);
    }
    let interest_expense = n.current(fields::INTEREST_EXPENSE);

    let total_assets = n.current(fields::TOTAL_ASSETS);
    let total_liabilities = n.current(fields::TOTAL_LIABILITIES);
    let current_assets = n.current(fields::CURRENT_ASSETS);
    let current_liabilities = n.current(fields::CURRENT_LIABILITIES);
    let total_debt = n.current(fields::TOTAL_DEBT);
    let cash = n.current(fields::CASH);
    let equity = n.current(fields::EQUITY);

    let computed_roe = net_income
        .zip(positive(equity))
        .map(|(ni, eq)| ni / eq * 100.0);
    let reported_roe = snapshot
        .return_on_equity
        .filter(|v| v.is_finite())
        .map(|v| v * 100.0);
    let roe = reported_roe.or(computed_roe);
    let roic = snapshot
        .return_on_invested_capital
        .filter(|v| v.is_finite() && *v != 0.0)
        .map(|v| v * 100.0)
        .or(roe);
    if roic.is_none() {
        n.missing("roic");
    }

    let fcf = free_cash_flow.unwrap_or(0.0);
    let mc = market_cap.unwrap_or(0.0);
    let net_debt = total_debt.unwrap_or(0.0) - cash.unwrap_or(0.0);
    let ev_ebitda = if ebitda > 0.0 {
        finite((mc + net_debt) / ebitda)
    } else {
        0.0
    };

    let eps = snapshot
        .trailing_eps
        .filter(|v| v.is_finite())
        .or_else(|| net_income.zip(shares).map(|(ni, s)| ni / s))
        .unwrap_or(0.0);
    let book_value_per_share = equity
        .zip(shares)
        .map(|(eq, s)| finite(eq / s))
        .unwrap_or(0.0);
    let price_to_book = positive(snapshot.price_to_book)
        .or_else(|| {
            price
                .zip(positive(Some(book_value_per_share)))
                .map(|(p, bvps)| p / bvps)
        })
        .unwrap_or(0.0);

    let net_interest_income = fields::NET_INTEREST_INCOME.current(snapshot);
    let assets = total_assets.unwrap_or(0.0);
    let net_interest_margin = net_interest_income
        .map(|nii| safe_div(nii, assets) * 100.0)
        .unwrap_or(0.0);
    let efficiency = match (fields::OPERATING_EXPENSE.current(snapshot), positive(revenue)) {
        (Some(opex), Some(rev)) => finite(opex / rev * 100.0),
        _ => NEUTRAL_EFFICIENCY,
    };
    let credit_risk = match (
        fields::CREDIT_LOSS_PROVISION.current(snapshot),
        positive(net_interest_income),
    ) {
        (Some(provision), Some(nii)) => finite(provision.abs() / nii * 100.0),
        _ => 0.0,
    };
    let asset_growth = match (total_assets, positive(fields::TOTAL_ASSETS.prior(snapshot))) {
        (Some(current), Some(prior)) => finite((current / prior - 1.0) * 100.0),
        _ => 0.0,
    };

    let eps_growth = n
        .scalar("earnings_growth_estimate", snapshot.earnings_growth_estimate)
        .unwrap_or(0.0);

    let revenue_cagr = n.revenue_cagr();
    let margin_trend = n.margin_trend();
    let valuation_band = n.valuation_band(ev_ebitda);

    let current = n.period_figures(0);
    let prior = if n.history() >= 2 {
        Some(n.period_figures(1))
    } else {
        n.short_history("prior_period", 2, n.history());
        None
    };

    NormalizedMetrics {
        price: price.unwrap_or(0.0),
        market_cap: mc,
        roic: finite(roic.unwrap_or(0.0)),
        roe: finite(roe.unwrap_or(0.0)),
        cash_conversion: safe_div(fcf, net_income.unwrap_or(0.0)),
        ebitda: finite(ebitda),
        net_debt: finite(net_debt),
        net_debt_ebitda: safe_div(net_debt, ebitda),
        interest_coverage: safe_div(ebit.unwrap_or(0.0), interest_expense.unwrap_or(0.0).abs()),
        altman_z: bankruptcy_risk_proxy(
            current_assets,
            current_liabilities,
            ebit,
            market_cap,
            total_assets,
            total_liabilities,
            revenue,
        ),
        fcf_yield: if mc > 0.0 { finite(fcf / mc * 100.0) } else { 0.0 },
        ev_ebitda,
        revenue_cagr,
        margin_trend,
        valuation_band,
        eps_growth: finite(eps_growth),
        dividend_yield: snapshot
            .dividend_yield
            .filter(|v| v.is_finite())
            .map(|v| v * 100.0)
            .unwrap_or(0.0),
        eps: finite(eps),
        book_value_per_share,
        price_to_book: finite(price_to_book),
        net_interest_margin,
        efficiency,
        equity_to_assets: equity
            .map(|eq| safe_div(eq, assets) * 100.0)
            .unwrap_or(0.0),
        credit_risk,
        asset_growth,
        momentum: snapshot
            .price_change_52w
            .filter(|v| v.is_finite())
            .map(|v| v * 100.0)
            .unwrap_or(0.0),
        current,
        prior,
        issues: n.issues,
    }
}

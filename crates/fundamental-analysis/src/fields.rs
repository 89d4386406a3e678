//! Line-item fallback chains
//!
//! Providers name the same statement line differently depending on filing
//! format. Every metric resolves its inputs through one of the chains below,
//! trying each key in order and taking the first that has a value for the
//! requested period. All scorers share these chains.

use analysis_core::{FinancialSnapshot, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

/// Ordered list of equivalent line-item names on one statement.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub name: &'static str,
    pub statement: StatementKind,
    pub keys: &'static [&'static str],
}

impl FieldChain {
    const fn new(name: &'static str, statement: StatementKind, keys: &'static [&'static str]) -> Self {
        Self { name, statement, keys }
    }

    fn statement<'a>(&self, snapshot: &'a FinancialSnapshot) -> &'a Statement {
        match self.statement {
            StatementKind::Income => &snapshot.income_statement,
            StatementKind::Balance => &snapshot.balance_sheet,
            StatementKind::CashFlow => &snapshot.cash_flow,
        }
    }

    /// First key with a finite value at `period`.
    pub fn resolve(&self, snapshot: &FinancialSnapshot, period: usize) -> Option<f64> {
        let statement = self.statement(snapshot);
        self.keys.iter().find_map(|key| statement.value(key, period))
    }

    pub fn current(&self, snapshot: &FinancialSnapshot) -> Option<f64> {
        self.resolve(snapshot, 0)
    }

    pub fn prior(&self, snapshot: &FinancialSnapshot) -> Option<f64> {
        self.resolve(snapshot, 1)
    }

    /// Number of periods reported under the first key present on the statement.
    pub fn periods(&self, snapshot: &FinancialSnapshot) -> usize {
        let statement = self.statement(snapshot);
        self.keys
            .iter()
            .find_map(|key| statement.series(key))
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

pub const REVENUE: FieldChain =
    FieldChain::new("revenue", StatementKind::Income, &["Total Revenue", "Operating Revenue"]);
pub const NET_INCOME: FieldChain = FieldChain::new(
    "net_income",
    StatementKind::Income,
    &["Net Income", "Net Income Common Stockholders", "Net Income From Continuing Operations"],
);
pub const GROSS_PROFIT: FieldChain =
    FieldChain::new("gross_profit", StatementKind::Income, &["Gross Profit"]);
pub const OPERATING_EXPENSE: FieldChain =
    FieldChain::new("operating_expense", StatementKind::Income, &["Operating Expense", "Total Expenses"]);
pub const EBIT: FieldChain = FieldChain::new("ebit", StatementKind::Income, &["EBIT", "Operating Income"]);
pub const EBITDA: FieldChain =
    FieldChain::new("ebitda", StatementKind::Income, &["EBITDA", "Normalized EBITDA", "Ebitda"]);
pub const INTEREST_EXPENSE: FieldChain = FieldChain::new(
    "interest_expense",
    StatementKind::Income,
    &["Interest Expense", "Interest Expense Non Operating"],
);
pub const NET_INTEREST_INCOME: FieldChain =
    FieldChain::new("net_interest_income", StatementKind::Income, &["Net Interest Income"]);
pub const CREDIT_LOSS_PROVISION: FieldChain = FieldChain::new(
    "credit_loss_provision",
    StatementKind::Income,
    &["Credit Losses Provision", "Provision For Loan Losses"],
);

pub const OPERATING_CASH_FLOW: FieldChain = FieldChain::new(
    "operating_cash_flow",
    StatementKind::CashFlow,
    &["Operating Cash Flow", "Cash Flow From Continuing Operating Activities"],
);
pub const FREE_CASH_FLOW: FieldChain =
    FieldChain::new("free_cash_flow", StatementKind::CashFlow, &["Free Cash Flow"]);
pub const CAPITAL_EXPENDITURE: FieldChain =
    FieldChain::new("capital_expenditure", StatementKind::CashFlow, &["Capital Expenditure"]);

pub const TOTAL_ASSETS: FieldChain =
    FieldChain::new("total_assets", StatementKind::Balance, &["Total Assets"]);
pub const TOTAL_LIABILITIES: FieldChain = FieldChain::new(
    "total_liabilities",
    StatementKind::Balance,
    &["Total Liabilities Net Minority Interest", "Total Liabilities"],
);
pub const CURRENT_ASSETS: FieldChain =
    FieldChain::new("current_assets", StatementKind::Balance, &["Current Assets"]);
pub const CURRENT_LIABILITIES: FieldChain =
    FieldChain::new("current_liabilities", StatementKind::Balance, &["Current Liabilities"]);
pub const TOTAL_DEBT: FieldChain = FieldChain::new("total_debt", StatementKind::Balance, &["Total Debt"]);
pub const CASH: FieldChain = FieldChain::new(
    "cash",
    StatementKind::Balance,
    &["Cash And Cash Equivalents", "Cash Cash Equivalents And Short Term Investments"],
);
pub const EQUITY: FieldChain = FieldChain::new(
    "equity",
    StatementKind::Balance,
    &["Stockholders Equity", "Common Stock Equity", "Total Equity Gross Minority Interest"],
);
pub const LONG_TERM_DEBT: FieldChain = FieldChain::new(
    "long_term_debt",
    StatementKind::Balance,
    &["Long Term Debt", "Long Term Debt And Capital Lease Obligation"],
);
pub const SHARES_ISSUED: FieldChain =
    FieldChain::new("shares_issued", StatementKind::Balance, &["Ordinary Shares Number", "Share Issued"]);

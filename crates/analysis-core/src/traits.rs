use crate::{FinancialSnapshot, NormalizedMetrics, ScoreBreakdown, ScoringError, SectorTag, SectorThresholds};

/// Source of per-company snapshots.
///
/// Calls are synchronous and may be slow or fail; the batch scorer runs them on
/// blocking worker threads and turns failures into flagged rows.
pub trait SnapshotProvider: Send + Sync {
    fn fetch(&self, symbol: &str) -> Result<FinancialSnapshot, ScoringError>;
}

impl<F> SnapshotProvider for F
where
    F: Fn(&str) -> Result<FinancialSnapshot, ScoringError> + Send + Sync,
{
    fn fetch(&self, symbol: &str) -> Result<FinancialSnapshot, ScoringError> {
        self(symbol)
    }
}

/// Context a pillar scorer may consult besides the metrics themselves.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext {
    pub sector: SectorTag,
    pub thresholds: SectorThresholds,
    /// Accounting-quality score, 0-9
    pub accounting_quality: u8,
    /// Intrinsic-value upside in percent, when defined
    pub intrinsic_upside: Option<f64>,
}

/// A pillar model turning normalized metrics into a score breakdown.
pub trait PillarScorer: Send + Sync {
    fn score(&self, metrics: &NormalizedMetrics, ctx: &ScoringContext) -> ScoreBreakdown;
}

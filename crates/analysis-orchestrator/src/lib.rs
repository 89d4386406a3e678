use analysis_core::{RankedRow, ScoringError, ScoringModel, SectorProfile, SnapshotProvider};
use chrono::{DateTime, Utc};
use fundamental_analysis::{CompanyScore, ScoringEngine};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub mod config;
pub mod provider;
pub mod ranker;

pub use config::{load_sector_profile, ScreenerConfig};
pub use provider::InMemorySnapshotProvider;

/// Ranked table plus the rationale trail of every requested company.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub model: ScoringModel,
    pub table: Vec<RankedRow>,
    pub rationale: BTreeMap<String, Vec<String>>,
    pub scored: usize,
    pub failed: usize,
    pub timestamp: DateTime<Utc>,
}

impl BatchReport {
    pub fn rationale_for(&self, symbol: &str) -> Option<&[String]> {
        self.rationale.get(symbol).map(|r| r.as_slice())
    }
}

/// Scores a list of companies on a bounded pool of blocking workers.
pub struct BatchScorer {
    engine: Arc<ScoringEngine>,
    model: ScoringModel,
    max_concurrency: usize,
}

impl BatchScorer {
    pub fn new(model: ScoringModel) -> Self {
        Self {
            engine: Arc::new(ScoringEngine::new()),
            model,
            max_concurrency: config::DEFAULT_CONCURRENCY,
        }
    }

    pub fn from_config(config: &ScreenerConfig) -> Self {
        Self::new(config.model).with_concurrency(config.max_concurrency)
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn model(&self) -> ScoringModel {
        self.model
    }

    /// Fetch and score every identifier. A company whose retrieval or scoring
    /// fails becomes a no-data row; the batch itself never fails.
    pub async fn score_batch(
        &self,
        identifiers: &[String],
        provider: Arc<dyn SnapshotProvider>,
        profile: Arc<SectorProfile>,
    ) -> BatchReport {
        tracing::info!(
            "📊 Scoring {} companies with the {:?} model ({} workers)",
            identifiers.len(),
            self.model,
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, symbol) in identifiers.iter().enumerate() {
            let symbol = symbol.clone();
            let engine = Arc::clone(&self.engine);
            let provider = Arc::clone(&provider);
            let profile = Arc::clone(&profile);
            let semaphore = Arc::clone(&semaphore);
            let model = self.model;

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, Err("Scoring pool shut down".to_string())),
                };
                let outcome = tokio::task::spawn_blocking(move || {
                    score_one(&engine, provider.as_ref(), &profile, &symbol, model)
                })
                .await;

                let outcome = match outcome {
                    Ok(Ok(score)) => Ok(score),
                    Ok(Err(e)) => Err(e.rationale()),
                    Err(e) => Err(format!("Scoring task failed: {}", e)),
                };
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Result<CompanyScore, String>>> =
            (0..identifiers.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => tracing::error!("Task error: {}", e),
            }
        }

        let mut table = Vec::with_capacity(identifiers.len());
        let mut rationale = BTreeMap::new();
        let mut failed = 0;

        for (symbol, outcome) in identifiers.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| Err("Scoring task aborted".to_string()));
            match outcome {
                Ok(score) => {
                    tracing::debug!(
                        "{} => {} ({})",
                        symbol,
                        score.breakdown.total,
                        score.breakdown.recommendation.label()
                    );
                    for issue in &score.metrics.issues {
                        tracing::debug!("{}: defaulted, {}", symbol, ScoringError::from(issue.clone()));
                    }
                    table.push(ranker::scored_row(&score));
                    rationale.insert(symbol.clone(), score.breakdown.rationale);
                }
                Err(reason) => {
                    tracing::warn!("Failed to score {}: {}", symbol, reason);
                    failed += 1;
                    table.push(ranker::no_data_row(symbol, &profile));
                    rationale.insert(symbol.clone(), vec![reason]);
                }
            }
        }

        ranker::rank(&mut table);

        let scored = identifiers.len() - failed;
        tracing::info!(
            "✅ Batch complete: {}/{} scored, {} flagged as no data",
            scored,
            identifiers.len(),
            failed
        );

        BatchReport {
            model: self.model,
            table,
            rationale,
            scored,
            failed,
            timestamp: Utc::now(),
        }
    }
}

fn score_one(
    engine: &ScoringEngine,
    provider: &dyn SnapshotProvider,
    profile: &SectorProfile,
    symbol: &str,
    model: ScoringModel,
) -> Result<CompanyScore, ScoringError> {
    let mut snapshot = provider.fetch(symbol)?;
    if snapshot.symbol.is_empty() {
        snapshot.symbol = symbol.to_string();
    }
    engine.score(&snapshot, profile, model)
}

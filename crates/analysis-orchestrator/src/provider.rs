use analysis_core::{FinancialSnapshot, ScoringError, SnapshotProvider};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Snapshots held in memory, typically loaded from a JSON file mapping
/// symbol to snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotProvider {
    snapshots: HashMap<String, FinancialSnapshot>,
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: FinancialSnapshot) {
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
    }

    pub fn with(mut self, snapshot: FinancialSnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    /// Parse a `{ "SYM": snapshot, ... }` document. A snapshot without an
    /// explicit symbol takes its map key.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, FinancialSnapshot> =
            serde_json::from_str(json).context("Failed to parse snapshot JSON")?;
        let snapshots = raw
            .into_iter()
            .map(|(key, mut snapshot)| {
                if snapshot.symbol.is_empty() {
                    snapshot.symbol = key.clone();
                }
                (key, snapshot)
            })
            .collect();
        Ok(Self { snapshots })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshots from {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.snapshots.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotProvider for InMemorySnapshotProvider {
    fn fetch(&self, symbol: &str) -> Result<FinancialSnapshot, ScoringError> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| ScoringError::RetrievalFailure(format!("no snapshot for {}", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_defaults_to_map_key() {
        let provider = InMemorySnapshotProvider::from_json_str(
            r#"{
                "REP.MC": { "price": 14.2, "income_statement": { "Total Revenue": [100.0, 90.0] } },
                "IBE.MC": { "symbol": "IBE.MC" }
            }"#,
        )
        .unwrap();

        assert_eq!(provider.symbols(), vec!["IBE.MC", "REP.MC"]);
        let snap = provider.fetch("REP.MC").unwrap();
        assert_eq!(snap.symbol, "REP.MC");
        assert_eq!(snap.price, Some(14.2));
        assert_eq!(snap.income_statement.value("Total Revenue", 1), Some(90.0));
    }

    #[test]
    fn test_unknown_symbol_is_a_retrieval_failure() {
        let provider = InMemorySnapshotProvider::new().with(FinancialSnapshot::new("ITX.MC"));
        assert_eq!(provider.len(), 1);
        assert!(matches!(
            provider.fetch("XXX"),
            Err(ScoringError::RetrievalFailure(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(InMemorySnapshotProvider::from_json_str("[1, 2").is_err());
    }
}

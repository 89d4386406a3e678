use analysis_core::{Recommendation, RankedRow, SectorProfile};
use fundamental_analysis::CompanyScore;
use serde_json::json;
use std::cmp::Ordering;

/// Table row for a scored company.
pub fn scored_row(score: &CompanyScore) -> RankedRow {
    let price = score.metrics.price;
    RankedRow {
        symbol: score.symbol.clone(),
        name: score.name.clone(),
        sector: score.sector.clone(),
        score: score.breakdown.total as f64,
        recommendation: score.breakdown.recommendation.label().to_string(),
        price: if price > 0.0 { price } else { f64::NAN },
        metrics: score.metric_columns(),
    }
}

/// Flagged row for a company that could not be scored.
pub fn no_data_row(symbol: &str, profile: &SectorProfile) -> RankedRow {
    RankedRow {
        symbol: symbol.to_string(),
        name: profile.display_name(symbol).to_string(),
        sector: profile.sector_of(symbol).label().to_string(),
        score: f64::NAN,
        recommendation: Recommendation::NoData.label().to_string(),
        price: f64::NAN,
        metrics: json!({}),
    }
}

/// Descending by score; no-data rows last.
fn by_score_desc(a: &RankedRow, b: &RankedRow) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
    }
}

/// Sort in place. The sort is stable, so equal scores keep input order.
pub fn rank(rows: &mut [RankedRow]) {
    rows.sort_by(by_score_desc);
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::SectorTag;

    fn row(symbol: &str, score: f64) -> RankedRow {
        RankedRow {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            sector: "Other".to_string(),
            score,
            recommendation: "Hold".to_string(),
            price: 10.0,
            metrics: json!({}),
        }
    }

    fn symbols(rows: &[RankedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn test_descending_with_stable_ties() {
        let mut rows = vec![row("A", 55.0), row("B", 80.0), row("C", 55.0), row("D", 90.0)];
        rank(&mut rows);
        assert_eq!(symbols(&rows), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_no_data_rows_sort_last() {
        let mut rows = vec![row("X", f64::NAN), row("A", -10.0), row("Y", f64::NAN), row("B", 0.0)];
        rank(&mut rows);
        assert_eq!(symbols(&rows), vec!["B", "A", "X", "Y"]);
    }

    #[test]
    fn test_no_data_row_uses_profile() {
        let profile = SectorProfile::new().with_company("SAN.MC", "Banco Santander", SectorTag::Bank);
        let flagged = no_data_row("SAN.MC", &profile);
        assert_eq!(flagged.name, "Banco Santander");
        assert_eq!(flagged.sector, SectorTag::Bank.label());
        assert!(!flagged.has_data());
        assert!(flagged.price.is_nan());
        assert_eq!(flagged.recommendation, "no data available");
    }

    #[test]
    fn test_no_data_row_serializes_missing_cells_as_null() {
        let flagged = no_data_row("GRF.MC", &SectorProfile::new());
        let value = serde_json::to_value(&flagged).unwrap();
        assert!(value["score"].is_null());
        assert!(value["price"].is_null());
        assert_eq!(value["recommendation"], "no data available");
    }
}

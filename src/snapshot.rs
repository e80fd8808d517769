// 📸 Snapshots - the whole Category → LineItem tree as one JSON value
//
// Read-only seeding: a session can start from a snapshot file, and the
// current tree can be exported, but nothing is ever written back.

use crate::entities::{Category, LineItem};
use crate::period::PeriodValues;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub categories: Vec<Category>,
}

impl LedgerSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse ledger snapshot")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid snapshot: {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize ledger snapshot")
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// The sample financial statement a fresh session opens with
pub fn demo() -> LedgerSnapshot {
    let sections: [(&str, &[(&str, f64, f64, f64)]); 3] = [
        (
            "Revenue",
            &[
                ("Product Sales", 100.0, 150.0, 200.0),
                ("Service Fees", 50.0, 50.0, 40.0),
                ("Licensing", 20.0, 35.0, 42.0),
                ("Subscriptions", 80.0, 120.0, 180.0),
                ("Consulting", 60.0, 75.0, 70.0),
                ("Training", 10.0, 15.0, 12.0),
                ("Partnerships", 0.0, 0.0, 25.0),
            ],
        ),
        (
            "Cost of Sales",
            &[
                ("Materials", 40.0, 60.0, 75.0),
                ("Direct Labour", 30.0, 45.0, 50.0),
                ("Freight", 5.0, 8.0, 6.0),
            ],
        ),
        (
            "Operating Expenses",
            &[
                ("Salaries", 70.0, 90.0, 110.0),
                ("Rent", 24.0, 24.0, 30.0),
                ("Marketing", 15.0, 20.0, 16.0),
                ("Software", 6.0, 9.0, 14.0),
                ("Travel", 8.0, 4.0, 10.0),
                ("Insurance", 3.0, 3.0, 3.0),
            ],
        ),
    ];

    let categories = sections
        .iter()
        .map(|(label, rows)| {
            let mut category = Category::new(*label);
            category.items = rows
                .iter()
                .map(|(row, earliest, middle, latest)| {
                    LineItem::new(*row, PeriodValues::new(*earliest, *middle, *latest))
                })
                .collect();
            category
        })
        .collect();

    LedgerSnapshot { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_statement() {
        let snapshot = demo();
        let labels: Vec<&str> = snapshot.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Revenue", "Cost of Sales", "Operating Expenses"]);
        assert_eq!(snapshot.item_count(), 16);
        // more than one compact page in the first section
        assert!(snapshot.categories[0].items.len() > 5);
    }

    #[test]
    fn test_snapshot_json_round_trip_keeps_ids() {
        let snapshot = demo();
        let json = snapshot.to_json_pretty().unwrap();
        let restored = LedgerSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let err = LedgerSnapshot::from_json("{\"categories\": 3}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse ledger snapshot"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LedgerSnapshot::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot"));
    }
}

// 🔀 Sort Engine - three-state toggle over computed variance percent
//
//   None → ProfitDescending → LossAscending → None
//
// The sort key is recomputed from current values on every apply, so an
// edit shows up in the ordering on the very next read. Sorting is stable;
// rows with an undefined percentage (zero baseline) go last in either
// direction, keeping their stored order.

use crate::entities::LineItem;
use crate::variance::variance_percent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortState {
    #[default]
    None,
    ProfitDescending,
    LossAscending,
}

impl SortState {
    /// The only transition: advance one step around the cycle
    pub fn toggle(self) -> Self {
        match self {
            SortState::None => SortState::ProfitDescending,
            SortState::ProfitDescending => SortState::LossAscending,
            SortState::LossAscending => SortState::None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SortState::None => "Unsorted",
            SortState::ProfitDescending => "Profit first",
            SortState::LossAscending => "Loss first",
        }
    }
}

/// Order items for display under `state`. Never mutates the items.
pub fn apply<'a>(items: &'a [LineItem], state: SortState) -> Vec<&'a LineItem> {
    let mut ordered: Vec<&LineItem> = items.iter().collect();

    match state {
        SortState::None => {}
        SortState::ProfitDescending => {
            ordered.sort_by(|a, b| compare_keys(sort_key(a), sort_key(b), Ordering::reverse))
        }
        SortState::LossAscending => {
            ordered.sort_by(|a, b| compare_keys(sort_key(a), sort_key(b), |o| o))
        }
    }

    ordered
}

fn sort_key(item: &LineItem) -> Option<f64> {
    variance_percent(item.values.latest, item.values.middle).ok()
}

/// Defined keys compare through `direction`; undefined keys always trail
fn compare_keys(a: Option<f64>, b: Option<f64>, direction: impl Fn(Ordering) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodValues;

    fn item(label: &str, middle: f64, latest: f64) -> LineItem {
        LineItem::new(label, PeriodValues::new(0.0, middle, latest))
    }

    fn labels(ordered: &[&LineItem]) -> Vec<String> {
        ordered.iter().map(|i| i.label.clone()).collect()
    }

    #[test]
    fn test_toggle_cycle() {
        assert_eq!(SortState::None.toggle(), SortState::ProfitDescending);
        assert_eq!(SortState::ProfitDescending.toggle(), SortState::LossAscending);
        assert_eq!(SortState::LossAscending.toggle(), SortState::None);

        for s in [SortState::None, SortState::ProfitDescending, SortState::LossAscending] {
            assert_eq!(s.toggle().toggle().toggle(), s);
        }
    }

    #[test]
    fn test_apply_none_is_identity() {
        let items = vec![item("a", 100.0, 50.0), item("b", 100.0, 300.0), item("c", 10.0, 11.0)];
        assert_eq!(labels(&apply(&items, SortState::None)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_apply_profit_and_loss() {
        let items = vec![item("item1", 150.0, 200.0), item("item2", 50.0, 40.0)];

        assert_eq!(
            labels(&apply(&items, SortState::ProfitDescending)),
            vec!["item1", "item2"]
        );
        assert_eq!(
            labels(&apply(&items, SortState::LossAscending)),
            vec!["item2", "item1"]
        );
    }

    #[test]
    fn test_apply_is_stable_on_ties() {
        // a, b and c all sit at +10.0%
        let items = vec![
            item("a", 100.0, 110.0),
            item("low", 100.0, 50.0),
            item("b", 10.0, 11.0),
            item("c", 1000.0, 1100.0),
        ];

        assert_eq!(
            labels(&apply(&items, SortState::ProfitDescending)),
            vec!["a", "b", "c", "low"]
        );
        assert_eq!(
            labels(&apply(&items, SortState::LossAscending)),
            vec!["low", "a", "b", "c"]
        );
    }

    #[test]
    fn test_apply_anomalies_trail_in_both_directions() {
        let items = vec![
            item("zero1", 0.0, 5.0),
            item("up", 10.0, 20.0),
            item("zero2", 0.0, 0.0),
            item("down", 10.0, 5.0),
        ];

        assert_eq!(
            labels(&apply(&items, SortState::ProfitDescending)),
            vec!["up", "down", "zero1", "zero2"]
        );
        assert_eq!(
            labels(&apply(&items, SortState::LossAscending)),
            vec!["down", "up", "zero1", "zero2"]
        );
    }

    #[test]
    fn test_apply_reflects_edits() {
        let mut items = vec![item("a", 100.0, 110.0), item("b", 100.0, 120.0)];
        assert_eq!(labels(&apply(&items, SortState::ProfitDescending)), vec!["b", "a"]);

        items[0].values.latest = 500.0;
        assert_eq!(labels(&apply(&items, SortState::ProfitDescending)), vec!["a", "b"]);
        // stored order untouched
        assert_eq!(items[0].label, "a");
    }
}

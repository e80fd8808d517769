// ➕ Aggregation Engine - category totals from line items
//
// Totals are never stored. Every call re-sums the items it is given, so a
// caller that mutates a value and reads again always sees consistent totals:
//
//   totals[p] == Σ items[i].values[p]   for every period p

use crate::entities::LineItem;
use crate::period::{Period, PeriodValues};
use crate::variance::VarianceView;
use serde::{Deserialize, Serialize};

/// Per-period sums for one category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedTotals {
    pub sum_per_period: PeriodValues,
}

impl DerivedTotals {
    pub fn get(&self, period: Period) -> f64 {
        self.sum_per_period[period]
    }

    pub fn variance(&self) -> VarianceView {
        VarianceView::of(&self.sum_per_period)
    }
}

/// Sum each period across all items. Zero for every period when empty.
pub fn compute_totals<'a, I>(items: I) -> DerivedTotals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let sum_per_period = items
        .into_iter()
        .fold(PeriodValues::zero(), |acc, item| acc + item.values);

    DerivedTotals { sum_per_period }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variance::VariancePercent;

    fn item(earliest: f64, middle: f64, latest: f64) -> LineItem {
        LineItem::new("row", PeriodValues::new(earliest, middle, latest))
    }

    #[test]
    fn test_compute_totals() {
        let items = vec![item(100.0, 150.0, 200.0), item(50.0, 50.0, 40.0)];
        let totals = compute_totals(&items);

        assert_eq!(totals.get(Period::Earliest), 150.0);
        assert_eq!(totals.get(Period::Middle), 200.0);
        assert_eq!(totals.get(Period::Latest), 240.0);
    }

    #[test]
    fn test_compute_totals_empty_is_zero() {
        let totals = compute_totals(&Vec::<LineItem>::new());
        assert_eq!(totals.sum_per_period, PeriodValues::zero());

        let view = totals.variance();
        assert_eq!(view.variance, 0.0);
        assert_eq!(view.variance_percent, VariancePercent::DivisionAnomaly);
    }

    #[test]
    fn test_compute_totals_order_independent() {
        let mut items = vec![
            item(1.0, 2.0, 3.0),
            item(-4.0, 5.5, 6.0),
            item(7.0, 8.0, -9.25),
        ];
        let forward = compute_totals(&items);
        items.reverse();
        assert_eq!(compute_totals(&items), forward);
    }

    #[test]
    fn test_totals_variance() {
        let items = vec![item(100.0, 150.0, 200.0), item(50.0, 50.0, 40.0)];
        let view = compute_totals(&items).variance();
        assert_eq!(view.variance, 40.0);
        assert_eq!(view.variance_percent, VariancePercent::Value(20.0));
    }
}

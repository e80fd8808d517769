// 📈 Variance Calculator - pure arithmetic over a row or an aggregate
//
//   variance         = latest - middle
//   variance percent = (latest - middle) / middle * 100, one decimal
//
// A zero baseline never leaks Infinity/NaN: variance_percent returns
// DivisionAnomaly and VarianceView carries it as a sentinel.

use crate::error::DivisionAnomaly;
use crate::period::PeriodValues;
use serde::{Deserialize, Serialize};

/// Difference between the latest and middle value. Always defined.
pub fn variance(latest: f64, middle: f64) -> f64 {
    latest - middle
}

/// Variance as a percentage of the middle value, rounded to one decimal
pub fn variance_percent(latest: f64, middle: f64) -> Result<f64, DivisionAnomaly> {
    if middle == 0.0 {
        return Err(DivisionAnomaly);
    }
    let percent = variance(latest, middle) / middle * 100.0;
    if !percent.is_finite() {
        return Err(DivisionAnomaly);
    }
    Ok(round_one_decimal(percent))
}

/// Round at one decimal place from the exact decimal value of `value`
/// (1.45 is stored as 1.4499.. and gives 1.4). Exact midpoints such as
/// 0.25 round away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    // the only doubles sitting exactly on a .x5 midpoint are odd multiples of 1/4
    if (value.abs() * 4.0) % 2.0 == 1.0 {
        return (value * 10.0).round() / 10.0;
    }
    // `{:.1}` rounds the exact binary value, not the scaled product
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Same formula as [`variance`], applied to an aggregate's period sums
pub fn totals_variance(totals: &PeriodValues) -> f64 {
    variance(totals.latest, totals.middle)
}

/// Same formula as [`variance_percent`], applied to an aggregate's period sums
pub fn totals_variance_percent(totals: &PeriodValues) -> Result<f64, DivisionAnomaly> {
    variance_percent(totals.latest, totals.middle)
}

// ============================================================================
// VARIANCE PERCENT SENTINEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariancePercent {
    Value(f64),
    DivisionAnomaly,
}

impl VariancePercent {
    pub fn value(&self) -> Option<f64> {
        match self {
            VariancePercent::Value(v) => Some(*v),
            VariancePercent::DivisionAnomaly => None,
        }
    }

    pub fn is_anomaly(&self) -> bool {
        matches!(self, VariancePercent::DivisionAnomaly)
    }
}

impl From<Result<f64, DivisionAnomaly>> for VariancePercent {
    fn from(result: Result<f64, DivisionAnomaly>) -> Self {
        match result {
            Ok(v) => VariancePercent::Value(v),
            Err(DivisionAnomaly) => VariancePercent::DivisionAnomaly,
        }
    }
}

// ============================================================================
// TREND (gain / loss sign classification)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Zero or positive
    Gain,
    Loss,
}

impl Trend {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Trend::Gain
        } else {
            Trend::Loss
        }
    }
}

// ============================================================================
// VARIANCE VIEW
// ============================================================================

/// Derived variance metrics for one row or one totals row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceView {
    pub variance: f64,
    pub variance_percent: VariancePercent,
}

impl VarianceView {
    pub fn of(values: &PeriodValues) -> Self {
        VarianceView {
            variance: variance(values.latest, values.middle),
            variance_percent: variance_percent(values.latest, values.middle).into(),
        }
    }

    pub fn trend(&self) -> Trend {
        Trend::of(self.variance)
    }

    /// Sign of the percentage; None when the percentage is an anomaly
    pub fn percent_trend(&self) -> Option<Trend> {
        self.variance_percent.value().map(Trend::of)
    }
}

// ============================================================================
// TESTS
// ============================================================================

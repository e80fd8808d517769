// 📅 Reporting Periods - the three fixed time points every line item carries
//
// The set is closed: earliest, middle, latest. Variance always compares
// latest against middle; earliest is displayed and totalled but never
// participates in variance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut};
use std::str::FromStr;

// ============================================================================
// PERIOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    /// 31-12-2021
    #[serde(rename = "31-12-2021")]
    Earliest,

    /// 31-12-2022 - the variance baseline
    #[serde(rename = "31-12-2022")]
    Middle,

    /// 31-12-2024 - the value compared against the baseline
    #[serde(rename = "31-12-2024")]
    Latest,
}

impl Period {
    /// All periods in reporting order
    pub const ALL: [Period; 3] = [Period::Earliest, Period::Middle, Period::Latest];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Earliest => "31-12-2021",
            Period::Middle => "31-12-2022",
            Period::Latest => "31-12-2024",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Period::Earliest => "earliest",
            Period::Middle => "middle",
            Period::Latest => "latest",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Period::ALL
            .into_iter()
            .find(|p| p.label() == trimmed || p.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown period: {}", s))
    }
}

// ============================================================================
// PERIOD VALUES
// ============================================================================

/// One numeric value per period
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodValues {
    #[serde(rename = "31-12-2021")]
    pub earliest: f64,

    #[serde(rename = "31-12-2022")]
    pub middle: f64,

    #[serde(rename = "31-12-2024")]
    pub latest: f64,
}

impl PeriodValues {
    pub fn new(earliest: f64, middle: f64, latest: f64) -> Self {
        PeriodValues {
            earliest,
            middle,
            latest,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, period: Period) -> f64 {
        self[period]
    }

    pub fn set(&mut self, period: Period, value: f64) {
        self[period] = value;
    }

    /// (period, value) pairs in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        Period::ALL.into_iter().map(move |p| (p, self[p]))
    }
}

impl Index<Period> for PeriodValues {
    type Output = f64;

    fn index(&self, period: Period) -> &f64 {
        match period {
            Period::Earliest => &self.earliest,
            Period::Middle => &self.middle,
            Period::Latest => &self.latest,
        }
    }
}

impl IndexMut<Period> for PeriodValues {
    fn index_mut(&mut self, period: Period) -> &mut f64 {
        match period {
            Period::Earliest => &mut self.earliest,
            Period::Middle => &mut self.middle,
            Period::Latest => &mut self.latest,
        }
    }
}

impl Add for PeriodValues {
    type Output = PeriodValues;

    fn add(mut self, rhs: PeriodValues) -> PeriodValues {
        self += rhs;
        self
    }
}

impl AddAssign for PeriodValues {
    fn add_assign(&mut self, rhs: PeriodValues) {
        for period in Period::ALL {
            self[period] += rhs[period];
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

// 🧾 Line Item Entity - one row of a category
//
// "The row UUID is IDENTITY (never changes), the period values are VALUES (edited in place)"

use crate::error::ValidationError;
use crate::numeric::parse_strict;
use crate::period::{Period, PeriodValues};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    pub fn new() -> Self {
        LineItemId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for LineItemId {
    fn from(s: &str) -> Self {
        LineItemId(s.to_string())
    }
}

impl From<String> for LineItemId {
    fn from(s: String) -> Self {
        LineItemId(s)
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// LINE ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identity (UUID)
    pub id: LineItemId,

    /// Row label shown in the first column (e.g., "Product Sales")
    pub label: String,

    pub values: PeriodValues,

    pub created_at: DateTime<Utc>,
}

impl LineItem {
    pub fn new(label: impl Into<String>, values: PeriodValues) -> Self {
        LineItem {
            id: LineItemId::new(),
            label: label.into(),
            values,
            created_at: Utc::now(),
        }
    }

    pub fn value(&self, period: Period) -> f64 {
        self.values[period]
    }
}

// ============================================================================
// LINE ITEM DRAFT (raw form input)
// ============================================================================

/// Unvalidated input for a new line item, as a form submits it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemDraft {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub values: BTreeMap<Period, String>,
}

impl LineItemDraft {
    pub fn new(label: impl Into<String>) -> Self {
        LineItemDraft {
            label: label.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, period: Period, raw: impl Into<String>) -> Self {
        self.values.insert(period, raw.into());
        self
    }

    /// Build a draft from already-numeric values
    pub fn from_values(label: impl Into<String>, values: PeriodValues) -> Self {
        values
            .iter()
            .fold(Self::new(label), |draft, (period, v)| draft.with_value(period, v.to_string()))
    }

    /// Check every field, collecting all failures in one pass
    pub fn validate(&self) -> Result<(String, PeriodValues), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let label = self.label.trim();
        if label.is_empty() {
            errors.push(ValidationError::new("label", "Please input the category!"));
        }

        let mut values = PeriodValues::zero();
        for period in Period::ALL {
            match self.values.get(&period).map(|raw| (raw, parse_strict(raw))) {
                None => errors.push(ValidationError::new(
                    period.label(),
                    format!("Please input the value for {}!", period.label()),
                )),
                Some((raw, None)) => errors.push(ValidationError::new(
                    period.label(),
                    format!("'{}' is not a number", raw),
                )),
                Some((_, Some(v))) => values[period] = v,
            }
        }

        if errors.is_empty() {
            Ok((label.to_string(), values))
        } else {
            Err(errors)
        }
    }
}

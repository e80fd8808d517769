// 🗂️ Ledger Store - single owner of the Category → LineItem tree
//
// Mutations: add category, add line item, update one period value.
// The store never reorders items and never caches derived numbers;
// totals, variance, and sort order are all recomputed by readers.

use crate::entities::{Category, CategoryId, LineItem, LineItemDraft, LineItemId};
use crate::error::{LedgerError, LedgerResult};
use crate::numeric::{parse_strict, parse_tolerant, NumericInput, Parsed};
use crate::period::Period;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    categories: Vec<Category>,
    numeric_input: NumericInput,
}

impl LedgerStore {
    pub fn new(numeric_input: NumericInput) -> Self {
        LedgerStore {
            categories: Vec::new(),
            numeric_input,
        }
    }

    /// Take ownership of an existing tree (e.g., from a snapshot)
    pub fn with_categories(categories: Vec<Category>, numeric_input: NumericInput) -> Self {
        LedgerStore {
            categories,
            numeric_input,
        }
    }

    pub fn numeric_input(&self) -> NumericInput {
        self.numeric_input
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Categories in insertion order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &CategoryId) -> LedgerResult<&Category> {
        self.categories
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| LedgerError::UnknownCategory(id.to_string()))
    }

    pub fn line_items(&self, id: &CategoryId) -> LedgerResult<&[LineItem]> {
        self.category(id).map(|c| c.items.as_slice())
    }

    pub fn line_item(&self, category_id: &CategoryId, item_id: &LineItemId) -> LedgerResult<&LineItem> {
        self.category(category_id)?
            .item(item_id)
            .ok_or_else(|| unknown_item(category_id, item_id))
    }

    fn category_mut(&mut self, id: &CategoryId) -> LedgerResult<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| LedgerError::UnknownCategory(id.to_string()))
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Append an empty category. The label must be non-blank.
    pub fn add_category(&mut self, label: &str) -> LedgerResult<&Category> {
        let label = label.trim();
        if label.is_empty() {
            return Err(LedgerError::validation("label", "Please input the category!"));
        }

        let category = Category::new(label);
        debug!(category_id = %category.id, label, "category added");
        self.categories.push(category);

        let index = self.categories.len() - 1;
        Ok(&self.categories[index])
    }

    /// Validate the draft and append it to the category.
    /// Rejection leaves the tree untouched.
    pub fn add_line_item(&mut self, category_id: &CategoryId, draft: &LineItemDraft) -> LedgerResult<&LineItem> {
        let category = self.category_mut(category_id)?;
        let (label, values) = draft.validate().map_err(LedgerError::Validation)?;

        let item = LineItem::new(label, values);
        debug!(
            category_id = %category.id,
            item_id = %item.id,
            label = %item.label,
            "line item added"
        );
        category.items.push(item);

        let index = category.items.len() - 1;
        Ok(&category.items[index])
    }

    /// Set one period value from raw text and return the stored number.
    ///
    /// Under [`NumericInput::Tolerant`] unparsable text stores 0; under
    /// [`NumericInput::Strict`] it is a validation error and nothing changes.
    pub fn update_value(
        &mut self,
        category_id: &CategoryId,
        item_id: &LineItemId,
        period: Period,
        raw_value: &str,
    ) -> LedgerResult<f64> {
        let value = match self.numeric_input {
            NumericInput::Strict => parse_strict(raw_value).ok_or_else(|| {
                LedgerError::validation(period.label(), format!("'{}' is not a number", raw_value))
            })?,
            NumericInput::Tolerant => match parse_tolerant(raw_value) {
                Parsed::Number(v) => v,
                defaulted @ Parsed::DefaultedToZero => {
                    warn!(
                        item_id = %item_id,
                        period = %period,
                        raw_value,
                        "non-numeric input, storing 0"
                    );
                    defaulted.value()
                }
            },
        };

        let item = self
            .category_mut(category_id)?
            .item_mut(item_id)
            .ok_or_else(|| unknown_item(category_id, item_id))?;
        item.values[period] = value;

        debug!(
            category_id = %category_id,
            item_id = %item_id,
            period = %period,
            value,
            "value updated"
        );
        Ok(value)
    }
}

fn unknown_item(category_id: &CategoryId, item_id: &LineItemId) -> LedgerError {
    LedgerError::UnknownLineItem {
        category_id: category_id.to_string(),
        item_id: item_id.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

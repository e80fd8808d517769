// 🏷️ Category Entity - a labelled group of line items
//
// "Category label is a VALUE, Category UUID is IDENTITY"
//
// A category owns its line items in insertion order. Nothing here
// reorders, sorts, or caches totals; those are derived on read.

use super::line_item::{LineItem, LineItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new() -> Self {
        CategoryId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        CategoryId(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        CategoryId(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identity (UUID) - NEVER changes
    pub id: CategoryId,

    /// Category label (e.g., "Revenue", "Operating Expenses")
    pub label: String,

    /// Line items in insertion order
    #[serde(default)]
    pub items: Vec<LineItem>,

    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Category {
            id: CategoryId::new(),
            label: label.into(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn item(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_mut(&mut self, id: &LineItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Label of the synthetic totals row
    pub fn totals_label(&self) -> String {
        format!("Total {}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodValues;

    #[test]
    fn test_category_creation() {
        let category = Category::new("Revenue");

        assert!(!category.id.as_str().is_empty());
        assert_eq!(category.label, "Revenue");
        assert!(category.is_empty());
        assert_eq!(category.totals_label(), "Total Revenue");
    }

    #[test]
    fn test_category_item_lookup() {
        let mut category = Category::new("Revenue");
        let item = LineItem::new("Product Sales", PeriodValues::new(1.0, 2.0, 3.0));
        let item_id = item.id.clone();
        category.items.push(item);

        assert_eq!(category.len(), 1);
        assert_eq!(category.item(&item_id).unwrap().label, "Product Sales");
        assert!(category.item(&LineItemId::from("missing")).is_none());

        category.item_mut(&item_id).unwrap().values.latest = 9.0;
        assert_eq!(category.items[0].values.latest, 9.0);
    }

    #[test]
    fn test_category_id_serializes_as_plain_string() {
        let id = CategoryId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }
}

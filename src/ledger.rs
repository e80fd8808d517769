// 📒 Ledger - the query/command surface presentation layers talk to
//
// Ledger = LedgerStore (the tree) + one TableContext per category.
// A TableContext is the per-table sort state and the two page windows;
// passing it explicitly keeps tables from interfering with each other.
//
// Read path for one rendered table:
//   store items → sort::apply(ctx.sort) → ctx.pages.window(view).slice
//   → append the totals row (never sorted, never paginated)

use crate::aggregation::{compute_totals, DerivedTotals};
use crate::config::LedgerConfig;
use crate::entities::{Category, CategoryId, LineItem, LineItemDraft, LineItemId};
use crate::error::LedgerResult;
use crate::pagination::{PageWindow, PaginationCoordinator, ViewKind};
use crate::period::{Period, PeriodValues};
use crate::snapshot::LedgerSnapshot;
use crate::sort::{self, SortState};
use crate::store::LedgerStore;
use crate::variance::VarianceView;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// TABLE CONTEXT
// ============================================================================

/// Sort and paging state for one rendered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableContext {
    pub sort: SortState,
    pub pages: PaginationCoordinator,
}

impl TableContext {
    pub fn new(config: &LedgerConfig) -> Self {
        TableContext {
            sort: SortState::None,
            pages: PaginationCoordinator::new(
                config.pagination.default_page_size,
                config.pagination.page_size_options.clone(),
            ),
        }
    }

    /// Sort `items`, cut out the window for `view`, and append the totals row
    pub fn render(&self, category: &Category, view: ViewKind) -> WindowView {
        let ordered = sort::apply(&category.items, self.sort);
        let window = self.pages.window(view);

        WindowView {
            view,
            sort: self.sort,
            page: window.page_index,
            page_size: window.page_size,
            total_items: ordered.len(),
            total_pages: window.total_pages(ordered.len()),
            rows: window.slice(&ordered).iter().map(|item| RowView::of(item)).collect(),
            totals: TotalsRow::of(category),
        }
    }
}

// ============================================================================
// RENDERED VIEWS
// ============================================================================

/// One line item with its derived variance, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: LineItemId,
    pub label: String,
    pub values: PeriodValues,
    pub variance: VarianceView,
}

impl RowView {
    pub fn of(item: &LineItem) -> Self {
        RowView {
            id: item.id.clone(),
            label: item.label.clone(),
            values: item.values,
            variance: VarianceView::of(&item.values),
        }
    }
}

/// The synthetic aggregate row fixed at the end of every window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsRow {
    pub label: String,
    pub values: PeriodValues,
    pub variance: VarianceView,
}

impl TotalsRow {
    pub fn of(category: &Category) -> Self {
        let totals = compute_totals(&category.items);
        TotalsRow {
            label: category.totals_label(),
            values: totals.sum_per_period,
            variance: totals.variance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowView {
    pub view: ViewKind,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub rows: Vec<RowView>,
    pub totals: TotalsRow,
}

// ============================================================================
// LEDGER
// ============================================================================

pub struct Ledger {
    store: LedgerStore,
    tables: HashMap<CategoryId, TableContext>,
    config: LedgerConfig,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Ledger {
            store: LedgerStore::new(config.input.numeric_input),
            tables: HashMap::new(),
            config,
        }
    }

    /// Start from a snapshot; every table starts unsorted on page 1
    pub fn from_snapshot(snapshot: LedgerSnapshot, config: LedgerConfig) -> Self {
        let tables = snapshot
            .categories
            .iter()
            .map(|c| (c.id.clone(), TableContext::new(&config)))
            .collect();

        Ledger {
            store: LedgerStore::with_categories(snapshot.categories, config.input.numeric_input),
            tables,
            config,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            categories: self.store.categories().to_vec(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // QUERY SURFACE
    // ========================================================================

    pub fn categories(&self) -> &[Category] {
        self.store.categories()
    }

    pub fn category(&self, id: &CategoryId) -> LedgerResult<&Category> {
        self.store.category(id)
    }

    pub fn line_items(&self, id: &CategoryId) -> LedgerResult<&[LineItem]> {
        self.store.line_items(id)
    }

    pub fn totals(&self, id: &CategoryId) -> LedgerResult<DerivedTotals> {
        self.store.line_items(id).map(|items| compute_totals(items))
    }

    pub fn item_variance(&self, category_id: &CategoryId, item_id: &LineItemId) -> LedgerResult<VarianceView> {
        let item = self.store.line_item(category_id, item_id)?;
        Ok(VarianceView::of(&item.values))
    }

    pub fn totals_variance(&self, id: &CategoryId) -> LedgerResult<VarianceView> {
        self.totals(id).map(|t| t.variance())
    }

    /// Current sort and paging state of a category's table
    pub fn table(&self, id: &CategoryId) -> LedgerResult<TableContext> {
        self.store.category(id)?;
        Ok(self
            .tables
            .get(id)
            .cloned()
            .unwrap_or_else(|| TableContext::new(&self.config)))
    }

    /// Sorted, paginated rows for one view of a category, totals row appended
    pub fn sorted_window(&self, id: &CategoryId, view: ViewKind) -> LedgerResult<WindowView> {
        let category = self.store.category(id)?;
        let window = match self.tables.get(id) {
            Some(table) => table.render(category, view),
            None => TableContext::new(&self.config).render(category, view),
        };
        Ok(window)
    }

    // ========================================================================
    // COMMAND SURFACE
    // ========================================================================

    pub fn add_category(&mut self, label: &str) -> LedgerResult<&Category> {
        let id = self.store.add_category(label)?.id.clone();
        self.tables.insert(id.clone(), TableContext::new(&self.config));
        self.store.category(&id)
    }

    /// Append a line item and jump the compact view to its last page
    pub fn add_line_item(&mut self, category_id: &CategoryId, draft: &LineItemDraft) -> LedgerResult<&LineItem> {
        let item_id = self.store.add_line_item(category_id, draft)?.id.clone();
        let total = self.store.line_items(category_id)?.len();

        let table = self.table_mut(category_id);
        table.pages.jump_to_last_compact_page(total);
        debug!(
            category_id = %category_id,
            page = table.pages.window(ViewKind::Compact).page_index,
            "compact view moved to last page"
        );

        self.store.line_item(category_id, &item_id)
    }

    pub fn update_value(
        &mut self,
        category_id: &CategoryId,
        item_id: &LineItemId,
        period: Period,
        raw_value: &str,
    ) -> LedgerResult<f64> {
        self.store.update_value(category_id, item_id, period, raw_value)
    }

    /// Advance the category's sort state; both views see it on next read
    pub fn toggle_sort(&mut self, id: &CategoryId) -> LedgerResult<SortState> {
        self.store.category(id)?;
        let table = self.table_mut(id);
        table.sort = table.sort.toggle();
        debug!(category_id = %id, sort = ?table.sort, "sort toggled");
        Ok(table.sort)
    }

    pub fn set_page(&mut self, id: &CategoryId, view: ViewKind, page: usize) -> LedgerResult<PageWindow> {
        self.store.category(id)?;
        let table = self.table_mut(id);
        table.pages.set_page(view, page);
        debug!(category_id = %id, view = %view, page, "page changed");
        Ok(table.pages.window(view))
    }

    /// Change the compact view's page size (back to page 1)
    pub fn set_page_size(&mut self, id: &CategoryId, page_size: usize) -> LedgerResult<PageWindow> {
        self.store.category(id)?;
        let table = self.table_mut(id);
        table.pages.set_page_size(page_size)?;
        debug!(category_id = %id, page_size, "compact page size changed");
        Ok(table.pages.window(ViewKind::Compact))
    }

    fn table_mut(&mut self, id: &CategoryId) -> &mut TableContext {
        let config = &self.config;
        self.tables
            .entry(id.clone())
            .or_insert_with(|| TableContext::new(config))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::variance::VariancePercent;

    fn draft(label: &str, middle: f64, latest: f64) -> LineItemDraft {
        LineItemDraft::from_values(label, PeriodValues::new(0.0, middle, latest))
    }

    fn ledger_with(count: usize) -> (Ledger, CategoryId) {
        let mut ledger = Ledger::default();
        let id = ledger.add_category("Revenue").unwrap().id.clone();
        for i in 0..count {
            ledger
                .add_line_item(&id, &draft(&format!("row {}", i), 100.0, 100.0 + i as f64))
                .unwrap();
        }
        (ledger, id)
    }

    #[test]
    fn test_new_category_has_fresh_table() {
        let (ledger, id) = ledger_with(0);
        let table = ledger.table(&id).unwrap();
        assert_eq!(table.sort, SortState::None);
        assert_eq!(table.pages.window(ViewKind::Compact).page_size, 5);

        let window = ledger.sorted_window(&id, ViewKind::Compact).unwrap();
        assert!(window.rows.is_empty());
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.totals.label, "Total Revenue");
        assert_eq!(window.totals.values, PeriodValues::zero());
    }

    #[test]
    fn test_add_line_item_jumps_compact_view_only() {
        let (mut ledger, id) = ledger_with(5);
        ledger.set_page(&id, ViewKind::Compact, 1).unwrap();

        ledger.add_line_item(&id, &draft("sixth", 10.0, 20.0)).unwrap();

        let table = ledger.table(&id).unwrap();
        assert_eq!(table.pages.window(ViewKind::Compact).page_index, 2);
        assert_eq!(table.pages.window(ViewKind::Expanded).page_index, 1);

        let compact = ledger.sorted_window(&id, ViewKind::Compact).unwrap();
        assert_eq!(compact.rows.len(), 1);
        assert_eq!(compact.rows[0].label, "sixth");
    }

    #[test]
    fn test_rejected_line_item_keeps_page() {
        let (mut ledger, id) = ledger_with(5);
        let err = ledger.add_line_item(&id, &LineItemDraft::new("")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger.table(&id).unwrap().pages.window(ViewKind::Compact).page_index, 1);
        assert_eq!(ledger.line_items(&id).unwrap().len(), 5);
    }

    #[test]
    fn test_sort_is_shared_by_both_views() {
        let (mut ledger, id) = ledger_with(3);
        assert_eq!(ledger.toggle_sort(&id).unwrap(), SortState::ProfitDescending);

        for view in [ViewKind::Compact, ViewKind::Expanded] {
            let window = ledger.sorted_window(&id, view).unwrap();
            let labels: Vec<&str> = window.rows.iter().map(|r| r.label.as_str()).collect();
            assert_eq!(labels, vec!["row 2", "row 1", "row 0"]);
            assert_eq!(window.sort, SortState::ProfitDescending);
        }
    }

    #[test]
    fn test_tables_do_not_interfere() {
        let (mut ledger, revenue) = ledger_with(12);
        let costs = ledger.add_category("Costs").unwrap().id.clone();

        ledger.toggle_sort(&revenue).unwrap();
        ledger.set_page_size(&revenue, 10).unwrap();

        let table = ledger.table(&costs).unwrap();
        assert_eq!(table.sort, SortState::None);
        assert_eq!(table.pages.window(ViewKind::Compact).page_size, 5);
    }

    #[test]
    fn test_totals_row_covers_all_pages() {
        let (mut ledger, id) = ledger_with(7);

        // the last add left the compact view on page 2
        let last = ledger.sorted_window(&id, ViewKind::Compact).unwrap();
        assert_eq!(last.page, 2);
        assert_eq!(last.rows.len(), 2);
        assert_eq!(last.totals, ledger.sorted_window(&id, ViewKind::Expanded).unwrap().totals);

        ledger.set_page(&id, ViewKind::Compact, 1).unwrap();
        let window = ledger.sorted_window(&id, ViewKind::Compact).unwrap();

        assert_eq!(window.rows.len(), 5);
        assert_eq!(window.total_items, 7);
        assert_eq!(window.total_pages, 2);
        // 7 rows × 100 in the middle, 100+0..=100+6 latest
        assert_eq!(window.totals.values.middle, 700.0);
        assert_eq!(window.totals.values.latest, 721.0);
        assert_eq!(window.totals.variance.variance, 21.0);
        assert_eq!(window.totals.variance.variance_percent, VariancePercent::Value(3.0));
    }

    #[test]
    fn test_update_value_shows_on_next_read() {
        let (mut ledger, id) = ledger_with(2);
        let first = ledger.line_items(&id).unwrap()[0].id.clone();

        ledger.update_value(&id, &first, Period::Latest, "300").unwrap();

        assert_eq!(ledger.totals(&id).unwrap().get(Period::Latest), 401.0);
        assert_eq!(ledger.item_variance(&id, &first).unwrap().variance, 200.0);
        ledger.toggle_sort(&id).unwrap();
        let window = ledger.sorted_window(&id, ViewKind::Expanded).unwrap();
        assert_eq!(window.rows[0].id, first);
    }

    #[test]
    fn test_set_page_size_validates_and_resets() {
        let (mut ledger, id) = ledger_with(12);
        ledger.set_page(&id, ViewKind::Compact, 3).unwrap();

        let window = ledger.set_page_size(&id, 10).unwrap();
        assert_eq!(window, PageWindow { page_index: 1, page_size: 10 });

        let err = ledger.set_page_size(&id, 11).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPageSize { .. }));
    }

    #[test]
    fn test_unknown_category_everywhere() {
        let mut ledger = Ledger::default();
        let ghost = CategoryId::from("ghost");

        assert!(ledger.totals(&ghost).is_err());
        assert!(ledger.sorted_window(&ghost, ViewKind::Compact).is_err());
        assert!(ledger.toggle_sort(&ghost).is_err());
        assert!(ledger.set_page(&ghost, ViewKind::Expanded, 2).is_err());
        assert!(ledger.set_page_size(&ghost, 10).is_err());
        // no table was created for the unknown id
        assert!(ledger.tables.is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (ledger, id) = ledger_with(3);
        let restored = Ledger::from_snapshot(ledger.snapshot(), LedgerConfig::default());

        assert_eq!(restored.categories(), ledger.categories());
        assert_eq!(restored.table(&id).unwrap().sort, SortState::None);
    }
}

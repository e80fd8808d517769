// Variance Ledger - Core Library
// Exposes the ledger engine for use in the TUI, the API server, and tests

pub mod period;
pub mod entities;
pub mod error;
pub mod numeric;
pub mod variance;     // Variance and variance % for rows and totals
pub mod aggregation;  // Category totals, recomputed on every read
pub mod sort;         // Three-state profit/loss toggle
pub mod pagination;   // Compact + expanded page windows
pub mod store;        // Owner of the Category → LineItem tree
pub mod ledger;       // Query/command surface over store + per-table state
pub mod config;
pub mod snapshot;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use period::{Period, PeriodValues};
pub use entities::{Category, CategoryId, LineItem, LineItemDraft, LineItemId};
pub use error::{DivisionAnomaly, LedgerError, LedgerResult, ValidationError};
pub use numeric::NumericInput;
pub use variance::{
    variance, variance_percent, totals_variance, totals_variance_percent,
    Trend, VariancePercent, VarianceView,
};
pub use aggregation::{compute_totals, DerivedTotals};
pub use sort::SortState;
pub use pagination::{PageWindow, PaginationCoordinator, ViewKind, EXPANDED_PAGE_SIZE};
pub use store::LedgerStore;
pub use ledger::{Ledger, RowView, TableContext, TotalsRow, WindowView};
pub use config::LedgerConfig;
pub use snapshot::LedgerSnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a ledger from config: the configured seed snapshot if any, else the demo statement
pub fn open_ledger(config: LedgerConfig) -> anyhow::Result<Ledger> {
    let snapshot = match &config.seed {
        Some(path) => LedgerSnapshot::load(path)?,
        None => snapshot::demo(),
    };
    tracing::info!(
        categories = snapshot.categories.len(),
        items = snapshot.item_count(),
        "ledger opened"
    );
    Ok(Ledger::from_snapshot(snapshot, config))
}

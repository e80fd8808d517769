// Entity Models - the two-level ledger tree
//
// Each entity has:
// - Stable identity (UUID) that never changes
// - Values that are edited in place by the store
//
// Category owns its line items; nothing else holds a LineItem.

pub mod category;
pub mod line_item;

pub use category::{Category, CategoryId};
pub use line_item::{LineItem, LineItemDraft, LineItemId};

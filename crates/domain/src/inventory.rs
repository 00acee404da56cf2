use serde::{Deserialize, Serialize};

use stocklet_core::ItemId;

/// Derived current-state summary of one item's in/out totals.
///
/// Not persisted; recomputed from the record collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub item_id: ItemId,
    pub code: String,
    pub size: String,
    pub color: String,
    pub price: f64,
    pub manufacturer: String,
    /// Exact sum of stock-in quantities for this item.
    pub quantity_in: i64,
    /// Exact sum of sale quantities for this item.
    pub quantity_out: i64,
}

impl InventoryRow {
    /// May be negative: overselling is not rejected at the data layer.
    pub fn stock_on_hand(&self) -> i64 {
        self.quantity_in - self.quantity_out
    }
}

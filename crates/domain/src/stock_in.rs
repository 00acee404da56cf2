use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocklet_core::{Entity, ItemId, StockInId};

/// A recorded addition of quantity to an item's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIn {
    pub id: StockInId,
    pub item_id: ItemId,
    /// Always positive; enforced at the service boundary.
    pub quantity: u32,
    /// Calendar date, no time component.
    pub date: NaiveDate,
}

impl Entity for StockIn {
    type Id = StockInId;

    fn id(&self) -> &StockInId {
        &self.id
    }
}

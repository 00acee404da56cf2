use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocklet_core::{Entity, ItemId, SaleId};

/// A recorded removal of quantity from an item's stock, with a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub item_id: ItemId,
    /// Always positive; enforced at the service boundary.
    pub quantity: u32,
    pub customer_name: String,
    pub date: NaiveDate,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &SaleId {
        &self.id
    }
}

//! Find-or-create item resolution for free-text entry flows.

use std::sync::Arc;

use stocklet_core::{DomainResult, ItemId};
use stocklet_domain::Item;
use stocklet_store::StockStore;

/// Resolves descriptive attributes to a stable item id.
///
/// Entry flows accept free text; repeated entry of the same physical
/// product must never duplicate an item row.
pub struct ItemResolver {
    store: Arc<StockStore>,
}

impl ItemResolver {
    pub fn new(store: Arc<StockStore>) -> Self {
        Self { store }
    }

    /// Match on the trimmed (code, size, color, manufacturer) tuple.
    ///
    /// On a hit the stored price is replaced only by a positive differing
    /// price, the manufacturer is kept in sync with the input, and the
    /// existing id is returned. On a miss a new item is created with the
    /// price floored at zero.
    pub fn ensure(
        &self,
        code: &str,
        size: &str,
        color: &str,
        price: f64,
        manufacturer: &str,
    ) -> DomainResult<ItemId> {
        let code = code.trim();
        let size = size.trim();
        let color = color.trim();
        let manufacturer = manufacturer.trim();

        let existing = self
            .store
            .items()
            .find(|item| item.matches_key(code, size, color, manufacturer))?;

        if let Some(mut item) = existing {
            let id = item.id;
            let price_changed = price > 0.0 && price != item.price;
            let manufacturer_changed = item.manufacturer != manufacturer;
            if price_changed || manufacturer_changed {
                if price > 0.0 {
                    item.price = price;
                }
                item.manufacturer = manufacturer.to_string();
                self.store.items().update(item)?;
                tracing::info!(item_id = %id, "item refreshed on re-entry");
            }
            return Ok(id);
        }

        let item = Item {
            id: ItemId::new(),
            code: code.to_string(),
            size: size.to_string(),
            color: color.to_string(),
            price: price.max(0.0),
            manufacturer: manufacturer.to_string(),
        };
        let id = item.id;
        self.store.items().insert(item)?;
        tracing::info!(item_id = %id, "item created by resolver");
        Ok(id)
    }
}

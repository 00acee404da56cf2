//! The shop's record store.

use stocklet_domain::{Item, Sale, StockIn, ordering};

use crate::collection::Collection;

fn order_items(items: &mut [Item]) {
    ordering::sort_items(items);
}

// Event logs read most-recent-first; same-date rows keep insertion order
// (stable sort).
fn order_stock_ins(rows: &mut [StockIn]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
}

fn order_sales(rows: &mut [Sale]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Holds the three record collections.
///
/// Construct one per process at application start and pass it where
/// needed; there is no global instance. Dropping the store ends every
/// observation derived from it.
pub struct StockStore {
    items: Collection<Item>,
    stock_ins: Collection<StockIn>,
    sales: Collection<Sale>,
}

impl StockStore {
    pub fn new() -> Self {
        Self {
            items: Collection::new("items", order_items),
            stock_ins: Collection::new("stock_in", order_stock_ins),
            sales: Collection::new("sales", order_sales),
        }
    }

    pub fn items(&self) -> &Collection<Item> {
        &self.items
    }

    pub fn stock_ins(&self) -> &Collection<StockIn> {
        &self.stock_ins
    }

    pub fn sales(&self) -> &Collection<Sale> {
        &self.sales
    }
}

impl Default for StockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklet_core::ItemId;

    fn item(manufacturer: &str, code: &str) -> Item {
        Item {
            id: ItemId::new(),
            code: code.to_string(),
            size: "10\"".to_string(),
            color: "Red".to_string(),
            price: 5.0,
            manufacturer: manufacturer.to_string(),
        }
    }

    #[test]
    fn item_snapshots_use_the_natural_ordering() {
        let store = StockStore::new();
        store.items().insert(item("Acme", "10")).unwrap();
        store.items().insert(item("Acme", "2")).unwrap();
        store.items().insert(item("", "1")).unwrap();

        let snapshot = store.items().list();
        let keys: Vec<(&str, &str)> = snapshot
            .iter()
            .map(|i| (i.manufacturer.as_str(), i.code.as_str()))
            .collect();
        assert_eq!(keys, [("", "1"), ("Acme", "2"), ("Acme", "10")]);
    }

    #[test]
    fn event_snapshots_are_most_recent_first() {
        let store = StockStore::new();
        let item_id = ItemId::new();
        for (quantity, day) in [(1, 5), (2, 9), (3, 7)] {
            store
                .stock_ins()
                .insert(StockIn {
                    id: stocklet_core::StockInId::new(),
                    item_id,
                    quantity,
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                })
                .unwrap();
        }

        let quantities: Vec<u32> = store
            .stock_ins()
            .list()
            .iter()
            .map(|e| e.quantity)
            .collect();
        assert_eq!(quantities, [2, 3, 1]);
    }
}

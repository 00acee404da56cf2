//! Live inventory view: one row per item with summed in/out quantities.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use stocklet_core::ItemId;
use stocklet_domain::{InventoryRow, Item, Sale, StockIn, ordering};
use stocklet_store::{Snapshot, StockStore};

/// Build the inventory view from full input snapshots.
///
/// Group-by-sum both event logs, join against the items, filter by
/// manufacturer (blank or absent means no filter, comparison is trimmed
/// and case-insensitive), sort naturally. Items without events get zero
/// totals.
pub fn compute_inventory(
    items: &[Item],
    stock_ins: &[StockIn],
    sales: &[Sale],
    manufacturer: Option<&str>,
) -> Vec<InventoryRow> {
    let mut totals_in: HashMap<ItemId, i64> = HashMap::new();
    for event in stock_ins {
        *totals_in.entry(event.item_id).or_insert(0) += i64::from(event.quantity);
    }
    let mut totals_out: HashMap<ItemId, i64> = HashMap::new();
    for event in sales {
        *totals_out.entry(event.item_id).or_insert(0) += i64::from(event.quantity);
    }

    let wanted = manufacturer
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<InventoryRow> = items
        .iter()
        .filter(|item| match &wanted {
            Some(m) => item.manufacturer.trim().to_lowercase() == *m,
            None => true,
        })
        .map(|item| InventoryRow {
            item_id: item.id,
            code: item.code.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            price: item.price,
            manufacturer: item.manufacturer.clone(),
            quantity_in: totals_in.get(&item.id).copied().unwrap_or(0),
            quantity_out: totals_out.get(&item.id).copied().unwrap_or(0),
        })
        .collect();

    ordering::sort_rows(&mut rows);
    rows
}

/// Recomputes the inventory view whenever items, stock-ins or sales
/// change. Full recomputation per change; the data volumes here are a
/// small shop's.
pub struct Aggregator {
    store: Arc<StockStore>,
}

impl Aggregator {
    pub fn new(store: Arc<StockStore>) -> Self {
        Self { store }
    }

    /// One-shot view over the current snapshots.
    pub fn snapshot(&self, manufacturer: Option<&str>) -> Vec<InventoryRow> {
        let items = self.store.items().list();
        let stock_ins = self.store.stock_ins().list();
        let sales = self.store.sales().list();
        compute_inventory(&items, &stock_ins, &sales, manufacturer)
    }

    /// Live view.
    ///
    /// The receiver starts at a snapshot consistent with all three inputs
    /// and a new value arrives after every recomputation. Each emission
    /// reads the latest committed snapshot of every input, so stale and
    /// fresh inputs are never mixed. The recompute task exits when the
    /// last receiver is dropped or the store goes away.
    pub fn observe(&self, manufacturer: Option<String>) -> watch::Receiver<Snapshot<InventoryRow>> {
        let mut items_rx = self.store.items().observe();
        let mut stock_ins_rx = self.store.stock_ins().observe();
        let mut sales_rx = self.store.sales().observe();

        let initial = {
            let items = items_rx.borrow_and_update().clone();
            let stock_ins = stock_ins_rx.borrow_and_update().clone();
            let sales = sales_rx.borrow_and_update().clone();
            compute_inventory(&items, &stock_ins, &sales, manufacturer.as_deref())
        };
        let (tx, rx) = watch::channel(Arc::new(initial));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = items_rx.changed() => if changed.is_err() { break },
                    changed = stock_ins_rx.changed() => if changed.is_err() { break },
                    changed = sales_rx.changed() => if changed.is_err() { break },
                }

                let items = items_rx.borrow_and_update().clone();
                let stock_ins = stock_ins_rx.borrow_and_update().clone();
                let sales = sales_rx.borrow_and_update().clone();
                let rows = compute_inventory(&items, &stock_ins, &sales, manufacturer.as_deref());
                tracing::debug!(rows = rows.len(), "inventory view recomputed");
                tx.send_replace(Arc::new(rows));
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklet_core::{SaleId, StockInId};

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

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn totals_sum_per_item_and_default_to_zero() {
        let with_events = item("Acme", "1");
        let without_events = item("Acme", "2");
        let stock_ins = vec![
            StockIn {
                id: StockInId::new(),
                item_id: with_events.id,
                quantity: 50,
                date: date(1),
            },
            StockIn {
                id: StockInId::new(),
                item_id: with_events.id,
                quantity: 8,
                date: date(2),
            },
        ];
        let sales = vec![Sale {
            id: SaleId::new(),
            item_id: with_events.id,
            quantity: 12,
            customer_name: "Jane".to_string(),
            date: date(5),
        }];

        let rows = compute_inventory(
            &[with_events.clone(), without_events.clone()],
            &stock_ins,
            &sales,
            None,
        );
        assert_eq!(rows.len(), 2);
        let busy = rows.iter().find(|r| r.item_id == with_events.id).unwrap();
        assert_eq!(busy.quantity_in, 58);
        assert_eq!(busy.quantity_out, 12);
        assert_eq!(busy.stock_on_hand(), 46);
        let idle = rows.iter().find(|r| r.item_id == without_events.id).unwrap();
        assert_eq!(idle.quantity_in, 0);
        assert_eq!(idle.quantity_out, 0);
    }

    #[test]
    fn manufacturer_filter_is_trimmed_and_case_insensitive() {
        let acme = item("Acme", "1");
        let globo = item("Globo", "2");
        let rows = compute_inventory(
            &[acme.clone(), globo],
            &[],
            &[],
            Some("  ACME "),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, acme.id);
    }

    #[test]
    fn blank_manufacturer_filter_means_no_filter() {
        let rows = compute_inventory(&[item("Acme", "1"), item("Globo", "2")], &[], &[], Some("   "));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn rows_come_out_naturally_sorted() {
        let rows = compute_inventory(
            &[item("Acme", "10"), item("Acme", "2"), item("", "7")],
            &[],
            &[],
            None,
        );
        let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["7", "2", "10"]);
    }
}

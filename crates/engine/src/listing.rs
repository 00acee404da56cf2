//! Display-only live listings backing the entry screens.

use std::sync::Arc;

use tokio::sync::watch;

use stocklet_domain::{Item, Sale};
use stocklet_store::{Snapshot, StockStore};

/// Distinct non-empty manufacturers, ascending (entry autocompletion).
pub fn manufacturers(items: &[Item]) -> Vec<String> {
    let mut names: Vec<String> = items
        .iter()
        .map(|i| i.manufacturer.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Sales narrowed by a case-insensitive customer substring (blank means
/// all), most recent first, same-date rows ordered by customer name
/// case-insensitively.
pub fn sales_by_customer(sales: &[Sale], customer: Option<&str>) -> Vec<Sale> {
    let needle = customer
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<Sale> = sales
        .iter()
        .filter(|s| match &needle {
            Some(n) => s.customer_name.to_lowercase().contains(n),
            None => true,
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        b.date.cmp(&a.date).then_with(|| {
            a.customer_name
                .to_lowercase()
                .cmp(&b.customer_name.to_lowercase())
        })
    });
    rows
}

/// Live wrappers over the listing projections.
pub struct Listings {
    store: Arc<StockStore>,
}

impl Listings {
    pub fn new(store: Arc<StockStore>) -> Self {
        Self { store }
    }

    pub fn observe_manufacturers(&self) -> watch::Receiver<Snapshot<String>> {
        let mut items_rx = self.store.items().observe();
        let initial = manufacturers(&items_rx.borrow_and_update());
        let (tx, rx) = watch::channel(Arc::new(initial));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = items_rx.changed() => if changed.is_err() { break },
                }
                let names = manufacturers(&items_rx.borrow_and_update());
                tx.send_replace(Arc::new(names));
            }
        });

        rx
    }

    pub fn observe_sales_by_customer(
        &self,
        customer: Option<String>,
    ) -> watch::Receiver<Snapshot<Sale>> {
        let mut sales_rx = self.store.sales().observe();
        let initial = sales_by_customer(&sales_rx.borrow_and_update(), customer.as_deref());
        let (tx, rx) = watch::channel(Arc::new(initial));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = sales_rx.changed() => if changed.is_err() { break },
                }
                let rows = sales_by_customer(&sales_rx.borrow_and_update(), customer.as_deref());
                tx.send_replace(Arc::new(rows));
            }
        });

        rx
    }
}

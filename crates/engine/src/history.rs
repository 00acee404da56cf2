//! Filtered operation history: events joined with their item's
//! descriptive fields and narrowed by a live-updatable filter.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use stocklet_core::ItemId;
use stocklet_domain::{HistoryItem, HistoryKind, Item, OperationFilter, Sale, StockIn};
use stocklet_store::{Snapshot, StockStore};

/// Join one event log with the items and apply the filter.
///
/// Event snapshots arrive most-recent-first from the store, and the join
/// preserves that order, so results are sorted descending by date with
/// insertion order breaking ties. Events whose item is gone are dropped.
fn join_and_filter(
    kind: HistoryKind,
    items: &[Item],
    stock_ins: &[StockIn],
    sales: &[Sale],
    filter: &OperationFilter,
) -> Vec<HistoryItem> {
    let index: HashMap<ItemId, &Item> = items.iter().map(|i| (i.id, i)).collect();
    let mut dropped = 0usize;

    let entries: Vec<HistoryItem> = match kind {
        HistoryKind::StockIn => stock_ins
            .iter()
            .filter_map(|event| match index.get(&event.item_id) {
                Some(item) => Some(HistoryItem::from_stock_in(event, item)),
                None => {
                    dropped += 1;
                    None
                }
            })
            .filter(|entry| filter.matches(entry))
            .collect(),
        HistoryKind::Sale => sales
            .iter()
            .filter_map(|event| match index.get(&event.item_id) {
                Some(item) => Some(HistoryItem::from_sale(event, item)),
                None => {
                    dropped += 1;
                    None
                }
            })
            .filter(|entry| filter.matches(entry))
            .collect(),
    };

    if dropped > 0 {
        tracing::warn!(?kind, dropped, "history entries reference missing items");
    }
    entries
}

/// Handle on a live history query.
///
/// Owns the observation: keep it alive while observing, drop it to
/// unsubscribe (the recompute task exits). Changing the filter retargets
/// the same observation; because one task serially recomputes with the
/// latest filter value, a superseded filter's result is never delivered
/// after a newer filter's result.
pub struct HistoryQuery {
    filter_tx: watch::Sender<OperationFilter>,
    results_rx: watch::Receiver<Snapshot<HistoryItem>>,
}

impl HistoryQuery {
    /// Replace the filter; the next emission reflects it.
    pub fn set_filter(&self, filter: OperationFilter) {
        self.filter_tx.send_replace(filter);
    }

    /// Live result sequence, starting at the current result set.
    pub fn results(&self) -> watch::Receiver<Snapshot<HistoryItem>> {
        self.results_rx.clone()
    }

    /// Current result set.
    pub fn latest(&self) -> Snapshot<HistoryItem> {
        self.results_rx.borrow().clone()
    }
}

/// Projects the event logs into filterable history views.
pub struct HistoryEngine {
    store: Arc<StockStore>,
}

impl HistoryEngine {
    pub fn new(store: Arc<StockStore>) -> Self {
        Self { store }
    }

    /// One-shot query over the current snapshots.
    pub fn snapshot(&self, kind: HistoryKind, filter: &OperationFilter) -> Vec<HistoryItem> {
        let items = self.store.items().list();
        let stock_ins = self.store.stock_ins().list();
        let sales = self.store.sales().list();
        join_and_filter(kind, &items, &stock_ins, &sales, filter)
    }

    /// Live query, recomputed on any change to the items, the relevant
    /// event log, or the filter.
    pub fn observe(&self, kind: HistoryKind, filter: OperationFilter) -> HistoryQuery {
        let mut items_rx = self.store.items().observe();
        let mut stock_ins_rx = self.store.stock_ins().observe();
        let mut sales_rx = self.store.sales().observe();
        let (filter_tx, mut filter_rx) = watch::channel(filter);

        let initial = {
            let items = items_rx.borrow_and_update().clone();
            let stock_ins = stock_ins_rx.borrow_and_update().clone();
            let sales = sales_rx.borrow_and_update().clone();
            let current = filter_rx.borrow_and_update().clone();
            join_and_filter(kind, &items, &stock_ins, &sales, &current)
        };
        let (results_tx, results_rx) = watch::channel(Arc::new(initial));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = results_tx.closed() => break,
                    changed = filter_rx.changed() => if changed.is_err() { break },
                    changed = items_rx.changed() => if changed.is_err() { break },
                    changed = stock_ins_rx.changed() => if changed.is_err() { break },
                    changed = sales_rx.changed() => if changed.is_err() { break },
                }

                let items = items_rx.borrow_and_update().clone();
                let stock_ins = stock_ins_rx.borrow_and_update().clone();
                let sales = sales_rx.borrow_and_update().clone();
                let current = filter_rx.borrow_and_update().clone();
                let entries = join_and_filter(kind, &items, &stock_ins, &sales, &current);
                tracing::debug!(?kind, entries = entries.len(), "history view recomputed");
                results_tx.send_replace(Arc::new(entries));
            }
        });

        HistoryQuery {
            filter_tx,
            results_rx,
        }
    }
}

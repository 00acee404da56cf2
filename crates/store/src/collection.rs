//! Observable record collection.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use stocklet_core::Entity;

use crate::error::StoreError;

/// Immutable snapshot of a collection's rows.
pub type Snapshot<T> = Arc<Vec<T>>;

/// In-memory record collection observable as a live snapshot sequence.
///
/// Mutations serialize on the internal lock and the fresh snapshot is
/// published before the lock is released, so observers see atomic
/// before/after states in mutation order — never an in-progress
/// mutation. Rows are kept in the collection's display order (the
/// ordering function runs on every publish).
pub struct Collection<T: Entity> {
    name: &'static str,
    rows: RwLock<Vec<T>>,
    snapshot_tx: watch::Sender<Snapshot<T>>,
    order: fn(&mut [T]),
}

impl<T> Collection<T>
where
    T: Entity + Clone,
{
    pub fn new(name: &'static str, order: fn(&mut [T])) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            name,
            rows: RwLock::new(Vec::new()),
            snapshot_tx,
            order,
        }
    }

    /// Insert a new record. The id must not already be present.
    pub fn insert(&self, row: T) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        if rows.iter().any(|r| r.id() == row.id()) {
            return Err(StoreError::Duplicate);
        }
        rows.push(row);
        self.publish(&mut rows);
        Ok(())
    }

    /// Replace the record carrying the same id.
    pub fn update(&self, row: T) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let slot = rows
            .iter_mut()
            .find(|r| *r.id() == *row.id())
            .ok_or(StoreError::NotFound)?;
        *slot = row;
        self.publish(&mut rows);
        Ok(())
    }

    /// Remove the record with the given id.
    pub fn delete(&self, id: &T::Id) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        self.publish(&mut rows);
        Ok(())
    }

    /// Remove every record matching the predicate; returns the removed
    /// count. At most one snapshot is published (none when nothing
    /// matched).
    pub fn delete_where(&self, pred: impl Fn(&T) -> bool) -> Result<usize, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let before = rows.len();
        rows.retain(|r| !pred(r));
        let removed = before - rows.len();
        if removed > 0 {
            self.publish(&mut rows);
        }
        Ok(removed)
    }

    pub fn get(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().find(|r| r.id() == id).cloned())
    }

    /// First record matching the predicate, in display order.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().find(|r| pred(r)).cloned())
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn list(&self) -> Snapshot<T> {
        self.snapshot_tx.borrow().clone()
    }

    /// Live snapshot sequence; the receiver starts at the current
    /// snapshot. Dropping every receiver costs nothing: the collection
    /// keeps publishing for late subscribers.
    pub fn observe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshot_tx.subscribe()
    }

    fn publish(&self, rows: &mut Vec<T>) {
        (self.order)(rows);
        let snapshot = Arc::new(rows.clone());
        tracing::debug!(
            collection = self.name,
            rows = snapshot.len(),
            "snapshot published"
        );
        self.snapshot_tx.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stocklet_core::{ItemId, StockInId};
    use stocklet_domain::StockIn;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn by_date_desc(rows: &mut [StockIn]) {
        rows.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn event(item_id: ItemId, quantity: u32, day: u32) -> StockIn {
        StockIn {
            id: StockInId::new(),
            item_id,
            quantity,
            date: date(day),
        }
    }

    #[tokio::test]
    async fn insert_publishes_an_ordered_snapshot() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let mut rx = collection.observe();
        assert!(rx.borrow().is_empty());

        let item_id = ItemId::new();
        collection.insert(event(item_id, 5, 1)).unwrap();
        collection.insert(event(item_id, 7, 3)).unwrap();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 2);
        // Most recent first.
        assert_eq!(snapshot[0].quantity, 7);
        assert_eq!(snapshot[1].quantity, 5);
    }

    #[test]
    fn duplicate_id_is_rejected_without_publishing() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let first = event(ItemId::new(), 5, 1);
        let mut duplicate = first.clone();
        duplicate.quantity = 9;

        collection.insert(first).unwrap();
        let err = collection.insert(duplicate).unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
        assert_eq!(collection.list().len(), 1);
        assert_eq!(collection.list()[0].quantity, 5);
    }

    #[test]
    fn update_of_missing_id_is_not_found() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let err = collection.update(event(ItemId::new(), 5, 1)).unwrap_err();
        assert_eq!(err, StoreError::NotFound);
        assert!(collection.list().is_empty());
    }

    #[test]
    fn delete_of_missing_id_is_not_found() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let err = collection.delete(&StockInId::new()).unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn delete_where_publishes_once_and_reports_the_count() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let victim = ItemId::new();
        let survivor = ItemId::new();
        collection.insert(event(victim, 1, 1)).unwrap();
        collection.insert(event(victim, 2, 2)).unwrap();
        collection.insert(event(survivor, 3, 3)).unwrap();

        let mut rx = collection.observe();
        let removed = collection.delete_where(|e| e.item_id == victim).unwrap();
        assert_eq!(removed, 2);

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].item_id, survivor);
        // Exactly one emission for the whole sweep.
        assert!(!rx.has_changed().unwrap());

        // Removing nothing publishes nothing.
        let removed = collection.delete_where(|e| e.item_id == victim).unwrap();
        assert_eq!(removed, 0);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn get_and_find_read_the_live_rows() {
        let collection: Collection<StockIn> = Collection::new("stock_in", by_date_desc);
        let stored = event(ItemId::new(), 5, 1);
        let id = stored.id;
        collection.insert(stored).unwrap();

        assert_eq!(collection.get(&id).unwrap().map(|e| e.quantity), Some(5));
        assert!(collection.get(&StockInId::new()).unwrap().is_none());
        assert!(collection.find(|e| e.quantity == 5).unwrap().is_some());
        assert!(collection.find(|e| e.quantity == 6).unwrap().is_none());
    }
}

//! Application-facing service: pass-through record operations plus the
//! derived live views.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use stocklet_core::{DomainError, DomainResult, ItemId, SaleId, StockInId};
use stocklet_domain::{
    HistoryItem, HistoryKind, InventoryRow, Item, OperationFilter, Sale, StockIn,
};
use stocklet_store::{Snapshot, StockStore};

use crate::aggregator::Aggregator;
use crate::history::{HistoryEngine, HistoryQuery};
use crate::listing::Listings;
use crate::resolver::ItemResolver;

/// One service per store.
///
/// Construct at application start, drop at shutdown. All mutations go
/// through here so validation and the cascade rules apply uniformly; a
/// missing id is reported as `NotFound`, never silently ignored, and a
/// failed mutation leaves every snapshot untouched.
pub struct StockService {
    store: Arc<StockStore>,
    aggregator: Aggregator,
    history: HistoryEngine,
    listings: Listings,
    resolver: ItemResolver,
}

impl StockService {
    pub fn new(store: Arc<StockStore>) -> Self {
        Self {
            aggregator: Aggregator::new(store.clone()),
            history: HistoryEngine::new(store.clone()),
            listings: Listings::new(store.clone()),
            resolver: ItemResolver::new(store.clone()),
            store,
        }
    }

    /// Direct access for callers that only need raw collection reads.
    pub fn store(&self) -> &Arc<StockStore> {
        &self.store
    }

    // --- items ---

    pub fn add_item(
        &self,
        code: &str,
        size: &str,
        color: &str,
        price: f64,
        manufacturer: &str,
    ) -> DomainResult<ItemId> {
        let item = Item {
            id: ItemId::new(),
            code: code.trim().to_string(),
            size: size.trim().to_string(),
            color: color.trim().to_string(),
            price,
            manufacturer: manufacturer.trim().to_string(),
        };
        validate_item(&item)?;
        let id = item.id;
        self.store.items().insert(item)?;
        tracing::info!(item_id = %id, "item added");
        Ok(id)
    }

    /// Full update path: descriptive fields, price and manufacturer are
    /// all replaceable.
    pub fn update_item(&self, item: Item) -> DomainResult<()> {
        validate_item(&item)?;
        self.store.items().update(item)?;
        Ok(())
    }

    /// Cascading delete: the item's stock-in and sale events go first so
    /// no event is ever left pointing at a missing item.
    pub fn delete_item(&self, id: ItemId) -> DomainResult<()> {
        if self.store.items().get(&id)?.is_none() {
            return Err(DomainError::NotFound);
        }
        let stock_ins = self.store.stock_ins().delete_where(|e| e.item_id == id)?;
        let sales = self.store.sales().delete_where(|e| e.item_id == id)?;
        self.store.items().delete(&id)?;
        tracing::info!(item_id = %id, stock_ins, sales, "item deleted with its events");
        Ok(())
    }

    pub fn get_item(&self, id: ItemId) -> DomainResult<Option<Item>> {
        Ok(self.store.items().get(&id)?)
    }

    /// Exact lookup on the identity tuple (trimmed, case-sensitive).
    pub fn find_item_by_attrs(
        &self,
        code: &str,
        size: &str,
        color: &str,
        manufacturer: &str,
    ) -> DomainResult<Option<Item>> {
        let code = code.trim();
        let size = size.trim();
        let color = color.trim();
        let manufacturer = manufacturer.trim();
        Ok(self
            .store
            .items()
            .find(|i| i.matches_key(code, size, color, manufacturer))?)
    }

    /// First item whose code matches exactly (quick-entry helper).
    pub fn find_item_id_by_code(&self, code: &str) -> DomainResult<Option<ItemId>> {
        let code = code.trim().to_string();
        Ok(self
            .store
            .items()
            .find(|i| i.code == code)?
            .map(|i| i.id))
    }

    /// Items in display order, live.
    pub fn observe_items(&self) -> watch::Receiver<Snapshot<Item>> {
        self.store.items().observe()
    }

    // --- stock-in events ---

    pub fn add_stock_in(
        &self,
        item_id: ItemId,
        quantity: u32,
        date: NaiveDate,
    ) -> DomainResult<StockInId> {
        self.require_item(item_id)?;
        require_positive(quantity)?;
        let event = StockIn {
            id: StockInId::new(),
            item_id,
            quantity,
            date,
        };
        let id = event.id;
        self.store.stock_ins().insert(event)?;
        tracing::info!(stock_in_id = %id, item_id = %item_id, quantity, "stock-in recorded");
        Ok(id)
    }

    /// Quantity and date are the editable fields.
    pub fn update_stock_in(
        &self,
        id: StockInId,
        quantity: u32,
        date: NaiveDate,
    ) -> DomainResult<()> {
        require_positive(quantity)?;
        let mut event = self
            .store
            .stock_ins()
            .get(&id)?
            .ok_or(DomainError::NotFound)?;
        event.quantity = quantity;
        event.date = date;
        self.store.stock_ins().update(event)?;
        Ok(())
    }

    pub fn delete_stock_in(&self, id: StockInId) -> DomainResult<()> {
        Ok(self.store.stock_ins().delete(&id)?)
    }

    // --- sales ---

    pub fn add_sale(
        &self,
        item_id: ItemId,
        quantity: u32,
        customer_name: &str,
        date: NaiveDate,
    ) -> DomainResult<SaleId> {
        self.require_item(item_id)?;
        require_positive(quantity)?;
        let event = Sale {
            id: SaleId::new(),
            item_id,
            quantity,
            customer_name: customer_name.trim().to_string(),
            date,
        };
        let id = event.id;
        self.store.sales().insert(event)?;
        tracing::info!(sale_id = %id, item_id = %item_id, quantity, "sale recorded");
        Ok(id)
    }

    /// Quantity, customer and date are the editable fields.
    pub fn update_sale(
        &self,
        id: SaleId,
        quantity: u32,
        customer_name: &str,
        date: NaiveDate,
    ) -> DomainResult<()> {
        require_positive(quantity)?;
        let mut event = self.store.sales().get(&id)?.ok_or(DomainError::NotFound)?;
        event.quantity = quantity;
        event.customer_name = customer_name.trim().to_string();
        event.date = date;
        self.store.sales().update(event)?;
        Ok(())
    }

    pub fn delete_sale(&self, id: SaleId) -> DomainResult<()> {
        Ok(self.store.sales().delete(&id)?)
    }

    // --- derived views ---

    /// Find-or-create by descriptive attributes; see `ItemResolver`.
    pub fn ensure_item(
        &self,
        code: &str,
        size: &str,
        color: &str,
        price: f64,
        manufacturer: &str,
    ) -> DomainResult<ItemId> {
        self.resolver.ensure(code, size, color, price, manufacturer)
    }

    pub fn observe_inventory(
        &self,
        manufacturer: Option<String>,
    ) -> watch::Receiver<Snapshot<InventoryRow>> {
        self.aggregator.observe(manufacturer)
    }

    pub fn inventory_snapshot(&self, manufacturer: Option<&str>) -> Vec<InventoryRow> {
        self.aggregator.snapshot(manufacturer)
    }

    pub fn observe_history(&self, kind: HistoryKind, filter: OperationFilter) -> HistoryQuery {
        self.history.observe(kind, filter)
    }

    pub fn history_snapshot(
        &self,
        kind: HistoryKind,
        filter: &OperationFilter,
    ) -> Vec<HistoryItem> {
        self.history.snapshot(kind, filter)
    }

    pub fn observe_manufacturers(&self) -> watch::Receiver<Snapshot<String>> {
        self.listings.observe_manufacturers()
    }

    pub fn observe_sales_by_customer(
        &self,
        customer: Option<String>,
    ) -> watch::Receiver<Snapshot<Sale>> {
        self.listings.observe_sales_by_customer(customer)
    }

    /// Advisory check only: reads the current stock level and compares.
    ///
    /// Nothing stops a concurrent insert between this check and a
    /// subsequent `add_sale`, and overselling is not rejected there
    /// either.
    pub fn can_sell(&self, item_id: ItemId, quantity: u32) -> DomainResult<bool> {
        self.require_item(item_id)?;
        let rows = self.aggregator.snapshot(None);
        let on_hand = rows
            .iter()
            .find(|r| r.item_id == item_id)
            .map(InventoryRow::stock_on_hand)
            .unwrap_or(0);
        Ok(i64::from(quantity) <= on_hand)
    }

    fn require_item(&self, id: ItemId) -> DomainResult<()> {
        if self.store.items().get(&id)?.is_none() {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

fn validate_item(item: &Item) -> DomainResult<()> {
    if item.code.trim().is_empty() || item.size.trim().is_empty() || item.color.trim().is_empty() {
        return Err(DomainError::validation("code, size and color are required"));
    }
    if item.price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(())
}

fn require_positive(quantity: u32) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocklet_core::{ItemId, SaleId, StockInId};

use crate::item::Item;
use crate::sale::Sale;
use crate::stock_in::StockIn;

/// Which operation log a history entry came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    StockIn,
    Sale,
}

/// Typed back-reference to the underlying event record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRef {
    StockIn(StockInId),
    Sale(SaleId),
}

/// A stock-in or sale event enriched with its item's descriptive fields,
/// for display and filtering. Built at query time, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub source: HistoryRef,
    pub item_id: ItemId,
    pub date: NaiveDate,
    pub quantity: u32,
    /// Present for sales only.
    pub customer_name: Option<String>,
    pub code: String,
    pub size: String,
    pub color: String,
    pub price: f64,
    pub manufacturer: String,
}

impl HistoryItem {
    pub fn kind(&self) -> HistoryKind {
        match self.source {
            HistoryRef::StockIn(_) => HistoryKind::StockIn,
            HistoryRef::Sale(_) => HistoryKind::Sale,
        }
    }

    pub fn from_stock_in(event: &StockIn, item: &Item) -> Self {
        Self {
            source: HistoryRef::StockIn(event.id),
            item_id: item.id,
            date: event.date,
            quantity: event.quantity,
            customer_name: None,
            code: item.code.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            price: item.price,
            manufacturer: item.manufacturer.clone(),
        }
    }

    pub fn from_sale(event: &Sale, item: &Item) -> Self {
        Self {
            source: HistoryRef::Sale(event.id),
            item_id: item.id,
            date: event.date,
            quantity: event.quantity,
            customer_name: Some(event.customer_name.clone()),
            code: item.code.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            price: item.price,
            manufacturer: item.manufacturer.clone(),
        }
    }
}

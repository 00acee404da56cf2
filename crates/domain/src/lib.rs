//! `stocklet-domain` — record types, derived views, filtering and ordering.
//!
//! Pure data + pure functions; the observable store and the live view
//! engines build on top of this crate.

pub mod filter;
pub mod history;
pub mod inventory;
pub mod item;
pub mod ordering;
pub mod sale;
pub mod stock_in;

pub use filter::OperationFilter;
pub use history::{HistoryItem, HistoryKind, HistoryRef};
pub use inventory::InventoryRow;
pub use item::Item;
pub use sale::Sale;
pub use stock_in::StockIn;

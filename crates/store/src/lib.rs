//! `stocklet-store` — observable in-memory record store.
//!
//! Three record collections (items, stock-in events, sale events), each
//! observable as a live sequence of full snapshots. Every successful
//! mutation publishes a new snapshot; a failed mutation publishes
//! nothing.

pub mod collection;
pub mod error;
pub mod store;

pub use collection::{Collection, Snapshot};
pub use error::StoreError;
pub use store::StockStore;

use serde::{Deserialize, Serialize};

use stocklet_core::{Entity, ItemId};

/// A distinct product.
///
/// For upsert matching an item is identified by the
/// (code, size, color, manufacturer) tuple, compared trimmed and
/// case-sensitive. The id stays stable across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub code: String,
    pub size: String,
    pub color: String,
    /// Unit price; never negative.
    pub price: f64,
    /// May be empty when the manufacturer is unknown.
    pub manufacturer: String,
}

impl Item {
    /// Identity-tuple comparison used by the upsert resolver.
    ///
    /// Inputs are expected pre-trimmed; stored fields are trimmed before
    /// comparing so records entered before trimming was enforced still
    /// match.
    pub fn matches_key(&self, code: &str, size: &str, color: &str, manufacturer: &str) -> bool {
        self.code.trim() == code
            && self.size.trim() == size
            && self.color.trim() == color
            && self.manufacturer.trim() == manufacturer
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

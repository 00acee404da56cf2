use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::history::{HistoryItem, HistoryKind};

/// Optional predicate parameters narrowing a history query.
///
/// Absent or blank-after-trim fields impose no constraint. `customer`
/// applies to sales only and is ignored for stock-in entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer: Option<String>,
    pub code: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub manufacturer: Option<String>,
}

/// A field constrains the result set only when it has non-blank content.
fn given(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// Full Unicode lowercasing: shop data is frequently non-ASCII.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl OperationFilter {
    /// True when no field constrains the result set.
    pub fn is_empty(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && given(&self.customer).is_none()
            && given(&self.code).is_none()
            && given(&self.size).is_none()
            && given(&self.color).is_none()
            && given(&self.manufacturer).is_none()
    }

    /// All clauses ANDed; both date bounds are inclusive.
    pub fn matches(&self, entry: &HistoryItem) -> bool {
        if let Some(from) = self.date_from {
            if entry.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if entry.date > to {
                return false;
            }
        }
        if entry.kind() == HistoryKind::Sale {
            if let Some(customer) = given(&self.customer) {
                let name = entry.customer_name.as_deref().unwrap_or("");
                if !name.to_lowercase().contains(&customer.to_lowercase()) {
                    return false;
                }
            }
        }
        if let Some(code) = given(&self.code) {
            if !entry.code.to_lowercase().starts_with(&code.to_lowercase()) {
                return false;
            }
        }
        if let Some(size) = given(&self.size) {
            if !eq_ignore_case(&entry.size, size) {
                return false;
            }
        }
        if let Some(color) = given(&self.color) {
            if !eq_ignore_case(&entry.color, color) {
                return false;
            }
        }
        if let Some(manufacturer) = given(&self.manufacturer) {
            if !eq_ignore_case(&entry.manufacturer, manufacturer) {
                return false;
            }
        }
        true
    }
}

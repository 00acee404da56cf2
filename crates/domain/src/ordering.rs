//! Natural ordering for item listings and the inventory view.
//!
//! Three ascending levels: lower-cased manufacturer (empty sorts first),
//! the leading digit run of the trimmed code, and the first digit run
//! found anywhere in the trimmed size. Codes without a leading digit and
//! sizes without any digit sort after everything else.

use crate::inventory::InventoryRow;
use crate::item::Item;

/// Composite sort key.
///
/// Gives human-expected ordering: codes "2", "10", "100" order
/// numerically, and sizes like `10"` and `12"` order by magnitude
/// regardless of surrounding text.
pub fn sort_key(manufacturer: &str, code: &str, size: &str) -> (String, u64, u64) {
    (
        manufacturer.trim().to_lowercase(),
        code_key(code),
        size_key(size),
    )
}

/// Leading digit run of the trimmed code; no leading digit sorts last.
pub fn code_key(code: &str) -> u64 {
    digits_value(code.trim().chars().take_while(|c| c.is_ascii_digit()))
}

/// First digit run found anywhere in the trimmed size; no digits sorts
/// last.
pub fn size_key(size: &str) -> u64 {
    let trimmed = size.trim();
    let Some(start) = trimmed.find(|c: char| c.is_ascii_digit()) else {
        return u64::MAX;
    };
    digits_value(trimmed[start..].chars().take_while(|c| c.is_ascii_digit()))
}

// Saturating accumulation: absurdly long digit runs still order after
// every sane value instead of overflowing.
fn digits_value(run: impl Iterator<Item = char>) -> u64 {
    let mut value: u64 = 0;
    let mut any = false;
    for c in run {
        any = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(c.to_digit(10).unwrap_or(0)));
    }
    if any { value } else { u64::MAX }
}

/// Stable natural sort for item listings.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by_cached_key(|i| sort_key(&i.manufacturer, &i.code, &i.size));
}

/// Stable natural sort for the inventory view.
pub fn sort_rows(rows: &mut [InventoryRow]) {
    rows.sort_by_cached_key(|r| sort_key(&r.manufacturer, &r.code, &r.size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stocklet_core::ItemId;

    fn item(manufacturer: &str, code: &str, size: &str) -> Item {
        Item {
            id: ItemId::new(),
            code: code.to_string(),
            size: size.to_string(),
            color: "Red".to_string(),
            price: 1.0,
            manufacturer: manufacturer.to_string(),
        }
    }

    #[test]
    fn codes_order_numerically_not_lexically() {
        let mut items = vec![item("", "2", "5\""), item("", "10", "5\""), item("", "1", "5\"")];
        sort_items(&mut items);
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["1", "2", "10"]);
    }

    #[test]
    fn sizes_order_by_embedded_number() {
        let mut items = vec![
            item("", "1", "10\""),
            item("", "1", "2\""),
            item("", "1", "12\""),
        ];
        sort_items(&mut items);
        let sizes: Vec<&str> = items.iter().map(|i| i.size.as_str()).collect();
        assert_eq!(sizes, ["2\"", "10\"", "12\""]);
    }

    #[test]
    fn empty_manufacturer_sorts_first_and_comparison_ignores_case() {
        let mut items = vec![
            item("globo", "1", "5\""),
            item("", "1", "5\""),
            item("Acme", "1", "5\""),
        ];
        sort_items(&mut items);
        let makers: Vec<&str> = items.iter().map(|i| i.manufacturer.as_str()).collect();
        assert_eq!(makers, ["", "Acme", "globo"]);
    }

    #[test]
    fn codes_without_leading_digit_sort_last() {
        let mut items = vec![item("", "RE12", "5\""), item("", "100", "5\"")];
        sort_items(&mut items);
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["100", "RE12"]);
    }

    #[test]
    fn size_key_finds_the_first_digit_run_anywhere() {
        assert_eq!(size_key("10\""), 10);
        assert_eq!(size_key("approx 12 cm"), 12);
        assert_eq!(size_key("big"), u64::MAX);
    }

    #[test]
    fn overlong_digit_runs_saturate() {
        assert_eq!(code_key("99999999999999999999999"), u64::MAX);
    }

    proptest! {
        /// Re-sorting an already-sorted list leaves the order unchanged.
        #[test]
        fn sorting_is_idempotent(
            raw in proptest::collection::vec(("\\PC{0,8}", "\\PC{0,8}", "\\PC{0,8}"), 0..40)
        ) {
            let mut items: Vec<Item> = raw
                .into_iter()
                .map(|(m, c, s)| item(&m, &c, &s))
                .collect();
            sort_items(&mut items);
            let once = items.clone();
            sort_items(&mut items);
            prop_assert_eq!(once, items);
        }

        /// The key never panics on arbitrary input.
        #[test]
        fn key_is_total(m in "\\PC{0,16}", c in "\\PC{0,16}", s in "\\PC{0,16}") {
            let _ = sort_key(&m, &c, &s);
        }
    }
}

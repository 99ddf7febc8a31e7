//! Item data model and store request types.

use serde::Deserialize;
use serde::Serialize;
use shortlist_order::OrderKey;

/// An entry in the item collection.
///
/// `order_key` positions the item inside the manually ordered selected
/// sequence; comparison of order keys is plain string comparison. Unselected
/// items may retain a stale key from an earlier selection; selecting an item
/// always assigns a fresh key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable numeric identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Whether the item is part of the selected subset.
    pub selected: bool,
    /// Position within the selected sequence, if any was ever assigned.
    pub order_key: Option<OrderKey>,
}

impl Item {
    /// Create an unselected item with the default display name.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: format!("Item {id}"),
            selected: false,
            order_key: None,
        }
    }
}

/// Sort order for item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOrder {
    /// Ascending item id, for browsing the full collection.
    ItemId,
    /// Ascending order key, the manually ordered selected sequence.
    OrderKey,
}

/// Filter and pagination for [`ItemStore::list`](crate::ItemStore::list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Match items with this selection flag.
    pub selected: bool,
    /// Only items with `id >= min_item_id`, when set.
    pub min_item_id: Option<u64>,
    /// Sort order of the page.
    pub order: ListOrder,
    /// Number of leading matches to skip.
    pub offset: usize,
    /// Maximum number of items returned.
    pub limit: usize,
}

impl ItemQuery {
    /// Query a page of the full collection, ordered by item id.
    pub fn browse(selected: bool, min_item_id: Option<u64>, offset: usize, limit: usize) -> Self {
        Self {
            selected,
            min_item_id,
            order: ListOrder::ItemId,
            offset,
            limit,
        }
    }

    /// Query a page of the selected sequence, ordered by order key.
    pub fn selected_sequence(min_item_id: Option<u64>, offset: usize, limit: usize) -> Self {
        Self {
            selected: true,
            min_item_id,
            order: ListOrder::OrderKey,
            offset,
            limit,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPage {
    /// The items on this page.
    pub items: Vec<Item>,
    /// Total number of matches across all pages.
    pub total: usize,
    /// Whether further pages exist past this one.
    pub has_more: bool,
}

/// A single-item update: fields set here are persisted, the rest are left
/// unchanged. `order_key` distinguishes "leave unchanged" (outer `None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New selection flag, if changing.
    pub selected: Option<bool>,
    /// New order key, if changing.
    pub order_key: Option<Option<OrderKey>>,
}

impl ItemPatch {
    /// Mark the item selected at the given position.
    pub fn select(order_key: OrderKey) -> Self {
        Self {
            selected: Some(true),
            order_key: Some(Some(order_key)),
        }
    }

    /// Clear the selection flag. The order key is left in place; a later
    /// reselect assigns a fresh one.
    pub fn deselect() -> Self {
        Self {
            selected: Some(false),
            order_key: None,
        }
    }

    /// Move the item to the given position without touching the flag.
    pub fn reorder(order_key: OrderKey) -> Self {
        Self {
            selected: None,
            order_key: Some(Some(order_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_has_default_name_and_no_key() {
        let item = Item::new(42);
        assert_eq!(item.name, "Item 42");
        assert!(!item.selected);
        assert!(item.order_key.is_none());
    }

    #[test]
    fn patch_constructors_set_expected_fields() {
        let key = OrderKey::new("a0").expect("valid");
        let select = ItemPatch::select(key.clone());
        assert_eq!(select.selected, Some(true));
        assert_eq!(select.order_key, Some(Some(key.clone())));

        let deselect = ItemPatch::deselect();
        assert_eq!(deselect.selected, Some(false));
        assert!(deselect.order_key.is_none());

        let reorder = ItemPatch::reorder(key.clone());
        assert!(reorder.selected.is_none());
        assert_eq!(reorder.order_key, Some(Some(key)));
    }

    #[test]
    fn item_serde_round_trip() {
        let mut item = Item::new(7);
        item.selected = true;
        item.order_key = Some(OrderKey::new("a1V").expect("valid"));
        let json = serde_json::to_string(&item).expect("serialize");
        let back: Item = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, item);
    }
}

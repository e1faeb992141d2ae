//! Domain models mirroring the REST API's wire format.
//!
//! The backend speaks camelCase JSON with most fields optional; these types
//! keep that shape and add small display helpers on top.

mod item_type;
mod owned_item;
mod stats;
mod wish_item;
mod work;

pub use item_type::{ItemType, ItemTypePayload, ItemTypesPage};
pub use owned_item::{InventoryQuery, InventorySort, OwnedItem, OwnedItemPayload, OwnedItemsPage};
pub use stats::{MonthlyExpenseResponse, OwnedItemSummary, WishItemSummary};
pub use wish_item::{WishItem, WishItemPayload, WishItemsPage, WishlistQuery, WishlistSort};
pub use work::{group_by_kana_row, Work, WorkPayload, WorksPage, OTHER_GROUP};

use serde::{Deserialize, Serialize};

/// Response body for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Keyword/paging parameters shared by the works and item-type lists.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

//! Wishlist items.

use serde::{Deserialize, Serialize};

use crate::utils::format::{format_date, format_yen};

/// An item the user intends to buy. Maps to the backend's `wish_items` rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishItem {
    pub id: i64,
    pub user_id: Option<i64>,
    pub work_id: Option<i64>,
    pub work_name: Option<String>,
    pub item_type_id: Option<i64>,
    pub item_type_name: Option<String>,
    pub goods_name: Option<String>,
    pub quantity: Option<i64>,
    pub expected_unit_price: Option<i64>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub memo: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl WishItem {
    /// Quantity times expected unit price, when both are known and the
    /// product fits.
    pub fn expected_total(&self) -> Option<i64> {
        self.quantity?.checked_mul(self.expected_unit_price?)
    }

    pub fn expected_total_display(&self) -> String {
        self.expected_total().map(format_yen).unwrap_or_default()
    }

    pub fn release_date_display(&self) -> String {
        self.release_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WishlistSort {
    ReleaseDateDesc,
    ReleaseDateAsc,
    CreatedAtDesc,
    CreatedAtAsc,
}

/// Filter/paging parameters for the wish-items list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<WishlistSort>,
}

/// Create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goods_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_unit_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// One page of wish items. This endpoint reports richer paging metadata
/// than the owned-items one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishItemsPage {
    #[serde(default)]
    pub items: Vec<WishItem>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u32>,
}

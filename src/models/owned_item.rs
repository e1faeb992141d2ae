//! Owned (inventory) items.

use serde::{Deserialize, Serialize};

use crate::utils::format::{format_date, format_yen};

/// An item the user owns. Maps to the backend's `owned_items` rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItem {
    pub id: i64,
    pub work_id: Option<i64>,
    pub work_name: Option<String>,
    pub item_type_id: Option<i64>,
    pub item_type_name: Option<String>,
    pub name: Option<String>,
    pub goods_name: Option<String>,
    pub image_url: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<i64>,
    pub purchase_date: Option<String>,
    pub memo: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl OwnedItem {
    /// Goods name with the legacy `name` field as fallback.
    pub fn display_name(&self) -> &str {
        self.goods_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    /// Quantity times unit price, when both are known and the product fits.
    pub fn total_price(&self) -> Option<i64> {
        self.quantity?.checked_mul(self.unit_price?)
    }

    pub fn total_price_display(&self) -> String {
        self.total_price().map(format_yen).unwrap_or_default()
    }

    pub fn purchase_date_display(&self) -> String {
        self.purchase_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default()
    }
}

/// Sort orders the list endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventorySort {
    PurchaseDateDesc,
    PurchaseDateAsc,
    CreatedAtDesc,
    CreatedAtAsc,
}

/// Filter/paging parameters for the owned-items list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
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
    pub sort: Option<InventorySort>,
}

/// Create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goods_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// One page of owned items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItemsPage {
    #[serde(default)]
    pub items: Vec<OwnedItem>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total: Option<u64>,
}

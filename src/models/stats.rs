//! Spending statistics.

use serde::{Deserialize, Serialize};

use crate::utils::format::format_yen;

/// Owned-item line in a monthly summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItemSummary {
    pub id: i64,
    pub goods_name: Option<String>,
    pub work_name: Option<String>,
    pub item_type_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<i64>,
    pub total: Option<i64>,
    pub purchase_date: Option<String>,
    pub image_url: Option<String>,
}

/// Wishlist line in a monthly summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishItemSummary {
    pub id: i64,
    pub goods_name: Option<String>,
    pub work_name: Option<String>,
    pub item_type_name: Option<String>,
    pub quantity: Option<i64>,
    pub expected_price: Option<i64>,
    pub total: Option<i64>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
}

/// Per-month spending and planned spending.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseResponse {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default)]
    pub owned_items: Vec<OwnedItemSummary>,
    #[serde(default)]
    pub wish_items: Vec<WishItemSummary>,
}

impl MonthlyExpenseResponse {
    /// Total spent on owned items this month.
    pub fn spent_total(&self) -> i64 {
        self.owned_items.iter().filter_map(|i| i.total).sum()
    }

    /// Total expected spend on wishlist items this month.
    pub fn planned_total(&self) -> i64 {
        self.wish_items.iter().filter_map(|i| i.total).sum()
    }

    pub fn spent_total_display(&self) -> String {
        format_yen(self.spent_total())
    }

    pub fn planned_total_display(&self) -> String {
        format_yen(self.planned_total())
    }
}

//! Item types (goods categories: figures, acrylic stands, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemType {
    pub id: i64,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemTypePayload {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypesPage {
    #[serde(default)]
    pub items: Vec<ItemType>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total: Option<u64>,
}

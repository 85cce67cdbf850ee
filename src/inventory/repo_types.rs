use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// One row of the inventory view: an active product joined with one of its
/// variants. Products without variants appear once with the variant columns
/// empty.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryRow {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub base_price: Decimal,
    pub variant_id: Option<i64>,
    pub color: Option<String>,
    pub model_compatibility: Option<String>,
    pub current_stock: Option<i32>,
    pub low_stock_threshold: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
    pub variant_id: i64,
    pub product_id: i64,
    pub color: Option<String>,
    pub model_compatibility: Option<String>,
    pub current_stock: i32,
    pub low_stock_threshold: i32,
}

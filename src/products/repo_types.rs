use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Product record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: Decimal,
    pub cost_price: Decimal,
    pub supplier_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

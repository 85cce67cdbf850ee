use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Sale header as stored, with the cashier's email joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub transaction_id: i64,
    pub receipt_number: String,
    pub user_id: i64,
    pub cashier_email: Option<String>,
    pub total_amount: Decimal,
    pub cash_received: Decimal,
    pub change_given: Decimal,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionItem {
    pub item_id: i64,
    pub variant_id: i64,
    pub product_name: String,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Header fields written when a sale is recorded.
#[derive(Debug)]
pub struct NewTransaction<'a> {
    pub receipt_number: &'a str,
    pub user_id: i64,
    pub total_amount: Decimal,
    pub cash_received: Decimal,
    pub change_given: Decimal,
    pub customer_phone: Option<&'a str>,
    pub customer_email: Option<&'a str>,
}

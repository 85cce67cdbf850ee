use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    validation::is_valid_email,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemRequest {
    pub variant_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<SaleItemRequest>,
    pub cash_received: Decimal,
    pub total_amount: Decimal,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
}

/// Amounts are stored as NUMERIC(12,2): anything at or above 10^10 cannot be
/// persisted.
fn max_amount() -> Decimal {
    Decimal::from(10_000_000_000_i64)
}

fn out_of_range() -> AppError {
    AppError::Validation("Amount out of range".into())
}

impl SaleRequest {
    /// Check the sale before anything touches the store and return the change
    /// owed to the customer.
    pub fn validate(&self) -> AppResult<Decimal> {
        if self.items.is_empty() {
            return Err(AppError::Validation(
                "Sale must contain at least one item".into(),
            ));
        }
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Quantity for variant {} must be positive",
                    item.variant_id
                )));
            }
            if item.unit_price.is_sign_negative() {
                return Err(AppError::Validation(format!(
                    "Unit price for variant {} must not be negative",
                    item.variant_id
                )));
            }
            if item.unit_price >= max_amount() {
                return Err(out_of_range());
            }
        }
        if self.total_amount >= max_amount() || self.cash_received >= max_amount() {
            return Err(out_of_range());
        }
        if self.total_amount.is_sign_negative() {
            return Err(AppError::Validation("Total amount must not be negative".into()));
        }
        if self.cash_received < self.total_amount {
            return Err(AppError::Validation("Insufficient cash received".into()));
        }
        if let Some(email) = self.customer_email() {
            if !is_valid_email(email) {
                return Err(AppError::Validation("Invalid email format".into()));
            }
        }

        let line_sum = self
            .items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| {
                i.unit_price
                    .checked_mul(Decimal::from(i.quantity))
                    .and_then(|line| acc.checked_add(line))
            })
            .ok_or_else(out_of_range)?;
        if line_sum != self.total_amount {
            warn!(%line_sum, total_amount = %self.total_amount, "sale total differs from line items");
        }

        Ok(self.cash_received - self.total_amount)
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleResponse {
    pub transaction_id: i64,
    pub receipt_number: String,
    pub change_given: Decimal,
}

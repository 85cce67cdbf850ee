use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct StockUpdateRequest {
    pub current_stock: Option<i32>,
    pub low_stock_threshold: Option<i32>,
}

impl StockUpdateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.current_stock.is_none() && self.low_stock_threshold.is_none() {
            return Err(AppError::Validation("Missing required fields".into()));
        }
        if self.low_stock_threshold.is_some_and(|t| t < 0) {
            return Err(AppError::Validation(
                "Low stock threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewVariantRequest {
    pub product_id: i64,
    pub color: Option<String>,
    pub model_compatibility: Option<String>,
    #[serde(default)]
    pub current_stock: i32,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i32,
}

fn default_threshold() -> i32 {
    5
}

impl NewVariantRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.current_stock < 0 || self.low_stock_threshold < 0 {
            return Err(AppError::Validation(
                "Stock and threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedVariantResponse {
    pub variant_id: i64,
}

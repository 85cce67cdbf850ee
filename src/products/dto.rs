use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ProductSearch {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: Decimal,
    pub cost_price: Decimal,
    pub supplier_id: Option<i64>,
    pub image_url: Option<String>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.sku.trim().is_empty() || self.name.trim().is_empty() || self.category.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".into()));
        }
        if self.base_price.is_sign_negative() || self.cost_price.is_sign_negative() {
            return Err(AppError::Validation("Prices must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub supplier_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.name) || blank(&self.category) {
            return Err(AppError::Validation("Name and category cannot be blank".into()));
        }
        let negative = |v: Option<Decimal>| v.is_some_and(|d| d.is_sign_negative());
        if negative(self.base_price) || negative(self.cost_price) {
            return Err(AppError::Validation("Prices must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedProductResponse {
    pub product_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            sku: "CASE-IP15-BLK".into(),
            name: "iPhone 15 case".into(),
            description: None,
            category: "cases".into(),
            base_price: dec("12.50"),
            cost_price: dec("4.00"),
            supplier_id: None,
            image_url: None,
        }
    }

    #[test]
    fn create_requires_fields_and_non_negative_prices() {
        assert!(request().validate().is_ok());

        let mut blank_sku = request();
        blank_sku.sku = "  ".into();
        assert!(blank_sku.validate().is_err());

        let mut negative = request();
        negative.cost_price = dec("-1");
        assert!(negative.validate().is_err());
    }

    #[test]
    fn create_body_accepts_json_numbers() {
        let body: CreateProductRequest = serde_json::from_str(
            r#"{"sku":"A1","name":"Cable","category":"cables","base_price":9.99,"cost_price":3}"#,
        )
        .unwrap();
        assert_eq!(body.base_price, dec("9.99"));
        assert_eq!(body.cost_price, dec("3"));
    }

    #[test]
    fn update_rejects_blank_name() {
        let req = UpdateProductRequest {
            name: Some("".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateProductRequest::default().validate().is_ok());
    }
}

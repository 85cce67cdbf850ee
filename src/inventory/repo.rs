use sqlx::PgExecutor;

use super::dto::{NewVariantRequest, StockUpdateRequest};
use super::repo_types::{InventoryRow, ProductVariant};

impl InventoryRow {
    pub async fn list<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<Vec<InventoryRow>> {
        sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT p.product_id, p.sku, p.name, p.category, p.base_price,
                   v.variant_id, v.color, v.model_compatibility,
                   v.current_stock, v.low_stock_threshold
            FROM products p
            LEFT JOIN product_variants v ON v.product_id = p.product_id
            WHERE p.is_active = TRUE
            ORDER BY p.name, v.variant_id
            "#,
        )
        .fetch_all(db)
        .await
    }
}

impl ProductVariant {
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        new: &NewVariantRequest,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO product_variants
                (product_id, color, model_compatibility, current_stock, low_stock_threshold)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING variant_id
            "#,
        )
        .bind(new.product_id)
        .bind(new.color.as_deref())
        .bind(new.model_compatibility.as_deref())
        .bind(new.current_stock)
        .bind(new.low_stock_threshold)
        .fetch_one(db)
        .await
    }

    /// Overwrite stock and/or threshold; `None` when the variant is unknown.
    pub async fn set_stock<'e>(
        db: impl PgExecutor<'e>,
        variant_id: i64,
        changes: &StockUpdateRequest,
    ) -> sqlx::Result<Option<ProductVariant>> {
        sqlx::query_as::<_, ProductVariant>(
            r#"
            UPDATE product_variants SET
                current_stock       = COALESCE($2, current_stock),
                low_stock_threshold = COALESCE($3, low_stock_threshold)
            WHERE variant_id = $1
            RETURNING variant_id, product_id, color, model_compatibility,
                      current_stock, low_stock_threshold
            "#,
        )
        .bind(variant_id)
        .bind(changes.current_stock)
        .bind(changes.low_stock_threshold)
        .fetch_optional(db)
        .await
    }

    /// Variants at or below their low-stock threshold, with product names.
    pub async fn low_stock<'e>(db: impl PgExecutor<'e>) -> sqlx::Result<Vec<InventoryRow>> {
        sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT p.product_id, p.sku, p.name, p.category, p.base_price,
                   v.variant_id, v.color, v.model_compatibility,
                   v.current_stock, v.low_stock_threshold
            FROM product_variants v
            JOIN products p ON p.product_id = v.product_id
            WHERE p.is_active = TRUE
              AND v.current_stock <= v.low_stock_threshold
            ORDER BY v.current_stock, p.name
            "#,
        )
        .fetch_all(db)
        .await
    }
}

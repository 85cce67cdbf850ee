use sqlx::PgExecutor;

use super::dto::{CreateProductRequest, UpdateProductRequest};
use super::repo_types::Product;

const PRODUCT_COLUMNS: &str = "product_id, sku, name, description, category, base_price, \
     cost_price, supplier_id, image_url, is_active, created_at, updated_at";

impl Product {
    /// Active products, optionally filtered by a case-insensitive substring of
    /// name, SKU or category.
    pub async fn list_active<'e>(
        db: impl PgExecutor<'e>,
        search: &str,
    ) -> sqlx::Result<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = TRUE
              AND ($1 = '' OR name ILIKE '%' || $1 || '%'
                           OR sku ILIKE '%' || $1 || '%'
                           OR category ILIKE '%' || $1 || '%')
            ORDER BY name
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(search)
            .fetch_all(db)
            .await
    }

    pub async fn find_active<'e>(
        db: impl PgExecutor<'e>,
        product_id: i64,
    ) -> sqlx::Result<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND is_active = TRUE"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(db)
            .await
    }

    /// Insert a product and return its id.
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        new: &CreateProductRequest,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products
                (sku, name, description, category, base_price, cost_price, supplier_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING product_id
            "#,
        )
        .bind(new.sku.trim())
        .bind(new.name.trim())
        .bind(new.description.as_deref())
        .bind(new.category.trim())
        .bind(new.base_price)
        .bind(new.cost_price)
        .bind(new.supplier_id)
        .bind(new.image_url.as_deref())
        .fetch_one(db)
        .await
    }

    /// Apply the provided fields; `None` when no such product exists.
    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        product_id: i64,
        changes: &UpdateProductRequest,
    ) -> sqlx::Result<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                category    = COALESCE($4, category),
                base_price  = COALESCE($5, base_price),
                cost_price  = COALESCE($6, cost_price),
                supplier_id = COALESCE($7, supplier_id),
                image_url   = COALESCE($8, image_url),
                is_active   = COALESCE($9, is_active),
                updated_at  = now()
            WHERE product_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.description.as_deref())
            .bind(changes.category.as_deref().map(str::trim))
            .bind(changes.base_price)
            .bind(changes.cost_price)
            .bind(changes.supplier_id)
            .bind(changes.image_url.as_deref())
            .bind(changes.is_active)
            .fetch_optional(db)
            .await
    }

    /// Soft delete. Returns false when the product does not exist or is
    /// already inactive.
    pub async fn deactivate<'e>(db: impl PgExecutor<'e>, product_id: i64) -> sqlx::Result<bool> {
        let res = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() \
             WHERE product_id = $1 AND is_active = TRUE",
        )
        .bind(product_id)
        .execute(db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}

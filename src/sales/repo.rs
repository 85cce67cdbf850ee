use sqlx::PgExecutor;

use crate::inventory::repo_types::ProductVariant;

impl ProductVariant {
    /// Take `quantity` units out of stock. Returns the number of rows touched:
    /// 0 when the variant is unknown or, unless `allow_negative`, when stock
    /// would drop below zero.
    pub async fn decrement_stock<'e>(
        db: impl PgExecutor<'e>,
        variant_id: i64,
        quantity: i32,
        allow_negative: bool,
    ) -> sqlx::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE product_variants
            SET current_stock = current_stock - $1
            WHERE variant_id = $2
              AND ($3 OR current_stock >= $1)
            "#,
        )
        .bind(quantity)
        .bind(variant_id)
        .bind(allow_negative)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }
}

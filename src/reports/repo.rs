use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};
use time::Date;

/// One day of sales. `date` is the UTC calendar day as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailySales {
    pub date: String,
    pub transactions: i64,
    pub total_sales: Decimal,
    pub items_sold: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductPerformance {
    pub product_id: i64,
    pub product_name: String,
    pub total_sold: i64,
    pub total_revenue: Decimal,
    pub avg_price: Decimal,
}

/// Item quantities are summed per sale before joining so a sale with several
/// lines is counted once in `transactions` and `total_sales`.
pub async fn daily_sales<'e>(
    db: impl PgExecutor<'e>,
    start: Option<Date>,
    end: Option<Date>,
) -> sqlx::Result<Vec<DailySales>> {
    sqlx::query_as::<_, DailySales>(
        r#"
        SELECT to_char((t.created_at AT TIME ZONE 'UTC')::date, 'YYYY-MM-DD') AS date,
               COUNT(*) AS transactions,
               COALESCE(SUM(t.total_amount), 0) AS total_sales,
               COALESCE(SUM(li.items), 0)::BIGINT AS items_sold
        FROM transactions t
        LEFT JOIN (
            SELECT transaction_id, SUM(quantity) AS items
            FROM transaction_items
            GROUP BY transaction_id
        ) li ON li.transaction_id = t.transaction_id
        WHERE ($1::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date >= $1)
          AND ($2::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date <= $2)
        GROUP BY 1
        ORDER BY 1 DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn product_performance<'e>(
    db: impl PgExecutor<'e>,
    start: Option<Date>,
    end: Option<Date>,
) -> sqlx::Result<Vec<ProductPerformance>> {
    sqlx::query_as::<_, ProductPerformance>(
        r#"
        SELECT p.product_id,
               p.name AS product_name,
               SUM(i.quantity)::BIGINT AS total_sold,
               SUM(i.quantity * i.unit_price) AS total_revenue,
               ROUND(AVG(i.unit_price), 2) AS avg_price
        FROM transaction_items i
        JOIN transactions t ON t.transaction_id = i.transaction_id
        JOIN product_variants v ON v.variant_id = i.variant_id
        JOIN products p ON p.product_id = v.product_id
        WHERE ($1::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date >= $1)
          AND ($2::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date <= $2)
        GROUP BY p.product_id, p.name
        ORDER BY total_revenue DESC, p.product_id
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

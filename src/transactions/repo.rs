use sqlx::PgExecutor;
use time::Date;

use super::repo_types::{NewTransaction, Transaction, TransactionItem};

impl Transaction {
    /// Insert the sale header. Returns `None` when the receipt number is
    /// already taken so the caller can retry with a fresh one without
    /// aborting the surrounding transaction.
    pub async fn insert_header<'e>(
        db: impl PgExecutor<'e>,
        new: &NewTransaction<'_>,
    ) -> sqlx::Result<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions
                (receipt_number, user_id, total_amount, cash_received, change_given,
                 customer_phone, customer_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (receipt_number) DO NOTHING
            RETURNING transaction_id
            "#,
        )
        .bind(new.receipt_number)
        .bind(new.user_id)
        .bind(new.total_amount)
        .bind(new.cash_received)
        .bind(new.change_given)
        .bind(new.customer_phone)
        .bind(new.customer_email)
        .fetch_optional(db)
        .await
    }

    /// Sales in an optional inclusive UTC date range, newest first.
    pub async fn list<'e>(
        db: impl PgExecutor<'e>,
        start: Option<Date>,
        end: Option<Date>,
    ) -> sqlx::Result<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT t.transaction_id, t.receipt_number, t.user_id, u.email AS cashier_email,
                   t.total_amount, t.cash_received, t.change_given,
                   t.customer_phone, t.customer_email, t.created_at
            FROM transactions t
            LEFT JOIN users u ON u.user_id = t.user_id
            WHERE ($1::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date >= $1)
              AND ($2::date IS NULL OR (t.created_at AT TIME ZONE 'UTC')::date <= $2)
            ORDER BY t.created_at DESC, t.transaction_id DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
    }

    pub async fn find<'e>(
        db: impl PgExecutor<'e>,
        transaction_id: i64,
    ) -> sqlx::Result<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT t.transaction_id, t.receipt_number, t.user_id, u.email AS cashier_email,
                   t.total_amount, t.cash_received, t.change_given,
                   t.customer_phone, t.customer_email, t.created_at
            FROM transactions t
            LEFT JOIN users u ON u.user_id = t.user_id
            WHERE t.transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(db)
        .await
    }
}

impl TransactionItem {
    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        transaction_id: i64,
        variant_id: i64,
        quantity: i32,
        unit_price: rust_decimal::Decimal,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transaction_items (transaction_id, variant_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING item_id
            "#,
        )
        .bind(transaction_id)
        .bind(variant_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(db)
        .await
    }

    pub async fn for_transaction<'e>(
        db: impl PgExecutor<'e>,
        transaction_id: i64,
    ) -> sqlx::Result<Vec<TransactionItem>> {
        sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT i.item_id, i.variant_id, p.name AS product_name, v.color,
                   i.quantity, i.unit_price, (i.quantity * i.unit_price) AS line_total
            FROM transaction_items i
            JOIN product_variants v ON v.variant_id = i.variant_id
            JOIN products p ON p.product_id = v.product_id
            WHERE i.transaction_id = $1
            ORDER BY i.item_id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(db)
        .await
    }
}

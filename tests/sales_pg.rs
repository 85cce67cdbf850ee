mod common;

use common::{dec, product_with_variants, state, state_with_negative_stock, stock, user};
use pos_backend::{
    auth::claims::Role,
    error::AppError,
    sales::{
        dto::{SaleItemRequest, SaleRequest},
        services::record_sale,
    },
    transactions::repo_types::{Transaction, TransactionItem},
};

fn item(variant_id: i64, quantity: i32, unit_price: &str) -> SaleItemRequest {
    SaleItemRequest {
        variant_id,
        quantity,
        unit_price: dec(unit_price),
    }
}

fn sale(items: Vec<SaleItemRequest>, cash: &str, total: &str) -> SaleRequest {
    SaleRequest {
        items,
        cash_received: dec(cash),
        total_amount: dec(total),
        customer_phone: Some("0700000000".into()),
        customer_email: None,
    }
}

async fn sales_by(state: &pos_backend::state::AppState, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&state.db)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn sale_records_items_and_decrements_stock() {
    let state = state().await;
    let cashier = user(&state, "cashier-pass", Role::Sales, true).await;
    let variants = product_with_variants(&state, &[10, 10]).await;
    let (a, b) = (variants[0], variants[1]);

    let receipt = record_sale(
        &state,
        cashier.user_id,
        &sale(vec![item(a, 2, "10.00"), item(b, 1, "5.00")], "30", "25"),
    )
    .await
    .unwrap();

    assert_eq!(receipt.change_given, dec("5"));
    assert!(receipt.receipt_number.starts_with("REC-"));
    assert_eq!(stock(&state, a).await, 8);
    assert_eq!(stock(&state, b).await, 9);

    let header = Transaction::find(&state.db, receipt.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(header.total_amount, dec("25"));
    assert_eq!(header.user_id, cashier.user_id);

    let items = TransactionItem::for_transaction(&state.db, receipt.transaction_id)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].line_total, dec("20"));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unknown_variant_rolls_back_the_whole_sale() {
    let state = state().await;
    let cashier = user(&state, "cashier-pass", Role::Sales, true).await;
    let variants = product_with_variants(&state, &[10]).await;

    let err = record_sale(
        &state,
        cashier.user_id,
        &sale(vec![item(variants[0], 3, "10"), item(i64::MAX, 1, "5")], "40", "35"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Rejected(_)), "{err:?}");
    assert_eq!(stock(&state, variants[0]).await, 10);
    assert_eq!(sales_by(&state, cashier.user_id).await, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn insufficient_stock_is_rejected() {
    let state = state().await;
    let cashier = user(&state, "cashier-pass", Role::Sales, true).await;
    let variants = product_with_variants(&state, &[1]).await;

    let err = record_sale(
        &state,
        cashier.user_id,
        &sale(vec![item(variants[0], 2, "10")], "20", "20"),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Insufficient stock"));
    assert_eq!(stock(&state, variants[0]).await, 1);
    assert_eq!(sales_by(&state, cashier.user_id).await, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn negative_stock_sales_go_below_zero_when_allowed() {
    let state = state_with_negative_stock().await;
    let cashier = user(&state, "cashier-pass", Role::Sales, true).await;
    let variants = product_with_variants(&state, &[1]).await;

    record_sale(
        &state,
        cashier.user_id,
        &sale(vec![item(variants[0], 3, "10")], "30", "30"),
    )
    .await
    .unwrap();

    assert_eq!(stock(&state, variants[0]).await, -2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn stock_underflow_is_a_client_error() {
    let state = state_with_negative_stock().await;
    let cashier = user(&state, "cashier-pass", Role::Sales, true).await;
    let variants = product_with_variants(&state, &[i32::MIN + 1]).await;

    let err = record_sale(
        &state,
        cashier.user_id,
        &sale(vec![item(variants[0], 2, "10")], "20", "20"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Rejected(_)), "{err:?}");
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(stock(&state, variants[0]).await, i32::MIN + 1);
    assert_eq!(sales_by(&state, cashier.user_id).await, 0);
}

use rand::Rng;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    inventory::repo_types::ProductVariant,
    sales::dto::{SaleRequest, SaleResponse},
    state::AppState,
    transactions::repo_types::{NewTransaction, Transaction, TransactionItem},
};

const RECEIPT_ATTEMPTS: usize = 5;

/// `REC-YYYYMMDDHHMMSS-XXXX`: UTC timestamp plus four random hex digits so two
/// sales in the same second still get distinct numbers.
pub fn receipt_number(now: OffsetDateTime, rng: &mut impl Rng) -> String {
    let suffix: u16 = rng.gen();
    format!(
        "REC-{:04}{:02}{:02}{:02}{:02}{:02}-{:04X}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        suffix
    )
}

/// Record a sale as one unit: header, every line item and every stock
/// decrement commit together or not at all.
#[instrument(skip(state, sale), fields(items = sale.items.len()))]
pub async fn record_sale(state: &AppState, cashier_id: i64, sale: &SaleRequest) -> AppResult<SaleResponse> {
    let change_given = sale.validate()?;
    let allow_negative = state.config.allow_negative_stock;

    let mut tx = state.db.begin().await?;

    let mut header = None;
    for _ in 0..RECEIPT_ATTEMPTS {
        let receipt = receipt_number(OffsetDateTime::now_utc(), &mut rand::thread_rng());
        let new = NewTransaction {
            receipt_number: &receipt,
            user_id: cashier_id,
            total_amount: sale.total_amount,
            cash_received: sale.cash_received,
            change_given,
            customer_phone: sale.customer_phone(),
            customer_email: sale.customer_email(),
        };
        let inserted = Transaction::insert_header(&mut *tx, &new)
            .await
            .map_err(|e| AppError::from_rejected_write(e, "Sale could not be recorded"))?;
        match inserted {
            Some(id) => {
                header = Some((id, receipt));
                break;
            }
            None => warn!(receipt = %receipt, "receipt number collision, retrying"),
        }
    }
    let (transaction_id, receipt_number) = header
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no free receipt number")))?;

    for item in &sale.items {
        TransactionItem::insert(
            &mut *tx,
            transaction_id,
            item.variant_id,
            item.quantity,
            item.unit_price,
        )
        .await
        .map_err(|e| {
            AppError::from_rejected_write(e, &format!("Unknown product variant {}", item.variant_id))
        })?;

        let touched =
            ProductVariant::decrement_stock(&mut *tx, item.variant_id, item.quantity, allow_negative)
                .await
                .map_err(|e| {
                    AppError::from_rejected_write(
                        e,
                        &format!("Stock for product variant {} cannot be reduced", item.variant_id),
                    )
                })?;
        if touched != 1 {
            warn!(variant_id = item.variant_id, quantity = item.quantity, "stock decrement refused");
            return Err(AppError::Rejected(format!(
                "Insufficient stock for product variant {}",
                item.variant_id
            )));
        }
    }

    tx.commit().await?;

    info!(
        transaction_id,
        receipt = %receipt_number,
        cashier_id,
        total = %sale.total_amount,
        "sale recorded"
    );

    Ok(SaleResponse {
        transaction_id,
        receipt_number,
        change_given,
    })
}

use sqlx::SqliteConnection;
use wsp_common::Cents;

use crate::{
    db_types::{LedgerEntry, NewLedgerEntry, PayoutStatus},
    traits::LedgerError,
};

/// Inserts the commission ledger row for a transaction, unless a row for that transaction id already
/// exists. Returns `true` when the row was newly inserted.
pub async fn insert_if_absent(
    entry: NewLedgerEntry,
    host_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<bool, LedgerError> {
    let result = sqlx::query(
        r#"
            INSERT OR IGNORE INTO commission_ledger
            (tx_id, provider_id, host_id, promo_code, qr_code, gross, platform_amount, provider_amount,
             host_amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10);
        "#,
    )
    .bind(entry.tx_id)
    .bind(entry.provider_id)
    .bind(host_id)
    .bind(entry.promo_code)
    .bind(entry.qr_code)
    .bind(entry.gross)
    .bind(entry.platform_amount)
    .bind(entry.provider_amount)
    .bind(entry.host_amount)
    .bind(entry.currency)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_entry(tx_id: &str, conn: &mut SqliteConnection) -> Result<Option<LedgerEntry>, LedgerError> {
    let entry =
        sqlx::query_as(r#"SELECT * FROM commission_ledger WHERE tx_id = ?"#).bind(tx_id).fetch_optional(conn).await?;
    Ok(entry)
}

pub async fn fetch_entries_for_host(
    host_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    let entries = sqlx::query_as(r#"SELECT * FROM commission_ledger WHERE host_id = ? ORDER BY created_at DESC"#)
        .bind(host_id)
        .fetch_all(conn)
        .await?;
    Ok(entries)
}

pub async fn host_commission_total(host_id: &str, conn: &mut SqliteConnection) -> Result<Cents, LedgerError> {
    let total: i64 =
        sqlx::query_scalar(r#"SELECT COALESCE(SUM(host_amount), 0) FROM commission_ledger WHERE host_id = ?"#)
            .bind(host_id)
            .fetch_one(conn)
            .await?;
    Ok(Cents::from(total))
}

/// Flips the payout status from `Pending` to `Paid`. Refuses to mark a row paid twice.
pub async fn mark_paid(tx_id: &str, conn: &mut SqliteConnection) -> Result<LedgerEntry, LedgerError> {
    let entry = fetch_entry(tx_id, &mut *conn).await?.ok_or_else(|| LedgerError::EntryNotFound(tx_id.to_string()))?;
    if entry.payout_status == PayoutStatus::Paid {
        return Err(LedgerError::AlreadyPaid(tx_id.to_string()));
    }
    let entry = sqlx::query_as(
        r#"
            UPDATE commission_ledger SET payout_status = 'Paid', updated_at = CURRENT_TIMESTAMP
            WHERE tx_id = $1 RETURNING *;
        "#,
    )
    .bind(tx_id)
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPromoCode, NewQrCode, PromoCode, QrCode},
    traits::LedgerError,
};

pub async fn insert_promo_code(code: NewPromoCode, conn: &mut SqliteConnection) -> Result<PromoCode, LedgerError> {
    let name = code.code.clone();
    let promo = sqlx::query_as(r#"INSERT INTO promo_codes (code, host_id) VALUES ($1, $2) RETURNING *;"#)
        .bind(code.code)
        .bind(code.host_id)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(err) if err.is_unique_violation() => LedgerError::CodeAlreadyExists(name),
            _ => LedgerError::from(e),
        })?;
    Ok(promo)
}

pub async fn insert_qr_code(code: NewQrCode, conn: &mut SqliteConnection) -> Result<QrCode, LedgerError> {
    let name = code.code.clone();
    let qr = sqlx::query_as(r#"INSERT INTO qr_codes (code, host_id) VALUES ($1, $2) RETURNING *;"#)
        .bind(code.code)
        .bind(code.host_id)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(err) if err.is_unique_violation() => LedgerError::CodeAlreadyExists(name),
            _ => LedgerError::from(e),
        })?;
    Ok(qr)
}

pub async fn fetch_promo_code(code: &str, conn: &mut SqliteConnection) -> Result<Option<PromoCode>, LedgerError> {
    let promo =
        sqlx::query_as(r#"SELECT * FROM promo_codes WHERE code = ?"#).bind(code).fetch_optional(conn).await?;
    Ok(promo)
}

pub async fn fetch_qr_code(code: &str, conn: &mut SqliteConnection) -> Result<Option<QrCode>, LedgerError> {
    let qr = sqlx::query_as(r#"SELECT * FROM qr_codes WHERE code = ?"#).bind(code).fetch_optional(conn).await?;
    Ok(qr)
}

/// Resolves the referring host for a transaction from its codes. The promo code takes precedence; the QR
/// code is only consulted when no promo code is present.
pub async fn host_id_for_codes(
    promo_code: Option<&str>,
    qr_code: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<String>, LedgerError> {
    if let Some(code) = promo_code {
        if let Some(promo) = fetch_promo_code(code, &mut *conn).await? {
            return Ok(Some(promo.host_id));
        }
    }
    if let Some(code) = qr_code {
        if let Some(qr) = fetch_qr_code(code, &mut *conn).await? {
            return Ok(Some(qr.host_id));
        }
    }
    Ok(None)
}

pub async fn increment_usage(code: &str, conn: &mut SqliteConnection) -> Result<(), LedgerError> {
    sqlx::query(
        r#"UPDATE promo_codes SET usage_count = usage_count + 1, updated_at = CURRENT_TIMESTAMP WHERE code = $1"#,
    )
    .bind(code)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn increment_conversions(code: &str, conn: &mut SqliteConnection) -> Result<(), LedgerError> {
    sqlx::query(
        r#"UPDATE qr_codes SET conversion_count = conversion_count + 1, updated_at = CURRENT_TIMESTAMP WHERE code = $1"#,
    )
    .bind(code)
    .execute(conn)
    .await?;
    Ok(())
}

use chrono::Utc;
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::TransactionRow;
use crate::domain::Transaction;
use crate::error::AppError;

// --- Transaction Queries ---

pub async fn insert_transaction(pool: &PgPool, tx: &Transaction) -> Result<Transaction> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions (
            id, user_id, username, product_name, product_type, amount,
            token, status, game_account, notes, created_at, expires_at, activated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(tx.id)
    .bind(&tx.user_id)
    .bind(&tx.username)
    .bind(&tx.product_name)
    .bind(&tx.product_type)
    .bind(tx.amount)
    .bind(&tx.token)
    .bind(tx.status.as_str())
    .bind(&tx.game_account)
    .bind(&tx.notes)
    .bind(tx.created_at)
    .bind(tx.expires_at)
    .bind(tx.activated_at)
    .fetch_one(pool)
    .await?;

    Ok(row.into_domain())
}

/// True when an insert failed on the unique index over `token`, i.e. the
/// generated token collided with an existing row. The issuer regenerates
/// and retries on this; any other error is surfaced.
pub fn is_token_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("transactions_token_key")
        }
        _ => false,
    }
}

/// Redeem `token`: validate against the state machine and, on success,
/// flip the record to `activated` in the same database transaction. The
/// row is locked with FOR UPDATE so two concurrent redeemers cannot both
/// observe `pending`; the loser blocks, then sees the committed
/// `activated` row and fails with "already used".
pub async fn redeem_transaction(
    pool: &PgPool,
    token: &str,
    game_account: Option<&str>,
) -> std::result::Result<Transaction, AppError> {
    let mut db_tx = pool.begin().await?;

    let row = sqlx::query_as::<_, TransactionRow>(
        "SELECT * FROM transactions WHERE token = $1 FOR UPDATE",
    )
    .bind(token)
    .fetch_optional(&mut *db_tx)
    .await?;

    let record = row.ok_or(AppError::TokenNotFound)?.into_domain();
    let now = Utc::now();
    record.check_redeemable(now)?;

    let updated = sqlx::query_as::<_, TransactionRow>(
        r#"
        UPDATE transactions
        SET status = 'activated', activated_at = $1, game_account = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(game_account)
    .bind(record.id)
    .fetch_one(&mut *db_tx)
    .await?;

    db_tx.commit().await?;
    Ok(updated.into_domain())
}

pub async fn list_transactions(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Transaction>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, TransactionRow>(
                r#"
                SELECT * FROM transactions
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TransactionRow>(
                "SELECT * FROM transactions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(TransactionRow::into_domain).collect())
}

/// Full table count, deliberately ignoring any status filter. The admin
/// UI has always shown the unfiltered total next to a filtered page.
pub async fn count_transactions(pool: &PgPool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(pool)
        .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    notes: Option<&str>,
) -> Result<u64> {
    let result = sqlx::query("UPDATE transactions SET status = $1, notes = $2 WHERE id = $3")
        .bind(status)
        .bind(notes)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn update_notes(pool: &PgPool, id: Uuid, notes: Option<&str>) -> Result<u64> {
    let result = sqlx::query("UPDATE transactions SET notes = $1 WHERE id = $2")
        .bind(notes)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

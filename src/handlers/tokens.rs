//! Issue and redeem endpoints: the public token lifecycle surface.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::db::queries;
use crate::domain::Transaction;
use crate::error::AppError;
use crate::validation;

/// Uniqueness-collision retries before giving up. At 62 bits of token
/// entropy a single retry is already vanishingly rare.
const MAX_TOKEN_ATTEMPTS: u32 = 5;

#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub product: Option<String>,
    pub product_type: Option<String>,
    pub amount: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssueResponse {
    pub success: bool,
    pub transaction_id: Uuid,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn issue(
    State(state): State<AppState>,
    Json(payload): Json<IssueRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_issue(
        payload.user_id.as_deref(),
        payload.product.as_deref(),
        payload.amount,
    )?;

    // Validated above; the defaults are unreachable.
    let user_id = payload.user_id.unwrap_or_default();
    let product = payload.product.unwrap_or_default();
    let amount = payload.amount.unwrap_or_default();
    let product_type = payload
        .product_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| validation::DEFAULT_PRODUCT_TYPE.to_string());

    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let tx = Transaction::new(
            user_id.clone(),
            payload.username.clone(),
            product.clone(),
            product_type.clone(),
            amount,
            state.config.token_ttl_hours,
        );

        match queries::insert_transaction(&state.db, &tx).await {
            Ok(inserted) => {
                tracing::info!(
                    transaction_id = %inserted.id,
                    user_id = %inserted.user_id,
                    product = %inserted.product_name,
                    "Issued redemption token"
                );
                return Ok(Json(IssueResponse {
                    success: true,
                    transaction_id: inserted.id,
                    token: inserted.token,
                    expires_at: inserted.expires_at,
                }));
            }
            Err(e) if queries::is_token_collision(&e) => {
                tracing::warn!(attempt, "Generated token collided, regenerating");
            }
            Err(e) => return Err(AppError::Database(e)),
        }
    }

    Err(AppError::Internal(
        "Could not generate a unique token".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct RedeemParams {
    pub token: Option<String>,
    pub game_account: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemResponse {
    pub valid: bool,
    pub product_name: String,
    pub product_type: String,
    pub amount: i32,
    pub message: String,
}

pub async fn redeem(
    State(state): State<AppState>,
    Query(params): Query<RedeemParams>,
) -> Result<impl IntoResponse, AppError> {
    let token = params
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Token is required".to_string()))?
        .to_string();

    let activated =
        queries::redeem_transaction(&state.db, &token, params.game_account.as_deref()).await?;

    tracing::info!(
        transaction_id = %activated.id,
        game_account = activated.game_account.as_deref().unwrap_or(""),
        "Token redeemed"
    );

    Ok(Json(RedeemResponse {
        valid: true,
        product_name: activated.product_name,
        product_type: activated.product_type,
        amount: activated.amount,
        message: "Token activated successfully".to_string(),
    }))
}

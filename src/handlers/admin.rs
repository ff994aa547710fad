//! Admin surface: paginated listing plus out-of-band mutation of
//! status/notes. Mutation deliberately bypasses the redemption state
//! machine; the route group is gated by the shared-secret middleware.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::db::queries;
use crate::domain::Transaction;
use crate::error::AppError;
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub transactions: Vec<Transaction>,
    /// Full table count. Intentionally NOT filtered by `status`; the admin
    /// UI shows the overall total next to whatever page is displayed.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = validation::clamp_limit(params.limit);
    let offset = validation::clamp_offset(params.offset);
    let status = params.status.as_deref().filter(|s| !s.trim().is_empty());

    let transactions = queries::list_transactions(&state.db, status, limit, offset).await?;
    let total = queries::count_transactions(&state.db).await?;

    Ok(Json(ListResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MutateRequest {
    pub transaction_id: Option<Uuid>,
    pub action: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

pub async fn mutate(
    State(state): State<AppState>,
    Json(payload): Json<MutateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (id, action) = match (payload.transaction_id, payload.action.as_deref()) {
        (Some(id), Some(action)) if !action.is_empty() => (id, action.to_string()),
        _ => {
            return Err(AppError::Validation(
                "Missing transaction_id or action".to_string(),
            ));
        }
    };

    match action.as_str() {
        "update_status" => {
            let status = payload
                .status
                .ok_or_else(|| AppError::Validation("Missing status".to_string()))?;
            let rows = queries::update_status(&state.db, id, &status, payload.notes.as_deref())
                .await?;
            tracing::info!(
                transaction_id = %id,
                status = %status,
                rows,
                "Admin status override"
            );
        }
        "add_note" => {
            let rows = queries::update_notes(&state.db, id, payload.notes.as_deref()).await?;
            tracing::info!(transaction_id = %id, rows, "Admin note update");
        }
        // Unknown actions are a no-op, matching the long-standing admin
        // client contract.
        other => {
            tracing::warn!(transaction_id = %id, action = %other, "Ignoring unknown admin action");
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Transaction updated"
    })))
}

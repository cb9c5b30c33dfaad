//! Transaction workflow routes.
//!
//! Agents submit pending fund movements with proof images; admins resolve
//! them. Listing is role-scoped: agents only ever see their own submissions.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::routes::{
    error_response, map_cashbox_error, map_transaction_error, require_admin, upload,
};
use crate::{AppState, middleware::AuthUser};
use caisse_db::entities::sea_orm_active_enums::{TransactionKind, TransactionStatus};
use caisse_db::repositories::{
    CashBoxRepository, SubmitTransactionInput, TransactionFilter, TransactionRepository,
    TransactionWithMedia, UpdateTransactionInput,
};
use caisse_shared::AppError;
use caisse_shared::types::PageRequest;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(submit_transaction))
        .route("/transactions/stats", get(transaction_stats))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/transactions/{transaction_id}", patch(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
        .route("/transactions/{transaction_id}/approve", post(approve_transaction))
        .route("/transactions/{transaction_id}/reject", post(reject_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by cashbox.
    pub cashbox_id: Option<Uuid>,
    /// Filter by status ("pending", "approved", "rejected").
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from_date: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to_date: Option<NaiveDate>,
    /// Return the full result set without pagination.
    #[serde(default)]
    pub no_paginate: bool,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for updating a pending transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New withdrawal type.
    pub withdrawal_type_id: Option<Uuid>,
    /// New account number.
    pub account_number: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

/// Request body for rejecting a transaction.
#[derive(Debug, Deserialize)]
pub struct RejectTransactionRequest {
    /// Why the transaction is rejected.
    pub reason: String,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Target cashbox ID.
    pub cashbox_id: Uuid,
    /// "deposit" or "withdrawal".
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount.
    pub amount: String,
    /// Target box balance before the financial effect.
    pub balance_before: String,
    /// Target box balance after the financial effect.
    pub balance_after: String,
    /// Lifecycle status.
    pub status: String,
    /// Rejection reason, if any.
    pub reason: Option<String>,
    /// Submitting user ID.
    pub created_by: Uuid,
    /// Resolving admin ID, if resolved.
    pub approved_by: Option<Uuid>,
    /// Withdrawal type ID, if any.
    pub withdrawal_type_id: Option<Uuid>,
    /// Account number.
    pub account_number: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Proof image URLs.
    pub images: Vec<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
    /// Updated at timestamp (ISO 8601).
    pub updated_at: String,
}

impl From<TransactionWithMedia> for TransactionResponse {
    fn from(row: TransactionWithMedia) -> Self {
        let tx = row.transaction;
        Self {
            id: tx.id,
            cashbox_id: tx.cashbox_id,
            kind: kind_to_string(tx.kind).to_string(),
            amount: tx.amount.to_string(),
            balance_before: tx.balance_before.to_string(),
            balance_after: tx.balance_after.to_string(),
            status: status_to_string(tx.status).to_string(),
            reason: tx.reason,
            created_by: tx.created_by,
            approved_by: tx.approved_by,
            withdrawal_type_id: tx.withdrawal_type_id,
            account_number: tx.account_number,
            phone_number: tx.phone_number,
            notes: tx.notes,
            images: row.media.into_iter().map(|m| m.image_url).collect(),
            created_at: tx.created_at.to_rfc3339(),
            updated_at: tx.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn status_to_string(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "pending",
        TransactionStatus::Approved => "approved",
        TransactionStatus::Rejected => "rejected",
    }
}

fn kind_to_string(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "deposit",
        TransactionKind::Withdrawal => "withdrawal",
    }
}

pub(crate) fn string_to_status(s: &str) -> Option<TransactionStatus> {
    match s {
        "pending" => Some(TransactionStatus::Pending),
        "approved" => Some(TransactionStatus::Approved),
        "rejected" => Some(TransactionStatus::Rejected),
        _ => None,
    }
}

/// Builds the role-scoped filter for listing and stats.
fn scoped_filter(auth: &AuthUser, query: &ListTransactionsQuery) -> TransactionFilter {
    TransactionFilter {
        cashbox_id: query.cashbox_id,
        status: query.status.as_deref().and_then(string_to_status),
        created_by: if auth.is_admin() {
            None
        } else {
            Some(auth.user_id())
        },
        from_date: query.from_date,
        to_date: query.to_date,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /transactions - List transactions with filters.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if let Some(status) = query.status.as_deref() {
        if string_to_status(status).is_none() {
            return error_response(&AppError::Validation(format!("invalid status: {status}")));
        }
    }

    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    let filter = scoped_filter(&auth, &query);

    if query.no_paginate {
        match repo.list(&filter).await {
            Ok(rows) => Json(
                rows.into_iter()
                    .map(TransactionResponse::from)
                    .collect::<Vec<_>>(),
            )
            .into_response(),
            Err(e) => error_response(&map_transaction_error(e)),
        }
    } else {
        let page = PageRequest {
            page: query.page.unwrap_or(1).max(1),
            per_page: query.per_page.unwrap_or(20).clamp(1, 100),
        };
        match repo.list_paginated(&filter, &page).await {
            Ok(page) => {
                let meta = page.meta;
                let data = page
                    .data
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect::<Vec<_>>();
                Json(serde_json::json!({ "data": data, "meta": meta })).into_response()
            }
            Err(e) => error_response(&map_transaction_error(e)),
        }
    }
}

/// GET /transactions/stats - Per-status counts.
async fn transaction_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    let mut filter = scoped_filter(&auth, &query);
    filter.status = None;

    match repo.stats(&filter).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// POST /transactions - Submit a pending fund movement.
///
/// Accepts `multipart/form-data` with `cashbox_id`, `amount`, `type`,
/// optional metadata, and at least one `images[]` proof file. Balances are
/// untouched until approval.
async fn submit_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> impl IntoResponse {
    let mut cashbox_id: Option<Uuid> = None;

    // cashbox_id rides in the same form; peel it out before the shared parse
    // cannot see custom fields.
    let form = match upload::parse_movement_form_with(
        multipart,
        state.media_policy,
        &state.storage,
        |name, value| {
            if name == "cashbox_id" {
                cashbox_id = Uuid::parse_str(value.trim()).ok();
            }
        },
    )
    .await
    {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    let Some(cashbox_id) = cashbox_id else {
        return error_response(&AppError::Validation("cashbox_id is required".to_string()));
    };
    let (amount, direction) = match (form.require_amount(), form.require_direction()) {
        (Ok(amount), Ok(direction)) => (amount, direction),
        (Err(e), _) | (_, Err(e)) => return error_response(&e),
    };

    // Agents may only submit against their own boxes.
    let boxes = CashBoxRepository::new((*state.db).clone(), state.main_box_id);
    match boxes.get_with_owner(cashbox_id).await {
        Ok((cash_box, _)) => {
            if !auth.is_admin() && cash_box.owner_id != auth.user_id() {
                return error_response(&AppError::Forbidden(
                    "You do not own this cashbox".to_string(),
                ));
            }
        }
        Err(e) => return error_response(&map_cashbox_error(e)),
    }

    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    match repo
        .submit(SubmitTransactionInput {
            cashbox_id,
            direction,
            amount,
            created_by: auth.user_id(),
            withdrawal_type_id: form.withdrawal_type_id,
            account_number: form.account_number,
            phone_number: form.phone_number,
            notes: form.notes,
            image_urls: form.image_urls,
        })
        .await
    {
        Ok(row) => (StatusCode::CREATED, Json(TransactionResponse::from(row))).into_response(),
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// GET /transactions/{transaction_id} - Get one transaction with images.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);

    match repo.get(transaction_id).await {
        Ok(row) => {
            if !auth.is_admin() && row.transaction.created_by != auth.user_id() {
                return error_response(&AppError::Forbidden(
                    "You may only view your own transactions".to_string(),
                ));
            }
            Json(TransactionResponse::from(row)).into_response()
        }
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// PATCH /transactions/{transaction_id} - Edit a pending transaction.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);

    match repo
        .update(
            transaction_id,
            auth.user_id(),
            auth.is_admin(),
            UpdateTransactionInput {
                amount: payload.amount,
                withdrawal_type_id: payload.withdrawal_type_id,
                account_number: payload.account_number,
                phone_number: payload.phone_number,
                notes: payload.notes,
            },
        )
        .await
    {
        Ok(updated) => match repo.get(updated.id).await {
            Ok(row) => Json(TransactionResponse::from(row)).into_response(),
            Err(e) => error_response(&map_transaction_error(e)),
        },
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// DELETE /transactions/{transaction_id} - Soft-delete a transaction.
///
/// Owners may delete their own pending submissions; admins may delete
/// anything. Balances are never reversed.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);

    match repo
        .soft_delete(transaction_id, auth.user_id(), auth.is_admin())
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// POST /transactions/{transaction_id}/approve - Approve (admin only).
async fn approve_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    match repo.approve(transaction_id, auth.user_id()).await {
        Ok(approved) => {
            info!(
                transaction_id = %approved.id,
                admin = %auth.user_id(),
                "Transaction approved via API"
            );
            match repo.get(approved.id).await {
                Ok(row) => Json(TransactionResponse::from(row)).into_response(),
                Err(e) => error_response(&map_transaction_error(e)),
            }
        }
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

/// POST /transactions/{transaction_id}/reject - Reject (admin only).
async fn reject_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<RejectTransactionRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    match repo
        .reject(transaction_id, auth.user_id(), &payload.reason)
        .await
    {
        Ok(rejected) => match repo.get(rejected.id).await {
            Ok(row) => Json(TransactionResponse::from(row)).into_response(),
            Err(e) => error_response(&map_transaction_error(e)),
        },
        Err(e) => error_response(&map_transaction_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
        ] {
            assert_eq!(string_to_status(status_to_string(status)), Some(status));
        }
        assert_eq!(string_to_status("draft"), None);
    }
}

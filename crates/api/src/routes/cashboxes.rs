//! Cashbox management routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{error_response, map_cashbox_error, require_admin, upload};
use caisse_db::entities::{cash_boxes, users};
use caisse_db::repositories::{CashBoxRepository, CreateCashBoxInput, FundInput};
use caisse_shared::AppError;

/// Creates the cashbox routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cashboxes", get(list_cashboxes))
        .route("/cashboxes", post(create_cashbox))
        .route("/cashboxes/{cashbox_id}", get(get_cashbox))
        .route("/cashboxes/{cashbox_id}/fund", post(fund_cashbox))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a sub cashbox.
#[derive(Debug, Deserialize)]
pub struct CreateCashBoxRequest {
    /// Display name.
    pub name: String,
    /// The agent who will own the box.
    pub owner_id: Uuid,
    /// Optional advisory daily cap.
    pub daily_limit: Option<Decimal>,
}

/// Response for a cashbox.
#[derive(Debug, Serialize)]
pub struct CashBoxResponse {
    /// Cashbox ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// "main" or "sub".
    pub kind: String,
    /// Owner user ID.
    pub owner_id: Uuid,
    /// Owner name, when loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Parent cashbox ID (the main box, for sub boxes).
    pub parent_cashbox_id: Option<Uuid>,
    /// Current balance.
    pub balance: String,
    /// Advisory daily cap.
    pub daily_limit: Option<String>,
    /// Lifecycle status string.
    pub status: String,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl CashBoxResponse {
    fn from_model(cash_box: cash_boxes::Model, owner: Option<&users::Model>) -> Self {
        Self {
            id: cash_box.id,
            name: cash_box.name,
            kind: match cash_box.kind {
                caisse_db::entities::sea_orm_active_enums::CashBoxKind::Main => "main".to_string(),
                caisse_db::entities::sea_orm_active_enums::CashBoxKind::Sub => "sub".to_string(),
            },
            owner_id: cash_box.owner_id,
            owner_name: owner.map(|u| u.name.clone()),
            parent_cashbox_id: cash_box.parent_cashbox_id,
            balance: cash_box.balance.to_string(),
            daily_limit: cash_box.daily_limit.map(|d| d.to_string()),
            status: cash_box.status,
            created_at: cash_box.created_at.to_rfc3339(),
        }
    }
}

/// Response for a direct fund operation.
#[derive(Debug, Serialize)]
pub struct FundResponse {
    /// The recorded transaction ID.
    pub transaction_id: Uuid,
    /// New balance of the target box.
    pub balance: String,
    /// New balance of the main box.
    pub main_balance: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /cashboxes - List cashboxes.
///
/// Admins see every box with its owner; agents see only their own.
async fn list_cashboxes(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = CashBoxRepository::new((*state.db).clone(), state.main_box_id);

    if auth.is_admin() {
        match repo.list_all().await {
            Ok(boxes) => Json(
                boxes
                    .into_iter()
                    .map(|(b, owner)| CashBoxResponse::from_model(b, owner.as_ref()))
                    .collect::<Vec<_>>(),
            )
            .into_response(),
            Err(e) => error_response(&map_cashbox_error(e)),
        }
    } else {
        match repo.list_for_owner(auth.user_id()).await {
            Ok(boxes) => Json(
                boxes
                    .into_iter()
                    .map(|b| CashBoxResponse::from_model(b, None))
                    .collect::<Vec<_>>(),
            )
            .into_response(),
            Err(e) => error_response(&map_cashbox_error(e)),
        }
    }
}

/// POST /cashboxes - Create a sub cashbox (admin only).
async fn create_cashbox(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCashBoxRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return error_response(&AppError::Validation("name is required".to_string()));
    }

    let repo = CashBoxRepository::new((*state.db).clone(), state.main_box_id);
    match repo
        .create_sub(CreateCashBoxInput {
            name: payload.name.trim().to_string(),
            owner_id: payload.owner_id,
            daily_limit: payload.daily_limit,
        })
        .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(CashBoxResponse::from_model(created, None)),
        )
            .into_response(),
        Err(e) => error_response(&map_cashbox_error(e)),
    }
}

/// GET /cashboxes/{cashbox_id} - Get one cashbox.
///
/// Agents may only view boxes they own.
async fn get_cashbox(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cashbox_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CashBoxRepository::new((*state.db).clone(), state.main_box_id);

    match repo.get_with_owner(cashbox_id).await {
        Ok((cash_box, owner)) => {
            if !auth.is_admin() && cash_box.owner_id != auth.user_id() {
                return error_response(&AppError::Forbidden(
                    "You do not own this cashbox".to_string(),
                ));
            }
            Json(CashBoxResponse::from_model(cash_box, owner.as_ref())).into_response()
        }
        Err(e) => error_response(&map_cashbox_error(e)),
    }
}

/// POST /cashboxes/{cashbox_id}/fund - Direct fund movement (admin only).
///
/// Accepts `multipart/form-data` with `amount`, `type`, optional metadata,
/// and optional `images[]` proof files. The movement is applied immediately
/// and recorded as an approved transaction.
async fn fund_cashbox(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cashbox_id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let form = match upload::parse_movement_form(multipart, state.media_policy, &state.storage).await
    {
        Ok(form) => form,
        Err(e) => return error_response(&e),
    };

    let (amount, direction) = match (form.require_amount(), form.require_direction()) {
        (Ok(amount), Ok(direction)) => (amount, direction),
        (Err(e), _) | (_, Err(e)) => return error_response(&e),
    };

    let repo = CashBoxRepository::new((*state.db).clone(), state.main_box_id);
    match repo
        .fund(FundInput {
            cashbox_id,
            amount,
            direction,
            created_by: auth.user_id(),
            withdrawal_type_id: form.withdrawal_type_id,
            account_number: form.account_number,
            phone_number: form.phone_number,
            notes: form.notes,
            image_urls: form.image_urls,
        })
        .await
    {
        Ok(outcome) => {
            info!(
                cashbox_id = %cashbox_id,
                transaction_id = %outcome.transaction.id,
                admin = %auth.user_id(),
                "Direct fund operation completed"
            );
            (
                StatusCode::CREATED,
                Json(FundResponse {
                    transaction_id: outcome.transaction.id,
                    balance: outcome.box_balance.to_string(),
                    main_balance: outcome.main_balance.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&map_cashbox_error(e)),
    }
}

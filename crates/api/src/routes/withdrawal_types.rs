//! Withdrawal type lookup table routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::{error_response, map_withdrawal_type_error, require_admin};
use crate::{AppState, middleware::AuthUser};
use caisse_db::entities::withdrawal_types;
use caisse_db::repositories::WithdrawalTypeRepository;
use caisse_shared::AppError;

/// Creates the withdrawal type routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/withdrawal-types", get(list_types))
        .route("/withdrawal-types", post(create_type))
        .route("/withdrawal-types/{type_id}", get(get_type))
        .route("/withdrawal-types/{type_id}", patch(update_type))
        .route("/withdrawal-types/{type_id}", delete(delete_type))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a withdrawal type.
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalTypeRequest {
    /// Unique display name.
    pub name: String,
}

/// Request body for updating a withdrawal type.
#[derive(Debug, Deserialize)]
pub struct UpdateWithdrawalTypeRequest {
    /// New name.
    pub name: Option<String>,
    /// Enable or disable the type.
    pub is_active: Option<bool>,
}

/// Response for a withdrawal type.
#[derive(Debug, Serialize)]
pub struct WithdrawalTypeResponse {
    /// Type ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether the type is selectable for new withdrawals.
    pub is_active: bool,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl From<withdrawal_types::Model> for WithdrawalTypeResponse {
    fn from(model: withdrawal_types::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /withdrawal-types - List all withdrawal types.
async fn list_types(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = WithdrawalTypeRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(types) => Json(
            types
                .into_iter()
                .map(WithdrawalTypeResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => error_response(&map_withdrawal_type_error(e)),
    }
}

/// GET /withdrawal-types/{type_id} - Get one withdrawal type.
async fn get_type(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(type_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WithdrawalTypeRepository::new((*state.db).clone());
    match repo.get(type_id).await {
        Ok(model) => Json(WithdrawalTypeResponse::from(model)).into_response(),
        Err(e) => error_response(&map_withdrawal_type_error(e)),
    }
}

/// POST /withdrawal-types - Create a withdrawal type (admin only).
async fn create_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateWithdrawalTypeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let name = payload.name.trim();
    if name.is_empty() {
        return error_response(&AppError::Validation("name is required".to_string()));
    }

    let repo = WithdrawalTypeRepository::new((*state.db).clone());
    match repo.create(name).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(WithdrawalTypeResponse::from(created)),
        )
            .into_response(),
        Err(e) => error_response(&map_withdrawal_type_error(e)),
    }
}

/// PATCH /withdrawal-types/{type_id} - Update a withdrawal type (admin only).
async fn update_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(type_id): Path<Uuid>,
    Json(payload): Json<UpdateWithdrawalTypeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return error_response(&AppError::Validation("name must not be empty".to_string()));
        }
    }

    let repo = WithdrawalTypeRepository::new((*state.db).clone());
    match repo
        .update(
            type_id,
            payload.name.as_deref().map(str::trim),
            payload.is_active,
        )
        .await
    {
        Ok(updated) => Json(WithdrawalTypeResponse::from(updated)).into_response(),
        Err(e) => error_response(&map_withdrawal_type_error(e)),
    }
}

/// DELETE /withdrawal-types/{type_id} - Delete an unused type (admin only).
async fn delete_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(type_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = WithdrawalTypeRepository::new((*state.db).clone());
    match repo.delete(type_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_withdrawal_type_error(e)),
    }
}

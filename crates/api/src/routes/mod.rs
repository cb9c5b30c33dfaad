//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser, middleware::auth::auth_middleware};
use caisse_core::lifecycle::LifecycleError;
use caisse_core::transfer::TransferError;
use caisse_db::repositories::{CashBoxError, TransactionError, WithdrawalTypeError};
use caisse_shared::AppError;

pub mod auth;
pub mod cashboxes;
pub mod health;
pub mod reports;
pub mod transactions;
pub(crate) mod upload;
pub mod withdrawal_types;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(cashboxes::routes())
        .merge(transactions::routes())
        .merge(withdrawal_types::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Renders an [`AppError`] as a JSON error response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Ensures the caller holds the admin role.
pub(crate) fn require_admin(auth: &AuthUser) -> Result<(), Response> {
    auth.role
        .require_admin()
        .map_err(|e| error_response(&AppError::Forbidden(e.to_string())))
}

pub(crate) fn map_transfer_error(err: TransferError) -> AppError {
    match err {
        TransferError::NonPositiveAmount(_) => AppError::Validation(err.to_string()),
        TransferError::InsufficientFunds { .. } => AppError::InsufficientFunds(err.to_string()),
    }
}

pub(crate) fn map_lifecycle_error(err: LifecycleError) -> AppError {
    match err {
        LifecycleError::NonPositiveAmount(_)
        | LifecycleError::ProofImageRequired
        | LifecycleError::WithdrawalTypeRequired
        | LifecycleError::ReasonRequired => AppError::Validation(err.to_string()),
        LifecycleError::AlreadyResolved(_) | LifecycleError::NotEditable => {
            AppError::StateConflict(err.to_string())
        }
        LifecycleError::DeleteForbidden => AppError::Forbidden(err.to_string()),
    }
}

pub(crate) fn map_cashbox_error(err: CashBoxError) -> AppError {
    match err {
        CashBoxError::NotFound(_) | CashBoxError::MainBoxMissing => {
            AppError::NotFound(err.to_string())
        }
        CashBoxError::OwnerNotFound(_) | CashBoxError::WithdrawalTypeNotFound(_) => {
            AppError::Validation(err.to_string())
        }
        CashBoxError::MainBoxAmbiguous(_) => AppError::Internal(err.to_string()),
        CashBoxError::Transfer(e) => map_transfer_error(e),
        CashBoxError::Database(e) => AppError::Database(e.to_string()),
    }
}

pub(crate) fn map_transaction_error(err: TransactionError) -> AppError {
    match err {
        TransactionError::NotFound(_) | TransactionError::CashBoxNotFound(_) => {
            AppError::NotFound(err.to_string())
        }
        TransactionError::WithdrawalTypeNotFound(_) => AppError::Validation(err.to_string()),
        TransactionError::Forbidden => AppError::Forbidden(err.to_string()),
        TransactionError::Lifecycle(e) => map_lifecycle_error(e),
        TransactionError::Transfer(e) => map_transfer_error(e),
        TransactionError::Database(e) => AppError::Database(e.to_string()),
    }
}

pub(crate) fn map_withdrawal_type_error(err: WithdrawalTypeError) -> AppError {
    match err {
        WithdrawalTypeError::NotFound(_) => AppError::NotFound(err.to_string()),
        WithdrawalTypeError::DuplicateName(_) | WithdrawalTypeError::InUse => {
            AppError::Conflict(err.to_string())
        }
        WithdrawalTypeError::Database(e) => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_insufficient_funds_maps_to_400() {
        let err = map_transfer_error(TransferError::InsufficientFunds {
            available: dec!(10),
            requested: dec!(20),
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");
    }

    #[test]
    fn test_already_resolved_maps_to_422() {
        let err = map_lifecycle_error(LifecycleError::AlreadyResolved(
            caisse_core::lifecycle::TransactionStatus::Approved,
        ));
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "STATE_CONFLICT");
    }

    #[test]
    fn test_delete_forbidden_maps_to_403() {
        let err = map_lifecycle_error(LifecycleError::DeleteForbidden);
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = map_transaction_error(TransactionError::NotFound(Uuid::new_v4()));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_unknown_owner_maps_to_400() {
        let err = map_cashbox_error(CashBoxError::OwnerNotFound(Uuid::new_v4()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_unknown_withdrawal_type_maps_to_400() {
        let from_fund = map_cashbox_error(CashBoxError::WithdrawalTypeNotFound(Uuid::new_v4()));
        assert_eq!(from_fund.status_code(), 400);

        let from_submit =
            map_transaction_error(TransactionError::WithdrawalTypeNotFound(Uuid::new_v4()));
        assert_eq!(from_submit.status_code(), 400);
        assert_eq!(from_submit.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_duplicate_name_maps_to_409() {
        let err =
            map_withdrawal_type_error(WithdrawalTypeError::DuplicateName("Cash".to_string()));
        assert_eq!(err.status_code(), 409);
    }
}

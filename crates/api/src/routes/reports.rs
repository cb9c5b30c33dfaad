//! Reporting routes.
//!
//! The export endpoint flattens transactions into CSV for download. Any
//! richer formatting (spreadsheets, charts) is a client concern.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::routes::transactions::string_to_status;
use crate::routes::{error_response, map_transaction_error, require_admin};
use crate::{AppState, middleware::AuthUser};
use caisse_db::entities::sea_orm_active_enums::{TransactionKind, TransactionStatus};
use caisse_db::repositories::{ExportRow, TransactionFilter, TransactionRepository};
use caisse_shared::AppError;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/transactions/export", get(export_transactions))
}

/// Query parameters for the export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Restrict to one cashbox.
    pub cashbox_id: Option<Uuid>,
    /// Restrict to one lifecycle status (pending, approved, rejected).
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from_date: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to_date: Option<NaiveDate>,
}

/// GET /reports/transactions/export - Download transactions as CSV (admin only).
async fn export_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let status = match query.status.as_deref() {
        Some(raw) => match string_to_status(raw) {
            Some(status) => Some(status),
            None => {
                return error_response(&AppError::Validation(format!("invalid status: {raw}")));
            }
        },
        None => None,
    };

    let repo = TransactionRepository::new((*state.db).clone(), state.main_box_id);
    let filter = TransactionFilter {
        cashbox_id: query.cashbox_id,
        status,
        from_date: query.from_date,
        to_date: query.to_date,
        ..TransactionFilter::default()
    };

    let rows = match repo.export_rows(&filter).await {
        Ok(rows) => rows,
        Err(e) => return error_response(&map_transaction_error(e)),
    };

    match render_csv(&rows) {
        Ok(body) => {
            info!(rows = rows.len(), admin = %auth.user_id(), "Transactions exported");
            csv_response(body)
        }
        Err(e) => error_response(&e),
    }
}

fn kind_str(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "deposit",
        TransactionKind::Withdrawal => "withdrawal",
    }
}

fn status_str(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "pending",
        TransactionStatus::Approved => "approved",
        TransactionStatus::Rejected => "rejected",
    }
}

fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "cashbox",
            "type",
            "amount",
            "balance_before",
            "balance_after",
            "status",
            "created_by",
            "notes",
            "created_at",
        ])
        .map_err(|e| AppError::Internal(format!("failed to write CSV header: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.id.to_string(),
                row.cashbox_name.clone(),
                kind_str(row.kind).to_string(),
                row.amount.to_string(),
                row.balance_before.to_string(),
                row.balance_after.to_string(),
                status_str(row.status).to_string(),
                row.created_by_name.clone(),
                row.notes.clone().unwrap_or_default(),
                row.created_at.to_rfc3339(),
            ])
            .map_err(|e| AppError::Internal(format!("failed to write CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("failed to finish CSV: {e}")))
}

fn csv_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn sample_row() -> ExportRow {
        ExportRow {
            id: Uuid::new_v4(),
            cashbox_name: "North Branch".to_string(),
            kind: TransactionKind::Deposit,
            amount: dec!(150.25),
            balance_before: dec!(0),
            balance_after: dec!(150.25),
            status: TransactionStatus::Approved,
            created_by_name: "Agent, \"The\" First".to_string(),
            notes: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap().into(),
        }
    }

    #[test]
    fn test_csv_has_header_and_quotes_fields() {
        let body = render_csv(&[sample_row()]).unwrap();
        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,cashbox,type,amount,balance_before,balance_after,status,created_by,notes,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("North Branch"));
        assert!(row.contains("deposit"));
        assert!(row.contains("approved"));
        // Embedded quotes and commas survive quoting.
        assert!(row.contains("\"Agent, \"\"The\"\" First\""));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let body = render_csv(&[]).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}

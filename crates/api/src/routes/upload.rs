//! Multipart form parsing for fund movement submissions.
//!
//! Both the agent submission endpoint and the admin direct-fund endpoint
//! accept the same `multipart/form-data` shape: scalar fields plus zero or
//! more `images[]` file parts. Parsing validates each image against the
//! configured policy and stores accepted blobs immediately.

use axum::extract::Multipart;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use caisse_core::media::MediaPolicy;
use caisse_core::storage::StorageService;
use caisse_core::transfer::Direction;
use caisse_shared::AppError;

/// Parsed fund movement form.
#[derive(Debug, Default)]
pub(crate) struct MovementForm {
    /// Amount to move.
    pub amount: Option<Decimal>,
    /// Deposit or withdrawal.
    pub direction: Option<Direction>,
    /// Withdrawal type reference.
    pub withdrawal_type_id: Option<Uuid>,
    /// Account number.
    pub account_number: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Public URLs of the stored proof images.
    pub image_urls: Vec<String>,
}

impl MovementForm {
    /// Returns the amount or a validation error.
    pub fn require_amount(&self) -> Result<Decimal, AppError> {
        self.amount
            .ok_or_else(|| AppError::Validation("amount is required".to_string()))
    }

    /// Returns the direction or a validation error.
    pub fn require_direction(&self) -> Result<Direction, AppError> {
        self.direction
            .ok_or_else(|| AppError::Validation("type is required".to_string()))
    }
}

/// Parses a fund movement multipart form, storing images as they stream in.
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed fields and rejected images,
/// `AppError::Internal` if blob storage fails.
pub(crate) async fn parse_movement_form(
    multipart: Multipart,
    policy: MediaPolicy,
    storage: &Arc<StorageService>,
) -> Result<MovementForm, AppError> {
    parse_movement_form_with(multipart, policy, storage, |_, _| {}).await
}

/// Like [`parse_movement_form`], but hands unknown text fields to `extra`
/// so endpoint-specific fields can ride in the same form.
pub(crate) async fn parse_movement_form_with(
    mut multipart: Multipart,
    policy: MediaPolicy,
    storage: &Arc<StorageService>,
    mut extra: impl FnMut(&str, &str),
) -> Result<MovementForm, AppError> {
    let mut form = MovementForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "amount" => {
                let text = read_text(field, &name).await?;
                let amount = Decimal::from_str(text.trim())
                    .map_err(|_| AppError::Validation(format!("invalid amount: {text}")))?;
                form.amount = Some(amount);
            }
            "type" => {
                let text = read_text(field, &name).await?;
                let direction = Direction::parse(text.trim())
                    .ok_or_else(|| AppError::Validation(format!("invalid type: {text}")))?;
                form.direction = Some(direction);
            }
            "withdrawal_type_id" => {
                let text = read_text(field, &name).await?;
                let id = Uuid::parse_str(text.trim()).map_err(|_| {
                    AppError::Validation(format!("invalid withdrawal_type_id: {text}"))
                })?;
                form.withdrawal_type_id = Some(id);
            }
            "account_number" => {
                form.account_number = Some(read_text(field, &name).await?);
            }
            "phone_number" => {
                form.phone_number = Some(read_text(field, &name).await?);
            }
            "notes" => {
                form.notes = Some(read_text(field, &name).await?);
            }
            "images" | "images[]" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read image: {e}")))?;

                let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
                policy
                    .validate(&content_type, size)
                    .map_err(|e| AppError::Validation(e.to_string()))?;

                let url = storage
                    .store_proof_image(&content_type, bytes.to_vec())
                    .await
                    .map_err(|e| AppError::Internal(format!("failed to store image: {e}")))?;
                form.image_urls.push(url);
            }
            _ => {
                // Text parts the shared parser does not know go to the caller.
                if field.content_type().is_none() {
                    let value = read_text(field, &name).await?;
                    extra(&name, &value);
                }
            }
        }
    }

    Ok(form)
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid field '{name}': {e}")))
}

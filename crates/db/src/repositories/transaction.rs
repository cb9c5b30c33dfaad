//! Transaction repository: submission, approval workflow, listing, export.
//!
//! Approval is the only path that moves money for agent submissions. It runs
//! as one database transaction that locks the pending row and every cashbox
//! involved, asks the core engine for a plan, and persists balances, status,
//! snapshots, and the audit record together.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    FromQueryResult, JoinType, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use caisse_core::audit::AuditRecord;
use caisse_core::lifecycle::{LifecycleError, LifecycleService, SubmissionInput};
use caisse_core::transfer::{Direction, TransferEngine, TransferError};
use caisse_shared::types::{PageRequest, PageResponse};

use super::audit::AuditLogRepository;
use super::cashbox::{insert_media, lock_box, write_balance};
use crate::entities::{
    cash_boxes, transaction_media, transactions, users, withdrawal_types,
    sea_orm_active_enums::{TransactionKind, TransactionStatus},
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found (or soft-deleted).
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Referenced cashbox not found.
    #[error("Cashbox not found: {0}")]
    CashBoxNotFound(Uuid),

    /// Referenced withdrawal type not found.
    #[error("Withdrawal type not found: {0}")]
    WithdrawalTypeNotFound(Uuid),

    /// The actor may not touch this transaction.
    #[error("Operation not permitted on this transaction")]
    Forbidden,

    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Transfer planning failed (non-positive amount, insufficient funds).
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for an agent fund-movement submission.
#[derive(Debug, Clone)]
pub struct SubmitTransactionInput {
    /// The sub cashbox the submission targets.
    pub cashbox_id: Uuid,
    /// Deposit or withdrawal, from the target box's point of view.
    pub direction: Direction,
    /// Amount requested (must be positive).
    pub amount: Decimal,
    /// The submitting agent.
    pub created_by: Uuid,
    /// Required for withdrawals.
    pub withdrawal_type_id: Option<Uuid>,
    /// Optional account number.
    pub account_number: Option<String>,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Stored proof image URLs (at least one).
    pub image_urls: Vec<String>,
}

/// Fields an owner may change while a transaction is still pending.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New withdrawal type, if changing.
    pub withdrawal_type_id: Option<Uuid>,
    /// New account number, if changing.
    pub account_number: Option<String>,
    /// New phone number, if changing.
    pub phone_number: Option<String>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

/// Filters for transaction listing and export.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one cashbox.
    pub cashbox_id: Option<Uuid>,
    /// Restrict to one lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Restrict to the submissions of one user (agent scoping).
    pub created_by: Option<Uuid>,
    /// Inclusive lower bound on the creation date.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date.
    pub to_date: Option<NaiveDate>,
}

/// Per-status counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TransactionStats {
    /// Transactions awaiting a decision.
    pub pending: u64,
    /// Approved transactions.
    pub approved: u64,
    /// Rejected transactions.
    pub rejected: u64,
    /// All visible transactions.
    pub total: u64,
}

/// A transaction with its proof images.
#[derive(Debug, Clone)]
pub struct TransactionWithMedia {
    /// The transaction row.
    pub transaction: transactions::Model,
    /// Attached proof images, oldest first.
    pub media: Vec<transaction_media::Model>,
}

/// One flattened row of the export report.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ExportRow {
    /// Transaction id.
    pub id: Uuid,
    /// Name of the cashbox involved.
    pub cashbox_name: String,
    /// Deposit or withdrawal.
    pub kind: TransactionKind,
    /// Amount moved (or requested).
    pub amount: Decimal,
    /// Target box balance before the effect.
    pub balance_before: Decimal,
    /// Target box balance after the effect.
    pub balance_after: Decimal,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Name of the submitting user.
    pub created_by_name: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Submission timestamp.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    main_box_id: Uuid,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, main_box_id: Uuid) -> Self {
        Self { db, main_box_id }
    }

    /// Records a pending submission with zeroed balance snapshots.
    ///
    /// No balances move here; the financial effect is deferred until an
    /// admin approves.
    ///
    /// # Errors
    ///
    /// * `Lifecycle` for non-positive amounts, missing proof images, or
    ///   withdrawals without a withdrawal type
    /// * `CashBoxNotFound` if the target box does not exist
    /// * `WithdrawalTypeNotFound` for an unknown withdrawal type
    pub async fn submit(
        &self,
        input: SubmitTransactionInput,
    ) -> Result<TransactionWithMedia, TransactionError> {
        LifecycleService::validate_submission(&SubmissionInput {
            direction: input.direction,
            amount: input.amount,
            image_count: input.image_urls.len(),
            has_withdrawal_type: input.withdrawal_type_id.is_some(),
        })?;

        cash_boxes::Entity::find_by_id(input.cashbox_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::CashBoxNotFound(input.cashbox_id))?;
        self.ensure_withdrawal_type(input.withdrawal_type_id).await?;

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            cashbox_id: Set(input.cashbox_id),
            kind: Set(input.direction.into()),
            amount: Set(input.amount),
            balance_before: Set(Decimal::ZERO),
            balance_after: Set(Decimal::ZERO),
            status: Set(TransactionStatus::Pending),
            reason: Set(None),
            created_by: Set(input.created_by),
            approved_by: Set(None),
            withdrawal_type_id: Set(input.withdrawal_type_id),
            account_number: Set(input.account_number.clone()),
            phone_number: Set(input.phone_number.clone()),
            notes: Set(input.notes.clone()),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let media = insert_media(&txn, transaction.id, &input.image_urls).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            cashbox_id = %input.cashbox_id,
            amount = %input.amount,
            "Submission recorded as pending"
        );

        Ok(TransactionWithMedia { transaction, media })
    }

    /// Approves a pending transaction, applying its financial effect.
    ///
    /// The whole decision is one atomic scope: the pending row is locked,
    /// then the main box, then the target sub box. Balance snapshots are
    /// captured from the locked rows before any balance is written.
    ///
    /// # Errors
    ///
    /// * `NotFound` for unknown or soft-deleted transactions
    /// * `Lifecycle(AlreadyResolved)` if the transaction is not pending
    /// * `Transfer(InsufficientFunds)` if the source box cannot cover it
    pub async fn approve(
        &self,
        transaction_id: Uuid,
        approver: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let pending = lock_transaction(&txn, transaction_id)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;
        LifecycleService::ensure_pending(pending.status.into())?;

        let direction: Direction = pending.kind.into();

        let snapshot = if pending.cashbox_id == self.main_box_id {
            let main = lock_box(&txn, self.main_box_id)
                .await?
                .ok_or(TransactionError::CashBoxNotFound(self.main_box_id))?;
            let plan = TransferEngine::plan_external(main.balance, pending.amount, direction)?;
            write_balance(&txn, main, plan.main_after).await?;
            plan.snapshot
        } else {
            // Lock ordering: main first, then the sub box.
            let main = lock_box(&txn, self.main_box_id)
                .await?
                .ok_or(TransactionError::CashBoxNotFound(self.main_box_id))?;
            let sub = lock_box(&txn, pending.cashbox_id)
                .await?
                .ok_or(TransactionError::CashBoxNotFound(pending.cashbox_id))?;
            let plan =
                TransferEngine::plan_funding(main.balance, sub.balance, pending.amount, direction)?;
            write_balance(&txn, main, plan.main_after).await?;
            write_balance(&txn, sub, plan.sub_after).await?;
            plan.snapshot
        };

        let amount = pending.amount;
        let mut active: transactions::ActiveModel = pending.into();
        active.status = Set(TransactionStatus::Approved);
        active.approved_by = Set(Some(approver));
        active.balance_before = Set(snapshot.before);
        active.balance_after = Set(snapshot.after);
        active.updated_at = Set(Utc::now().into());
        let approved = active.update(&txn).await?;

        AuditLogRepository::append(
            &txn,
            &AuditRecord::transaction_approved(approver, approved.id, amount, direction),
        )
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = %approved.id,
            approver = %approver,
            amount = %amount,
            direction = %direction,
            "Transaction approved"
        );

        Ok(approved)
    }

    /// Rejects a pending transaction with a reason. No balances change.
    ///
    /// # Errors
    ///
    /// * `NotFound` for unknown or soft-deleted transactions
    /// * `Lifecycle(ReasonRequired)` for an empty reason
    /// * `Lifecycle(AlreadyResolved)` if the transaction is not pending
    pub async fn reject(
        &self,
        transaction_id: Uuid,
        approver: Uuid,
        reason: &str,
    ) -> Result<transactions::Model, TransactionError> {
        let reason = LifecycleService::rejection_reason(reason)?;

        let txn = self.db.begin().await?;

        let pending = lock_transaction(&txn, transaction_id)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;
        LifecycleService::ensure_pending(pending.status.into())?;

        let mut active: transactions::ActiveModel = pending.into();
        active.status = Set(TransactionStatus::Rejected);
        active.approved_by = Set(Some(approver));
        active.reason = Set(Some(reason.clone()));
        active.updated_at = Set(Utc::now().into());
        let rejected = active.update(&txn).await?;

        AuditLogRepository::append(
            &txn,
            &AuditRecord::transaction_rejected(approver, rejected.id, &reason),
        )
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = %rejected.id,
            approver = %approver,
            "Transaction rejected"
        );

        Ok(rejected)
    }

    /// Updates a pending transaction in place.
    ///
    /// Only the submitting owner (or an admin) may edit, and only while the
    /// transaction is still pending. The row is locked for the whole edit so
    /// an update cannot race a concurrent approval and change the amount
    /// after snapshots were captured.
    ///
    /// # Errors
    ///
    /// * `Forbidden` if the actor is neither the owner nor an admin
    /// * `Lifecycle(NotEditable)` once the transaction is resolved
    /// * `WithdrawalTypeNotFound` for an unknown withdrawal type
    pub async fn update(
        &self,
        transaction_id: Uuid,
        actor: Uuid,
        is_admin: bool,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        self.ensure_withdrawal_type(input.withdrawal_type_id).await?;

        let txn = self.db.begin().await?;

        let existing = lock_transaction(&txn, transaction_id)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        if !is_admin && existing.created_by != actor {
            return Err(TransactionError::Forbidden);
        }
        LifecycleService::can_modify(existing.status.into())?;

        if let Some(amount) = input.amount {
            if amount <= Decimal::ZERO {
                return Err(LifecycleError::NonPositiveAmount(amount).into());
            }
        }

        let mut active: transactions::ActiveModel = existing.into();
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(withdrawal_type_id) = input.withdrawal_type_id {
            active.withdrawal_type_id = Set(Some(withdrawal_type_id));
        }
        if let Some(account_number) = input.account_number {
            active.account_number = Set(Some(account_number));
        }
        if let Some(phone_number) = input.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Soft-deletes a transaction.
    ///
    /// Owners may delete their own pending submissions; admins may delete
    /// anything. Deleting an approved transaction hides the row and never
    /// reverses its balance effect.
    ///
    /// # Errors
    ///
    /// Returns `Lifecycle(DeleteForbidden)` when the actor lacks the right.
    pub async fn soft_delete(
        &self,
        transaction_id: Uuid,
        actor: Uuid,
        is_admin: bool,
    ) -> Result<(), TransactionError> {
        let existing = self.find_visible(transaction_id).await?;

        LifecycleService::can_delete(
            existing.status.into(),
            is_admin,
            existing.created_by == actor,
        )?;

        let id = existing.id;
        let mut active: transactions::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        info!(transaction_id = %id, actor = %actor, "Transaction soft-deleted");
        Ok(())
    }

    /// Gets a visible transaction with its proof images.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or soft-deleted transactions.
    pub async fn get(&self, transaction_id: Uuid) -> Result<TransactionWithMedia, TransactionError> {
        let transaction = self.find_visible(transaction_id).await?;
        let media = transaction_media::Entity::find()
            .filter(transaction_media::Column::TransactionId.eq(transaction.id))
            .order_by_asc(transaction_media::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(TransactionWithMedia { transaction, media })
    }

    /// Lists all visible transactions matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionWithMedia>, TransactionError> {
        let rows = apply_filter(visible(), filter)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.attach_media(rows).await
    }

    /// Lists one page of visible transactions matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_paginated(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<TransactionWithMedia>, TransactionError> {
        let query = apply_filter(visible(), filter).order_by_desc(transactions::Column::CreatedAt);

        let paginator = query.paginate(&self.db, page.limit().max(1));
        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        let data = self.attach_media(rows).await?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Counts visible transactions by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stats(
        &self,
        filter: &TransactionFilter,
    ) -> Result<TransactionStats, TransactionError> {
        let count = |status: Option<TransactionStatus>| {
            let mut filter = filter.clone();
            filter.status = status;
            let query = apply_filter(visible(), &filter);
            async move { query.count(&self.db).await }
        };

        let pending = count(Some(TransactionStatus::Pending)).await?;
        let approved = count(Some(TransactionStatus::Approved)).await?;
        let rejected = count(Some(TransactionStatus::Rejected)).await?;

        Ok(TransactionStats {
            pending,
            approved,
            rejected,
            total: pending + approved + rejected,
        })
    }

    /// Loads flattened report rows for export, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export_rows(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<ExportRow>, TransactionError> {
        let rows = apply_filter(visible(), filter)
            .join(JoinType::InnerJoin, transactions::Relation::CashBox.def())
            .join(JoinType::InnerJoin, transactions::Relation::Creator.def())
            .select_only()
            .column(transactions::Column::Id)
            .column_as(cash_boxes::Column::Name, "cashbox_name")
            .column(transactions::Column::Kind)
            .column(transactions::Column::Amount)
            .column(transactions::Column::BalanceBefore)
            .column(transactions::Column::BalanceAfter)
            .column(transactions::Column::Status)
            .column_as(users::Column::Name, "created_by_name")
            .column(transactions::Column::Notes)
            .column(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::CreatedAt)
            .into_model::<ExportRow>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn ensure_withdrawal_type(
        &self,
        withdrawal_type_id: Option<Uuid>,
    ) -> Result<(), TransactionError> {
        if let Some(id) = withdrawal_type_id {
            withdrawal_types::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(TransactionError::WithdrawalTypeNotFound(id))?;
        }
        Ok(())
    }

    async fn find_visible(
        &self,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        visible()
            .filter(transactions::Column::Id.eq(transaction_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    async fn attach_media(
        &self,
        rows: Vec<transactions::Model>,
    ) -> Result<Vec<TransactionWithMedia>, TransactionError> {
        let media = rows.load_many(transaction_media::Entity, &self.db).await?;
        Ok(rows
            .into_iter()
            .zip(media)
            .map(|(transaction, media)| TransactionWithMedia { transaction, media })
            .collect())
    }
}

/// Base query excluding soft-deleted rows.
fn visible() -> Select<transactions::Entity> {
    transactions::Entity::find().filter(transactions::Column::DeletedAt.is_null())
}

fn apply_filter(
    mut query: Select<transactions::Entity>,
    filter: &TransactionFilter,
) -> Select<transactions::Entity> {
    if let Some(cashbox_id) = filter.cashbox_id {
        query = query.filter(transactions::Column::CashboxId.eq(cashbox_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(transactions::Column::Status.eq(status));
    }
    if let Some(created_by) = filter.created_by {
        query = query.filter(transactions::Column::CreatedBy.eq(created_by));
    }
    if let Some(from) = filter.from_date {
        query = query
            .filter(transactions::Column::CreatedAt.gte(from.and_time(NaiveTime::MIN).and_utc()));
    }
    if let Some(to) = filter.to_date {
        if let Some(next_day) = to.succ_opt() {
            query = query.filter(
                transactions::Column::CreatedAt.lt(next_day.and_time(NaiveTime::MIN).and_utc()),
            );
        }
    }
    query
}

/// Loads a transaction row under `SELECT ... FOR UPDATE`, skipping
/// soft-deleted rows.
async fn lock_transaction(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<Option<transactions::Model>, DbErr> {
    transactions::Entity::find_by_id(id)
        .filter(transactions::Column::DeletedAt.is_null())
        .lock_exclusive()
        .one(txn)
        .await
}

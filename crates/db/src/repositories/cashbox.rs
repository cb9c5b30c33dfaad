//! Cashbox repository: listing, creation, and direct fund operations.
//!
//! The direct fund path is admin-initiated and immediately resolved: one
//! database transaction locks the boxes involved, applies the plan produced
//! by the core transfer engine, and records a single already-approved
//! transaction row.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use caisse_core::transfer::{Direction, TransferEngine, TransferError};

use crate::entities::{
    cash_boxes, transaction_media, transactions, users, withdrawal_types,
    sea_orm_active_enums::{CashBoxKind, TransactionStatus},
};

/// Error types for cashbox operations.
#[derive(Debug, thiserror::Error)]
pub enum CashBoxError {
    /// Cashbox not found.
    #[error("Cashbox not found: {0}")]
    NotFound(Uuid),

    /// The main box is missing.
    #[error("Main cashbox not found")]
    MainBoxMissing,

    /// The designated owner does not exist.
    #[error("Owner not found: {0}")]
    OwnerNotFound(Uuid),

    /// The referenced withdrawal type does not exist.
    #[error("Withdrawal type not found: {0}")]
    WithdrawalTypeNotFound(Uuid),

    /// More than one main box exists; the singleton invariant is broken.
    #[error("Expected exactly one main cashbox, found {0}")]
    MainBoxAmbiguous(usize),

    /// Transfer planning failed (non-positive amount, insufficient funds).
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a sub cashbox.
#[derive(Debug, Clone)]
pub struct CreateCashBoxInput {
    /// Display name.
    pub name: String,
    /// The agent who owns the box.
    pub owner_id: Uuid,
    /// Optional advisory daily cap.
    pub daily_limit: Option<Decimal>,
}

/// Input for a direct fund operation.
#[derive(Debug, Clone)]
pub struct FundInput {
    /// Target cashbox (a sub box, or the main box for external ops).
    pub cashbox_id: Uuid,
    /// Amount to move (must be positive).
    pub amount: Decimal,
    /// Deposit or withdrawal, as seen from the target box.
    pub direction: Direction,
    /// The admin performing the operation.
    pub created_by: Uuid,
    /// Optional withdrawal metadata.
    pub withdrawal_type_id: Option<Uuid>,
    /// Optional account number.
    pub account_number: Option<String>,
    /// Optional phone number.
    pub phone_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Stored proof image URLs (may be empty for direct admin operations).
    pub image_urls: Vec<String>,
}

/// Result of a direct fund operation.
#[derive(Debug, Clone)]
pub struct FundOutcome {
    /// The recorded (already approved) transaction.
    pub transaction: transactions::Model,
    /// New balance of the target box.
    pub box_balance: Decimal,
    /// New balance of the main box.
    pub main_balance: Decimal,
}

/// Resolves the id of the single main cashbox.
///
/// Called once at startup; the resolved id is carried in application state so
/// request paths never query by kind.
///
/// # Errors
///
/// Returns `MainBoxMissing` if no main box exists and `MainBoxAmbiguous` if
/// more than one does.
pub async fn resolve_main_box(db: &DatabaseConnection) -> Result<Uuid, CashBoxError> {
    let mains = cash_boxes::Entity::find()
        .filter(cash_boxes::Column::Kind.eq(CashBoxKind::Main))
        .all(db)
        .await?;

    match mains.as_slice() {
        [main] => Ok(main.id),
        [] => Err(CashBoxError::MainBoxMissing),
        many => Err(CashBoxError::MainBoxAmbiguous(many.len())),
    }
}

/// Cashbox repository.
#[derive(Debug, Clone)]
pub struct CashBoxRepository {
    db: DatabaseConnection,
    main_box_id: Uuid,
}

impl CashBoxRepository {
    /// Creates a new cashbox repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, main_box_id: Uuid) -> Self {
        Self { db, main_box_id }
    }

    /// Returns the well-known main box id.
    #[must_use]
    pub const fn main_box_id(&self) -> Uuid {
        self.main_box_id
    }

    /// Lists all cashboxes with their owners (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
    ) -> Result<Vec<(cash_boxes::Model, Option<users::Model>)>, CashBoxError> {
        let boxes = cash_boxes::Entity::find()
            .find_also_related(users::Entity)
            .order_by_asc(cash_boxes::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(boxes)
    }

    /// Lists the cashboxes owned by one agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<cash_boxes::Model>, CashBoxError> {
        let boxes = cash_boxes::Entity::find()
            .filter(cash_boxes::Column::OwnerId.eq(owner_id))
            .order_by_asc(cash_boxes::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(boxes)
    }

    /// Gets a cashbox with its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the box does not exist.
    pub async fn get_with_owner(
        &self,
        id: Uuid,
    ) -> Result<(cash_boxes::Model, Option<users::Model>), CashBoxError> {
        cash_boxes::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?
            .ok_or(CashBoxError::NotFound(id))
    }

    /// Creates a sub cashbox linked to the main box with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the designated owner does not exist.
    pub async fn create_sub(
        &self,
        input: CreateCashBoxInput,
    ) -> Result<cash_boxes::Model, CashBoxError> {
        users::Entity::find_by_id(input.owner_id)
            .one(&self.db)
            .await?
            .ok_or(CashBoxError::OwnerNotFound(input.owner_id))?;

        let now = Utc::now().into();
        let cash_box = cash_boxes::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(CashBoxKind::Sub),
            owner_id: Set(input.owner_id),
            parent_cashbox_id: Set(Some(self.main_box_id)),
            balance: Set(Decimal::ZERO),
            daily_limit: Set(input.daily_limit),
            status: Set("active".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = cash_box.insert(&self.db).await?;
        info!(cashbox_id = %created.id, owner_id = %created.owner_id, "Created sub cashbox");
        Ok(created)
    }

    /// Executes a direct fund operation.
    ///
    /// Runs as a single atomic scope: lock the boxes involved, plan the
    /// movement via the transfer engine, write the new balances, and record
    /// one approved transaction (plus media rows). Either everything lands
    /// or nothing does.
    ///
    /// # Errors
    ///
    /// * `NotFound` / `MainBoxMissing` for unknown boxes
    /// * `WithdrawalTypeNotFound` for an unknown withdrawal type
    /// * `Transfer` for non-positive amounts or insufficient funds
    pub async fn fund(&self, input: FundInput) -> Result<FundOutcome, CashBoxError> {
        if let Some(withdrawal_type_id) = input.withdrawal_type_id {
            withdrawal_types::Entity::find_by_id(withdrawal_type_id)
                .one(&self.db)
                .await?
                .ok_or(CashBoxError::WithdrawalTypeNotFound(withdrawal_type_id))?;
        }

        let txn = self.db.begin().await?;

        let outcome = if input.cashbox_id == self.main_box_id {
            Self::fund_external(&txn, self.main_box_id, &input).await?
        } else {
            Self::fund_sub(&txn, self.main_box_id, &input).await?
        };

        txn.commit().await?;

        info!(
            transaction_id = %outcome.transaction.id,
            cashbox_id = %input.cashbox_id,
            amount = %input.amount,
            direction = %input.direction,
            "Direct fund operation recorded"
        );

        Ok(outcome)
    }

    /// External operation on the main box itself: funds cross the system
    /// boundary, so only the main balance changes.
    async fn fund_external(
        txn: &DatabaseTransaction,
        main_box_id: Uuid,
        input: &FundInput,
    ) -> Result<FundOutcome, CashBoxError> {
        let main = lock_box(txn, main_box_id)
            .await?
            .ok_or(CashBoxError::MainBoxMissing)?;

        let plan = TransferEngine::plan_external(main.balance, input.amount, input.direction)?;

        write_balance(txn, main, plan.main_after).await?;

        let transaction =
            insert_resolved_transaction(txn, input, plan.snapshot.before, plan.snapshot.after)
                .await?;
        insert_media(txn, transaction.id, &input.image_urls).await?;

        Ok(FundOutcome {
            transaction,
            box_balance: plan.main_after,
            main_balance: plan.main_after,
        })
    }

    /// Transfer between main and a sub box: funds are conserved in the tree.
    async fn fund_sub(
        txn: &DatabaseTransaction,
        main_box_id: Uuid,
        input: &FundInput,
    ) -> Result<FundOutcome, CashBoxError> {
        // Lock ordering: main first, then the sub box. Every balance scope
        // follows the same order.
        let main = lock_box(txn, main_box_id)
            .await?
            .ok_or(CashBoxError::MainBoxMissing)?;
        let sub = lock_box(txn, input.cashbox_id)
            .await?
            .ok_or(CashBoxError::NotFound(input.cashbox_id))?;

        let plan =
            TransferEngine::plan_funding(main.balance, sub.balance, input.amount, input.direction)?;

        write_balance(txn, main, plan.main_after).await?;
        write_balance(txn, sub, plan.sub_after).await?;

        let transaction =
            insert_resolved_transaction(txn, input, plan.snapshot.before, plan.snapshot.after)
                .await?;
        insert_media(txn, transaction.id, &input.image_urls).await?;

        Ok(FundOutcome {
            transaction,
            box_balance: plan.sub_after,
            main_balance: plan.main_after,
        })
    }
}

/// Loads a cashbox row under `SELECT ... FOR UPDATE`.
pub(crate) async fn lock_box(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<Option<cash_boxes::Model>, DbErr> {
    cash_boxes::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await
}

/// Writes a new balance for a locked cashbox row.
pub(crate) async fn write_balance(
    txn: &DatabaseTransaction,
    cash_box: cash_boxes::Model,
    balance: Decimal,
) -> Result<(), DbErr> {
    let mut active: cash_boxes::ActiveModel = cash_box.into();
    active.balance = Set(balance);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

/// Inserts the pre-approved transaction row for a direct fund operation.
async fn insert_resolved_transaction(
    txn: &DatabaseTransaction,
    input: &FundInput,
    balance_before: Decimal,
    balance_after: Decimal,
) -> Result<transactions::Model, DbErr> {
    let now = Utc::now().into();
    let transaction = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        cashbox_id: Set(input.cashbox_id),
        kind: Set(input.direction.into()),
        amount: Set(input.amount),
        balance_before: Set(balance_before),
        balance_after: Set(balance_after),
        status: Set(TransactionStatus::Approved),
        reason: Set(None),
        created_by: Set(input.created_by),
        approved_by: Set(Some(input.created_by)),
        withdrawal_type_id: Set(input.withdrawal_type_id),
        account_number: Set(input.account_number.clone()),
        phone_number: Set(input.phone_number.clone()),
        notes: Set(input.notes.clone()),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    transaction.insert(txn).await
}

/// Inserts media pointer rows for stored proof images.
pub(crate) async fn insert_media(
    txn: &DatabaseTransaction,
    transaction_id: Uuid,
    image_urls: &[String],
) -> Result<Vec<transaction_media::Model>, DbErr> {
    let mut media = Vec::with_capacity(image_urls.len());
    for url in image_urls {
        let row = transaction_media::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_id: Set(transaction_id),
            image_url: Set(url.clone()),
            created_at: Set(Utc::now().into()),
        };
        media.push(row.insert(txn).await?);
    }
    Ok(media)
}

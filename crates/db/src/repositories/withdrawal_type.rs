//! Withdrawal type lookup table repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{transactions, withdrawal_types};

/// Error types for withdrawal type operations.
#[derive(Debug, thiserror::Error)]
pub enum WithdrawalTypeError {
    /// Withdrawal type not found.
    #[error("Withdrawal type not found: {0}")]
    NotFound(Uuid),

    /// A withdrawal type with this name already exists.
    #[error("Withdrawal type already exists: {0}")]
    DuplicateName(String),

    /// The type is referenced by transactions and cannot be removed.
    #[error("Withdrawal type is in use")]
    InUse,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Withdrawal type repository.
#[derive(Debug, Clone)]
pub struct WithdrawalTypeRepository {
    db: DatabaseConnection,
}

impl WithdrawalTypeRepository {
    /// Creates a new withdrawal type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all withdrawal types, name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<withdrawal_types::Model>, WithdrawalTypeError> {
        let types = withdrawal_types::Entity::find()
            .order_by_asc(withdrawal_types::Column::Name)
            .all(&self.db)
            .await?;
        Ok(types)
    }

    /// Gets one withdrawal type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the type does not exist.
    pub async fn get(&self, id: Uuid) -> Result<withdrawal_types::Model, WithdrawalTypeError> {
        withdrawal_types::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(WithdrawalTypeError::NotFound(id))
    }

    /// Creates a withdrawal type.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is already taken.
    pub async fn create(&self, name: &str) -> Result<withdrawal_types::Model, WithdrawalTypeError> {
        self.ensure_name_free(name, None).await?;

        let now = Utc::now().into();
        let created = withdrawal_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(created)
    }

    /// Renames or toggles a withdrawal type.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the type does not exist
    /// * `DuplicateName` if the new name is already taken
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<withdrawal_types::Model, WithdrawalTypeError> {
        let existing = self.get(id).await?;

        if let Some(name) = name {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let mut active: withdrawal_types::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name.to_string());
        }
        if let Some(is_active) = is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a withdrawal type that no transaction references.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the type does not exist
    /// * `InUse` if any transaction references it
    pub async fn delete(&self, id: Uuid) -> Result<(), WithdrawalTypeError> {
        let existing = self.get(id).await?;

        let referenced = transactions::Entity::find()
            .filter(transactions::Column::WithdrawalTypeId.eq(id))
            .count(&self.db)
            .await?;
        if referenced > 0 {
            return Err(WithdrawalTypeError::InUse);
        }

        withdrawal_types::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<(), WithdrawalTypeError> {
        let mut query = withdrawal_types::Entity::find()
            .filter(withdrawal_types::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(withdrawal_types::Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(WithdrawalTypeError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

//! Append-only audit log repository.
//!
//! Writes happen inside the same database transaction as the decision they
//! record, so an approval can never land without its audit entry. The table
//! itself rejects updates and deletes via a trigger.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use caisse_core::audit::AuditRecord;

use crate::entities::audit_logs;

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a record on the given connection.
    ///
    /// Takes any connection so callers can append inside their own
    /// database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        record: &AuditRecord,
    ) -> Result<audit_logs::Model, DbErr> {
        audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(record.actor),
            action: Set(record.action.as_str().to_string()),
            entity: Set(record.entity.to_string()),
            entity_id: Set(record.entity_id),
            metadata: Set(record.metadata.clone()),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await
    }

    /// Lists the audit trail of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_entity(
        &self,
        entity: &str,
        entity_id: Uuid,
    ) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .filter(audit_logs::Column::Entity.eq(entity))
            .filter(audit_logs::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_logs::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

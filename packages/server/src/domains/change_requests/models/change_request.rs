//! ChangeRequest model - one proposed create/update/delete of a dictionary entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgExecutor;
use sqlx::PgConnection;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use super::{Action, EntityKind, RequestStatus};
use crate::common::{ChangeRequestId, MemberId, ValidatedPaginationArgs};
use crate::domains::change_requests::error::{ChangeRequestError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChangeRequest {
    pub id: ChangeRequestId,
    pub requester_id: MemberId,
    pub entity_kind: EntityKind,
    pub action: Action,
    pub target_entity_id: Option<Uuid>,
    /// Changed fields only, keyed by field name.
    pub payload: Value,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub resolution_note: Option<String>,
    pub result_entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolver_id: Option<MemberId>,
}

/// Input for persisting a new (always pending) request
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewChangeRequest {
    pub requester_id: MemberId,
    pub entity_kind: EntityKind,
    pub action: Action,
    #[builder(default, setter(strip_option))]
    pub target_entity_id: Option<Uuid>,
    #[builder(default = Value::Object(Default::default()))]
    pub payload: Value,
    #[builder(default, setter(strip_option, into))]
    pub reason: Option<String>,
}

/// Optional filters for the pending queue
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PendingFilter {
    pub entity_kind: Option<EntityKind>,
    pub action: Option<Action>,
}

impl ChangeRequest {
    /// Checks the target/action pairing before any handler runs.
    ///
    /// A create must not name a target. An update or delete without one has
    /// nothing to act on and is reported as NotFound.
    pub fn ensure_well_formed(&self) -> Result<()> {
        match (self.action, self.target_entity_id) {
            (Action::Create, Some(target)) => Err(ChangeRequestError::Validation(format!(
                "create request {} must not name a target entity (got {})",
                self.id, target
            ))),
            (Action::Update | Action::Delete, None) => Err(ChangeRequestError::NotFound(format!(
                "{} request {} has no target {}",
                self.action, self.id, self.entity_kind
            ))),
            _ => Ok(()),
        }
    }

    pub fn ensure_pending(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(ChangeRequestError::Conflict(format!(
                "change request {} is already {}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    pub async fn create<'e, E: PgExecutor<'e>>(input: NewChangeRequest, db: E) -> sqlx::Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO change_requests
                (id, requester_id, entity_kind, action, target_entity_id, payload, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(ChangeRequestId::new())
        .bind(input.requester_id)
        .bind(input.entity_kind)
        .bind(input.action)
        .bind(input.target_entity_id)
        .bind(&input.payload)
        .bind(&input.reason)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        id: ChangeRequestId,
        db: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM change_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Loads a request and holds its row lock until the transaction ends.
    pub async fn lock(id: ChangeRequestId, conn: &mut PgConnection) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM change_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Flips a pending request to approved. `None` if it is no longer pending.
    pub async fn mark_approved(
        id: ChangeRequestId,
        resolver_id: MemberId,
        result_entity_id: Uuid,
        conn: &mut PgConnection,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE change_requests
            SET status = 'approved', resolver_id = $2, result_entity_id = $3, resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resolver_id)
        .bind(result_entity_id)
        .fetch_optional(conn)
        .await
    }

    /// Flips a pending request to rejected. `None` if it is no longer pending.
    pub async fn mark_rejected<'e, E: PgExecutor<'e>>(
        id: ChangeRequestId,
        resolver_id: MemberId,
        note: Option<&str>,
        db: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE change_requests
            SET status = 'rejected', resolver_id = $2, resolution_note = $3, resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resolver_id)
        .bind(note)
        .fetch_optional(db)
        .await
    }

    /// Withdraws a pending request on behalf of its requester.
    ///
    /// `None` if it is no longer pending or belongs to someone else.
    pub async fn mark_cancelled<'e, E: PgExecutor<'e>>(
        id: ChangeRequestId,
        requester_id: MemberId,
        db: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE change_requests
            SET status = 'cancelled', resolver_id = $2, resolved_at = NOW()
            WHERE id = $1 AND requester_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .fetch_optional(db)
        .await
    }

    /// Pending requests, oldest first, after the cursor.
    pub async fn find_pending_page<'e, E: PgExecutor<'e>>(
        filter: PendingFilter,
        args: &ValidatedPaginationArgs,
        db: E,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM change_requests
            WHERE status = 'pending'
              AND ($1::text IS NULL OR entity_kind = $1)
              AND ($2::text IS NULL OR action = $2)
              AND ($3::uuid IS NULL OR id > $3)
            ORDER BY id ASC
            LIMIT $4
            "#,
        )
        .bind(filter.entity_kind)
        .bind(filter.action)
        .bind(args.cursor)
        .bind(args.fetch_limit())
        .fetch_all(db)
        .await
    }

    /// Every request that targets the entity or produced it.
    pub async fn find_for_entity<'e, E: PgExecutor<'e>>(
        entity_id: Uuid,
        db: E,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM change_requests
            WHERE target_entity_id = $1 OR result_entity_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(entity_id)
        .fetch_all(db)
        .await
    }

    pub async fn count_pending<'e, E: PgExecutor<'e>>(db: E) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM change_requests WHERE status = 'pending'")
            .fetch_one(db)
            .await
    }
}

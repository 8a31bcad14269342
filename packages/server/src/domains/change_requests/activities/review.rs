//! Resolving change requests: approve, reject, cancel.
//!
//! Each resolution is one database transaction. Approval applies the content
//! mutation and flips the status in the same transaction, so either both land
//! or neither does and the request stays pending.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::common::{ChangeRequestId, MemberId};
use crate::domains::change_requests::error::{ChangeRequestError, Result};
use crate::domains::change_requests::handlers::HandlerRegistry;
use crate::domains::change_requests::models::ChangeRequest;

/// Approve a pending request, applying it through its registered handler.
pub async fn approve_request(
    request_id: ChangeRequestId,
    admin_id: MemberId,
    registry: &HandlerRegistry,
    pool: &PgPool,
) -> Result<ChangeRequest> {
    let mut tx = pool.begin().await?;

    match apply_and_approve(request_id, admin_id, registry, &mut *tx).await {
        Ok(approved) => {
            tx.commit().await?;
            info!(
                request_id = %approved.id,
                entity_kind = %approved.entity_kind,
                action = %approved.action,
                admin_id = %admin_id,
                result_entity_id = ?approved.result_entity_id,
                "Change request approved"
            );
            Ok(approved)
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(request_id = %request_id, error = %rollback_error, "Rollback failed");
            }
            warn!(request_id = %request_id, error = %e, "Change request approval rolled back");
            Err(e)
        }
    }
}

async fn apply_and_approve(
    request_id: ChangeRequestId,
    admin_id: MemberId,
    registry: &HandlerRegistry,
    conn: &mut PgConnection,
) -> Result<ChangeRequest> {
    let request = ChangeRequest::lock(request_id, &mut *conn)
        .await?
        .ok_or_else(|| not_found(request_id))?;

    request.ensure_pending()?;
    request.ensure_well_formed()?;

    let handler = registry
        .get(request.entity_kind, request.action)
        .ok_or(ChangeRequestError::Configuration {
            entity_kind: request.entity_kind,
            action: request.action,
        })?;

    let applied = handler.handle(&mut *conn, &request).await?;

    ChangeRequest::mark_approved(request_id, admin_id, applied.entity_id, conn)
        .await?
        .ok_or_else(|| already_resolved(request_id))
}

/// Reject a pending request. Touches only the request row.
pub async fn reject_request(
    request_id: ChangeRequestId,
    admin_id: MemberId,
    reason: Option<&str>,
    pool: &PgPool,
) -> Result<ChangeRequest> {
    let note = reason.map(str::trim).filter(|note| !note.is_empty());

    let Some(rejected) = ChangeRequest::mark_rejected(request_id, admin_id, note, pool).await? else {
        return Err(diagnose_unresolvable(request_id, None, pool).await?);
    };

    info!(
        request_id = %rejected.id,
        entity_kind = %rejected.entity_kind,
        action = %rejected.action,
        admin_id = %admin_id,
        "Change request rejected"
    );

    Ok(rejected)
}

/// Withdraw a pending request. Only its requester may do so.
pub async fn cancel_request(
    request_id: ChangeRequestId,
    requester_id: MemberId,
    pool: &PgPool,
) -> Result<ChangeRequest> {
    let Some(cancelled) = ChangeRequest::mark_cancelled(request_id, requester_id, pool).await?
    else {
        return Err(diagnose_unresolvable(request_id, Some(requester_id), pool).await?);
    };

    info!(
        request_id = %cancelled.id,
        entity_kind = %cancelled.entity_kind,
        requester_id = %requester_id,
        "Change request cancelled"
    );

    Ok(cancelled)
}

/// Explains why a guarded status update matched no row.
async fn diagnose_unresolvable(
    request_id: ChangeRequestId,
    requester_id: Option<MemberId>,
    pool: &PgPool,
) -> Result<ChangeRequestError> {
    let Some(request) = ChangeRequest::find_by_id(request_id, pool).await? else {
        return Ok(not_found(request_id));
    };

    if let Some(requester_id) = requester_id {
        if request.requester_id != requester_id {
            return Ok(ChangeRequestError::PermissionDenied(format!(
                "change request {} belongs to another member",
                request_id
            )));
        }
    }

    Ok(match request.ensure_pending() {
        Err(conflict) => conflict,
        Ok(()) => already_resolved(request_id),
    })
}

fn not_found(request_id: ChangeRequestId) -> ChangeRequestError {
    ChangeRequestError::NotFound(format!("change request {} does not exist", request_id))
}

fn already_resolved(request_id: ChangeRequestId) -> ChangeRequestError {
    ChangeRequestError::Conflict(format!("change request {} is no longer pending", request_id))
}

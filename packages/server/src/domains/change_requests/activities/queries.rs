use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{ChangeRequestId, Page, PaginationArgs};
use crate::domains::change_requests::error::{ChangeRequestError, Result};
use crate::domains::change_requests::models::{ChangeRequest, PendingFilter};

/// Pending requests, oldest first, one page at a time.
pub async fn list_pending_requests(
    filter: PendingFilter,
    args: &PaginationArgs,
    pool: &PgPool,
) -> Result<Page<ChangeRequest>> {
    let validated = args
        .validate()
        .map_err(|e| ChangeRequestError::Validation(e.to_string()))?;

    let rows = ChangeRequest::find_pending_page(filter, &validated, pool).await?;
    Ok(Page::from_rows(rows, &validated, |request| request.id.into_uuid()))
}

pub async fn get_request(request_id: ChangeRequestId, pool: &PgPool) -> Result<ChangeRequest> {
    ChangeRequest::find_by_id(request_id, pool)
        .await?
        .ok_or_else(|| {
            ChangeRequestError::NotFound(format!("change request {} does not exist", request_id))
        })
}

/// Every request that targeted the entity or produced it.
pub async fn list_requests_for_entity(entity_id: Uuid, pool: &PgPool) -> Result<Vec<ChangeRequest>> {
    Ok(ChangeRequest::find_for_entity(entity_id, pool).await?)
}

pub async fn count_pending_requests(pool: &PgPool) -> Result<i64> {
    Ok(ChangeRequest::count_pending(pool).await?)
}

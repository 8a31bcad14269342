//! Change request endpoints. A transport adapter over the domain activities;
//! actor ids arrive in request bodies and are trusted as given.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{ChangeRequestId, MemberId, Page, PaginationArgs};
use crate::domains::change_requests::{
    self, Action, ChangeRequest, ChangeRequestError, EntityKind, NewChangeRequest, PendingFilter,
};
use crate::server::app::AppState;

impl IntoResponse for ChangeRequestError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChangeRequestError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChangeRequestError::NotFound(_) => StatusCode::NOT_FOUND,
            ChangeRequestError::Conflict(_) => StatusCode::CONFLICT,
            ChangeRequestError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ChangeRequestError::Configuration { .. } => StatusCode::NOT_IMPLEMENTED,
            ChangeRequestError::Internal(_) | ChangeRequestError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Change request operation failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ChangeRequestError>;

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub requester_id: MemberId,
    pub entity_kind: EntityKind,
    pub action: Action,
    #[serde(default)]
    pub target_entity_id: Option<Uuid>,
    #[serde(default = "empty_object")]
    pub payload: Value,
    #[serde(default)]
    pub reason: Option<String>,
}

fn empty_object() -> Value {
    json!({})
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub entity_kind: Option<EntityKind>,
    pub action: Option<Action>,
    pub first: Option<i32>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub admin_id: MemberId,
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub admin_id: MemberId,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    pub requester_id: MemberId,
}

pub async fn submit_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<SubmitBody>,
) -> ApiResult<(StatusCode, Json<ChangeRequest>)> {
    let input = NewChangeRequest {
        requester_id: body.requester_id,
        entity_kind: body.entity_kind,
        action: body.action,
        target_entity_id: body.target_entity_id,
        payload: body.payload,
        reason: body.reason,
    };
    let request = change_requests::submit_request(input, &state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_pending_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<PendingQuery>,
) -> ApiResult<Json<Page<ChangeRequest>>> {
    let filter = PendingFilter {
        entity_kind: query.entity_kind,
        action: query.action,
    };
    let args = PaginationArgs {
        first: query.first,
        after: query.after,
    };
    let page = change_requests::list_pending_requests(filter, &args, &state.db_pool).await?;
    Ok(Json(page))
}

pub async fn pending_count_handler(Extension(state): Extension<AppState>) -> ApiResult<Json<Value>> {
    let pending = change_requests::count_pending_requests(&state.db_pool).await?;
    Ok(Json(json!({ "pending": pending })))
}

pub async fn get_request_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<ChangeRequestId>,
) -> ApiResult<Json<ChangeRequest>> {
    Ok(Json(change_requests::get_request(id, &state.db_pool).await?))
}

pub async fn list_for_entity_handler(
    Extension(state): Extension<AppState>,
    Path(entity_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ChangeRequest>>> {
    let requests = change_requests::list_requests_for_entity(entity_id, &state.db_pool).await?;
    Ok(Json(requests))
}

pub async fn approve_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<ChangeRequestId>,
    Json(body): Json<ApproveBody>,
) -> ApiResult<Json<ChangeRequest>> {
    let approved =
        change_requests::approve_request(id, body.admin_id, state.registry, &state.db_pool).await?;
    Ok(Json(approved))
}

pub async fn reject_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<ChangeRequestId>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<ChangeRequest>> {
    let rejected = change_requests::reject_request(
        id,
        body.admin_id,
        body.reason.as_deref(),
        &state.db_pool,
    )
    .await?;
    Ok(Json(rejected))
}

pub async fn cancel_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<ChangeRequestId>,
    Json(body): Json<CancelBody>,
) -> ApiResult<Json<ChangeRequest>> {
    let cancelled = change_requests::cancel_request(id, body.requester_id, &state.db_pool).await?;
    Ok(Json(cancelled))
}

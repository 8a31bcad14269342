use sqlx::PgPool;
use tracing::info;

use crate::domains::change_requests::error::{ChangeRequestError, Result};
use crate::domains::change_requests::models::{Action, ChangeRequest, NewChangeRequest};

/// Persist a new pending request.
///
/// The caller has already reduced the payload to the fields that differ from
/// the current entity; this only checks the request's shape.
pub async fn submit_request(input: NewChangeRequest, pool: &PgPool) -> Result<ChangeRequest> {
    check_shape(&input)?;

    let request = ChangeRequest::create(input, pool).await?;

    info!(
        request_id = %request.id,
        entity_kind = %request.entity_kind,
        action = %request.action,
        requester_id = %request.requester_id,
        "Change request submitted"
    );

    Ok(request)
}

pub fn check_shape(input: &NewChangeRequest) -> Result<()> {
    match (input.action, input.target_entity_id) {
        (Action::Create, Some(_)) => {
            return Err(ChangeRequestError::Validation(
                "create requests must not name a target entity".to_string(),
            ))
        }
        (Action::Update | Action::Delete, None) => {
            return Err(ChangeRequestError::Validation(format!(
                "{} requests must name a target entity",
                input.action
            )))
        }
        _ => {}
    }

    let fields = input.payload.as_object().ok_or_else(|| {
        ChangeRequestError::Validation("payload must be a JSON object".to_string())
    })?;

    if input.action == Action::Update && fields.is_empty() {
        return Err(ChangeRequestError::Validation(
            "update payload has no changed fields".to_string(),
        ));
    }

    Ok(())
}

//! Test fixtures for creating test data.
//!
//! Requests go through the same activities the server uses. Dictionary rows
//! that a test only needs as scenery are inserted through the models.

use dictionary_core::common::{ChangeRequestId, MemberId, WordId};
use dictionary_core::domains::change_requests::{
    self, Action, ChangeRequest, ChangeRequestError, EntityKind, HandlerRegistry,
    NewChangeRequest,
};
use dictionary_core::domains::dictionary::{Meaning, NewWord, Vocabulary, Word};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// A label no other test will use. The database is shared between tests.
pub fn unique(label: &str) -> String {
    format!("{}-{}", label, Uuid::new_v4().simple())
}

/// Submit a request through the validated entry point.
pub async fn submit(
    pool: &PgPool,
    entity_kind: EntityKind,
    action: Action,
    target_entity_id: Option<Uuid>,
    payload: Value,
) -> ChangeRequest {
    let input = NewChangeRequest {
        requester_id: MemberId::new(),
        entity_kind,
        action,
        target_entity_id,
        payload,
        reason: None,
    };
    change_requests::submit_request(input, pool)
        .await
        .expect("Failed to submit change request")
}

pub async fn submit_create(pool: &PgPool, entity_kind: EntityKind, payload: Value) -> ChangeRequest {
    submit(pool, entity_kind, Action::Create, None, payload).await
}

pub async fn submit_update(
    pool: &PgPool,
    entity_kind: EntityKind,
    target: impl Into<Uuid>,
    payload: Value,
) -> ChangeRequest {
    submit(pool, entity_kind, Action::Update, Some(target.into()), payload).await
}

pub async fn submit_delete(
    pool: &PgPool,
    entity_kind: EntityKind,
    target: impl Into<Uuid>,
) -> ChangeRequest {
    submit(pool, entity_kind, Action::Delete, Some(target.into()), serde_json::json!({})).await
}

/// Persist a request without the shape checks, as a misbehaving writer might.
pub async fn insert_unchecked(
    pool: &PgPool,
    entity_kind: EntityKind,
    action: Action,
    target_entity_id: Option<Uuid>,
    payload: Value,
) -> ChangeRequest {
    let input = NewChangeRequest {
        requester_id: MemberId::new(),
        entity_kind,
        action,
        target_entity_id,
        payload,
        reason: None,
    };
    ChangeRequest::create(input, pool)
        .await
        .expect("Failed to insert change request")
}

/// Approve with the standard registry and a fresh admin id.
pub async fn approve(pool: &PgPool, id: ChangeRequestId) -> Result<ChangeRequest, ChangeRequestError> {
    change_requests::approve_request(id, MemberId::new(), HandlerRegistry::global(), pool).await
}

pub async fn approve_ok(pool: &PgPool, id: ChangeRequestId) -> ChangeRequest {
    approve(pool, id).await.expect("Approval should succeed")
}

pub async fn reload(pool: &PgPool, id: ChangeRequestId) -> ChangeRequest {
    ChangeRequest::find_by_id(id, pool)
        .await
        .expect("Failed to load change request")
        .expect("Change request should exist")
}

/// Insert a bare word directly.
pub async fn insert_word(pool: &PgPool, name: &str) -> Word {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Word::insert(
        NewWord {
            name: name.to_string(),
            root_id: None,
            origin: Some("Arabic".to_string()),
            prefix: None,
            suffix: Some("-lik".to_string()),
        },
        &mut conn,
    )
    .await
    .expect("Failed to insert word")
}

pub async fn insert_meaning(pool: &PgPool, word_id: WordId, text: &str) -> Meaning {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Meaning::insert(word_id, text, None, 0, &mut conn)
        .await
        .expect("Failed to insert meaning")
}

pub async fn insert_vocabulary(pool: &PgPool, vocabulary: Vocabulary, label: &str) -> Uuid {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    vocabulary
        .find_or_insert(label, &mut conn)
        .await
        .expect("Failed to insert vocabulary row")
}

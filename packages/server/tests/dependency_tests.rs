//! Integration tests for attribute references that point at other requests.

mod common;

use crate::common::*;
use dictionary_core::common::{ChangeRequestId, MeaningId, MemberId, WordId};
use dictionary_core::domains::change_requests::{
    self, ChangeRequestError, EntityKind, RequestStatus,
};
use dictionary_core::domains::dictionary::{Meaning, Vocabulary, Word};
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_pending_reference_materializes_once(ctx: &TestHarness) {
    let existing = insert_vocabulary(&ctx.db_pool, Vocabulary::WordAttribute, &unique("colloquial")).await;
    let slang = unique("slang");
    let dependency =
        submit_create(&ctx.db_pool, EntityKind::WordAttribute, json!({ "attribute": slang })).await;

    let consumer = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({
            "name": unique("lan"),
            "attributes": [
                { "resolved": existing },
                { "pending_on": dependency.id },
                { "pending_on": dependency.id },
            ],
        }),
    )
    .await;

    let approved = approve_ok(&ctx.db_pool, consumer.id).await;
    let word_id = WordId::from_uuid(approved.result_entity_id.unwrap());

    assert_eq!(Vocabulary::WordAttribute.count_label(&slang, &ctx.db_pool).await.unwrap(), 1);
    let slang_id = Vocabulary::WordAttribute
        .find_by_label(&slang, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();

    let mut linked: Vec<_> = Word::attribute_ids(word_id, &ctx.db_pool)
        .await
        .unwrap()
        .into_iter()
        .map(|id| id.into_uuid())
        .collect();
    linked.sort();
    let mut expected = vec![existing, slang_id];
    expected.sort();
    assert_eq!(linked, expected);

    // The dependency is materialized but not resolved.
    assert_eq!(reload(&ctx.db_pool, dependency.id).await.status, RequestStatus::Pending);

    // Approving it later adopts the same row.
    let dependency = approve_ok(&ctx.db_pool, dependency.id).await;
    assert_eq!(dependency.result_entity_id, Some(slang_id));
    assert_eq!(Vocabulary::WordAttribute.count_label(&slang, &ctx.db_pool).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approved_dependency_is_reused_end_to_end(ctx: &TestHarness) {
    let label = unique("noun-ish");
    let name = unique("kalem");
    let a = submit_create(&ctx.db_pool, EntityKind::WordAttribute, json!({ "attribute": label })).await;
    let b = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({
            "name": name,
            "meanings": [{ "meaning": "a writing instrument" }],
            "attributes": [{ "pending_on": a.id }],
        }),
    )
    .await;

    let a = approve_ok(&ctx.db_pool, a.id).await;
    let attribute_id = a.result_entity_id.expect("attribute created");

    let b = approve_ok(&ctx.db_pool, b.id).await;
    let word_id = WordId::from_uuid(b.result_entity_id.unwrap());

    let words = Word::find_by_name(&name, &ctx.db_pool).await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].id, word_id);
    assert_eq!(Meaning::find_by_word(word_id, &ctx.db_pool).await.unwrap().len(), 1);

    let linked = Word::attribute_ids(word_id, &ctx.db_pool).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].into_uuid(), attribute_id);
    assert_eq!(Vocabulary::WordAttribute.count_label(&label, &ctx.db_pool).await.unwrap(), 1);

    assert_eq!(reload(&ctx.db_pool, a.id).await.status, RequestStatus::Approved);
    assert_eq!(reload(&ctx.db_pool, b.id).await.status, RequestStatus::Approved);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn meaning_attributes_resolve_through_meaning_slot(ctx: &TestHarness) {
    let word = insert_word(&ctx.db_pool, &unique("ateş")).await;
    let label = unique("poetic");
    let dependency =
        submit_create(&ctx.db_pool, EntityKind::MeaningAttribute, json!({ "attribute": label })).await;

    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Meaning,
        json!({
            "word_id": word.id,
            "meaning": "passion",
            "attributes": [{ "pending_on": dependency.id }],
        }),
    )
    .await;
    let approved = approve_ok(&ctx.db_pool, request.id).await;

    let meaning_id = MeaningId::from_uuid(approved.result_entity_id.unwrap());
    let linked = Meaning::attribute_ids(meaning_id, &ctx.db_pool).await.unwrap();
    let label_id = Vocabulary::MeaningAttribute
        .find_by_label(&label, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(Some(linked[0].into_uuid()), label_id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reference_of_the_wrong_kind_fails_validation(ctx: &TestHarness) {
    let label = unique("meaning-only");
    let meaning_attribute =
        submit_create(&ctx.db_pool, EntityKind::MeaningAttribute, json!({ "attribute": label })).await;
    let name = unique("yanlış");

    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({ "name": name, "attributes": [{ "pending_on": meaning_attribute.id }] }),
    )
    .await;
    let result = approve(&ctx.db_pool, request.id).await;

    assert!(matches!(result, Err(ChangeRequestError::Validation(_))), "{:?}", result);
    assert!(Word::find_by_name(&name, &ctx.db_pool).await.unwrap().is_empty());
    assert_eq!(Vocabulary::MeaningAttribute.count_label(&label, &ctx.db_pool).await.unwrap(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reference_to_a_non_create_request_fails_validation(ctx: &TestHarness) {
    let attribute = insert_vocabulary(&ctx.db_pool, Vocabulary::WordAttribute, &unique("rare")).await;
    let rename = submit_update(
        &ctx.db_pool,
        EntityKind::WordAttribute,
        attribute,
        json!({ "attribute": unique("scarce") }),
    )
    .await;

    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({ "name": unique("nadir"), "attributes": [{ "pending_on": rename.id }] }),
    )
    .await;
    let result = approve(&ctx.db_pool, request.id).await;

    assert!(matches!(result, Err(ChangeRequestError::Validation(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_dependency_fails_validation(ctx: &TestHarness) {
    let label = unique("discarded");
    let dependency =
        submit_create(&ctx.db_pool, EntityKind::WordAttribute, json!({ "attribute": label })).await;
    change_requests::reject_request(dependency.id, MemberId::new(), Some("duplicate"), &ctx.db_pool)
        .await
        .unwrap();

    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({ "name": unique("atık"), "attributes": [{ "pending_on": dependency.id }] }),
    )
    .await;
    let result = approve(&ctx.db_pool, request.id).await;

    assert!(matches!(result, Err(ChangeRequestError::Validation(_))));
    assert_eq!(Vocabulary::WordAttribute.count_label(&label, &ctx.db_pool).await.unwrap(), 0);
    assert_eq!(reload(&ctx.db_pool, request.id).await.status, RequestStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn dangling_reference_fails_not_found(ctx: &TestHarness) {
    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({ "name": unique("hayal"), "attributes": [{ "pending_on": ChangeRequestId::new() }] }),
    )
    .await;

    let result = approve(&ctx.db_pool, request.id).await;
    assert!(matches!(result, Err(ChangeRequestError::NotFound(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_consumer_does_not_leave_a_materialized_label(ctx: &TestHarness) {
    let label = unique("ephemeral");
    let dependency =
        submit_create(&ctx.db_pool, EntityKind::WordAttribute, json!({ "attribute": label })).await;

    // The relation insert fails after the dependency was materialized.
    let request = submit_create(
        &ctx.db_pool,
        EntityKind::Word,
        json!({
            "name": unique("geçici"),
            "attributes": [{ "pending_on": dependency.id }],
            "related_words": [WordId::new()],
        }),
    )
    .await;
    let result = approve(&ctx.db_pool, request.id).await;

    assert!(result.is_err());
    assert_eq!(Vocabulary::WordAttribute.count_label(&label, &ctx.db_pool).await.unwrap(), 0);
}

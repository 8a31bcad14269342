//! Forward references from one request's payload to the vocabulary entry
//! another, still unresolved, request proposes.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use super::error::{ChangeRequestError, Result};
use super::models::{Action, ChangeRequest, EntityKind, RequestStatus};
use super::payloads::{vocabulary_label, AttributeRef};
use crate::common::ChangeRequestId;
use crate::domains::dictionary::Vocabulary;

/// The attribute list a reference appears in, which fixes the vocabulary it
/// may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSlot {
    Word,
    Meaning,
}

impl AttributeSlot {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            AttributeSlot::Word => EntityKind::WordAttribute,
            AttributeSlot::Meaning => EntityKind::MeaningAttribute,
        }
    }

    pub fn vocabulary(self) -> Vocabulary {
        match self {
            AttributeSlot::Word => Vocabulary::WordAttribute,
            AttributeSlot::Meaning => Vocabulary::MeaningAttribute,
        }
    }
}

/// References split by kind, each side without duplicates.
#[derive(Debug, Default, PartialEq)]
pub struct PartitionedRefs {
    /// Literal ids in first-seen order.
    pub existing: Vec<Uuid>,
    /// Dependency request ids, sorted so concurrent approvals lock in one order.
    pub pending: Vec<ChangeRequestId>,
}

pub fn partition_refs(refs: &[AttributeRef]) -> PartitionedRefs {
    let mut partitioned = PartitionedRefs::default();
    for reference in refs {
        if let AttributeRef::Resolved(id) = *reference {
            if !partitioned.existing.contains(&id) {
                partitioned.existing.push(id);
            }
        }
    }
    partitioned.pending = pending_dependencies(refs);
    partitioned
}

/// Dependency request ids named anywhere in `refs`, sorted and deduplicated.
pub fn pending_dependencies<'a, I>(refs: I) -> Vec<ChangeRequestId>
where
    I: IntoIterator<Item = &'a AttributeRef>,
{
    let mut pending: Vec<ChangeRequestId> = refs
        .into_iter()
        .filter_map(|reference| match *reference {
            AttributeRef::PendingOn(request_id) => Some(request_id),
            AttributeRef::Resolved(_) => None,
        })
        .collect();
    pending.sort();
    pending.dedup();
    pending
}

/// Row-locks every dependency request a payload names, in id order.
///
/// Payloads with several attribute lists must call this before resolving any
/// of them. Missing requests are skipped here and reported by the resolver.
pub async fn lock_dependencies<'a, I>(refs: I, conn: &mut PgConnection) -> Result<()>
where
    I: IntoIterator<Item = &'a AttributeRef>,
{
    for request_id in pending_dependencies(refs) {
        ChangeRequest::lock(request_id, &mut *conn).await?;
    }
    Ok(())
}

/// Resolves an attribute list to concrete vocabulary ids, ready for linking.
///
/// Each dependency request is row-locked for the rest of the transaction.
/// A pending dependency has its label materialized (find-or-insert) but stays
/// pending; an approved one contributes the entity it produced.
pub async fn resolve_attribute_refs(
    slot: AttributeSlot,
    refs: &[AttributeRef],
    conn: &mut PgConnection,
) -> Result<Vec<Uuid>> {
    let PartitionedRefs { existing, pending } = partition_refs(refs);
    let mut resolved = existing;

    for request_id in pending {
        let id = resolve_dependency(slot, request_id, conn).await?;
        if !resolved.contains(&id) {
            resolved.push(id);
        }
    }

    Ok(resolved)
}

async fn resolve_dependency(
    slot: AttributeSlot,
    request_id: ChangeRequestId,
    conn: &mut PgConnection,
) -> Result<Uuid> {
    let dependency = ChangeRequest::lock(request_id, &mut *conn)
        .await?
        .ok_or_else(|| {
            ChangeRequestError::NotFound(format!("dependency request {} does not exist", request_id))
        })?;

    let expected = slot.entity_kind();
    if dependency.action != Action::Create || dependency.entity_kind != expected {
        return Err(ChangeRequestError::Validation(format!(
            "dependency request {} is a {} {}, expected a {} create",
            request_id, dependency.entity_kind, dependency.action, expected
        )));
    }

    match dependency.status {
        RequestStatus::Pending => {
            let vocabulary = slot.vocabulary();
            let label = vocabulary_label(&dependency.payload, vocabulary.column())?.ok_or_else(|| {
                ChangeRequestError::Validation(format!(
                    "dependency request {} has no `{}`",
                    request_id,
                    vocabulary.column()
                ))
            })?;
            let id = vocabulary.find_or_insert(&label, conn).await?;
            debug!(
                dependency_id = %request_id,
                entity_kind = %expected,
                label = %label,
                attribute_id = %id,
                "Materialized pending dependency"
            );
            Ok(id)
        }
        RequestStatus::Approved => dependency.result_entity_id.ok_or_else(|| {
            ChangeRequestError::Internal(format!(
                "approved dependency request {} has no result entity",
                request_id
            ))
        }),
        RequestStatus::Rejected | RequestStatus::Cancelled => {
            Err(ChangeRequestError::Validation(format!(
                "dependency request {} was {}",
                request_id, dependency.status
            )))
        }
    }
}

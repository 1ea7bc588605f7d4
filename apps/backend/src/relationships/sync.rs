//! Applies resolved mutations to storage.
//!
//! Callers run these inside one transaction; a failure part way leaves the
//! rollback to `with_txn`.

use sea_orm::ConnectionTrait;
use tracing::debug;

use super::diff::{self, Changes};
use super::error::RelationshipError;
use super::resolver::ResolvedMutation;
use crate::repos::relations;
use crate::schema::{RelationDescriptor, ResourceRef};
use crate::trace_ctx;

pub async fn apply<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    mutation: ResolvedMutation,
) -> Result<(), RelationshipError> {
    match mutation {
        ResolvedMutation::SetNull => set_to_one(conn, owner, rel, None).await,
        ResolvedMutation::SetOne(related) => set_to_one(conn, owner, rel, Some(related)).await,
        ResolvedMutation::Replace(desired) => replace(conn, owner, rel, &desired).await.map(|_| ()),
        ResolvedMutation::Add(members) => add(conn, owner, rel, &members).await.map(|_| ()),
        ResolvedMutation::Remove(members) => remove(conn, owner, rel, &members).await.map(|_| ()),
    }
}

async fn write<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    changes: &Changes,
) -> Result<(), RelationshipError> {
    relations::detach(conn, owner, rel, &changes.remove).await?;
    relations::attach(conn, owner, rel, &changes.add).await?;
    debug!(
        trace_id = %trace_ctx::trace_id(),
        owner = %owner,
        relation = rel.name,
        removed = changes.remove.len(),
        added = changes.add.len(),
        "Relationship synchronized"
    );
    Ok(())
}

/// Make the stored members of a to-many relation exactly `desired`.
///
/// Removals run before additions; members kept keep their stored order.
pub async fn replace<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    desired: &[ResourceRef],
) -> Result<Changes, RelationshipError> {
    let current = relations::related(conn, owner, rel).await?;
    let changes = diff::replace(&current, desired);
    write(conn, owner, rel, &changes).await?;
    Ok(changes)
}

/// Add members not already present.
pub async fn add<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<Changes, RelationshipError> {
    let current = relations::related(conn, owner, rel).await?;
    let changes = Changes {
        remove: Vec::new(),
        add: diff::missing(&current, members),
    };
    write(conn, owner, rel, &changes).await?;
    Ok(changes)
}

/// Remove members that are present; others are ignored.
pub async fn remove<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<Changes, RelationshipError> {
    let current = relations::related(conn, owner, rel).await?;
    let changes = Changes {
        remove: diff::present(&current, members),
        add: Vec::new(),
    };
    write(conn, owner, rel, &changes).await?;
    Ok(changes)
}

/// Point a to-one relation at `related`, or clear it.
pub async fn set_to_one<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    related: Option<ResourceRef>,
) -> Result<(), RelationshipError> {
    match related {
        Some(related) => relations::associate(conn, owner, rel, related).await?,
        None => {
            relations::dissociate(conn, owner, rel).await?;
        }
    }
    debug!(
        trace_id = %trace_ctx::trace_id(),
        owner = %owner,
        relation = rel.name,
        related = ?related,
        "To-one relationship set"
    );
    Ok(())
}

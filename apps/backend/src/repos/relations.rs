//! Relation repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::relations_sea as relations_adapter;
use crate::errors::domain::DomainError;
use crate::schema::{RelationDescriptor, ResourceRef};

pub async fn related<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
) -> Result<Vec<ResourceRef>, DomainError> {
    Ok(relations_adapter::related(conn, owner, rel).await?)
}

pub async fn attach<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<(), DomainError> {
    Ok(relations_adapter::attach(conn, owner, rel, members).await?)
}

pub async fn detach<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<u64, DomainError> {
    Ok(relations_adapter::detach(conn, owner, rel, members).await?)
}

pub async fn associate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    related: ResourceRef,
) -> Result<(), DomainError> {
    Ok(relations_adapter::associate(conn, owner, rel, related).await?)
}

pub async fn dissociate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
) -> Result<u64, DomainError> {
    Ok(relations_adapter::dissociate(conn, owner, rel).await?)
}

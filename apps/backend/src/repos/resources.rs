//! Resource repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::resources_sea::{self as resources_adapter, LoadCriteria, ResourceAttributes};
use crate::errors::domain::DomainError;
use crate::jsonapi::document::ResourceObject;
use crate::schema::{ResourceRef, ResourceType};

/// Storage key of the resource addressed on the wire by `route_id`.
pub async fn find_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ty: ResourceType,
    route_id: &str,
) -> Result<Option<i64>, DomainError> {
    Ok(resources_adapter::find_key(conn, ty, route_id).await?)
}

pub async fn load<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ty: ResourceType,
    keys: &[i64],
    criteria: &LoadCriteria<'_>,
) -> Result<Vec<(ResourceRef, ResourceObject)>, DomainError> {
    Ok(resources_adapter::load(conn, ty, keys, criteria).await?)
}

pub async fn load_refs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    refs: &[ResourceRef],
) -> Result<Vec<(ResourceRef, ResourceObject)>, DomainError> {
    Ok(resources_adapter::load_refs(conn, refs).await?)
}

pub async fn load_one<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    reference: ResourceRef,
) -> Result<Option<ResourceObject>, DomainError> {
    let mut loaded = load_refs(conn, &[reference]).await?;
    Ok(loaded.pop().map(|(_, object)| object))
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    attributes: ResourceAttributes,
) -> Result<i64, DomainError> {
    Ok(resources_adapter::insert(conn, attributes).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: i64,
    attributes: ResourceAttributes,
) -> Result<(), DomainError> {
    Ok(resources_adapter::update(conn, key, attributes).await?)
}

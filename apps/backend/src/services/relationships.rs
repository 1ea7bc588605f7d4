//! Relationship operations behind the JSON:API endpoints.

use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::jsonapi::document::{Document, RelationshipData, RelationshipDocument};
use crate::jsonapi::query::QueryParams;
use crate::relationships::{reader, resolver, sync, Operation, Owner, RelationshipError, StoredResources};
use crate::repos::resources;
use crate::schema::{relation, RelationDescriptor, ResourceRef, ResourceType};

/// Parse the `{type}` path segment.
pub fn resource_type(raw: &str) -> Result<ResourceType, AppError> {
    raw.parse::<ResourceType>().map_err(|_| {
        AppError::not_found(
            ErrorCode::ResourceTypeNotFound,
            format!("Resource type {raw} does not exist."),
        )
    })
}

/// Look up `name` on `ty`.
pub fn relation_of(ty: ResourceType, name: &str) -> Result<&'static RelationDescriptor, AppError> {
    relation(ty, name).ok_or_else(|| {
        AppError::from(RelationshipError::UnknownRelationship {
            ty: ty.to_string(),
            name: name.to_string(),
        })
    })
}

/// Storage reference of the resource addressed by the URL.
pub async fn locate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ty: ResourceType,
    route_id: &str,
) -> Result<ResourceRef, AppError> {
    match resources::find_key(conn, ty, route_id).await? {
        Some(key) => Ok(ResourceRef::new(ty, key)),
        None => Err(AppError::not_found(
            ErrorCode::ResourceNotFound,
            format!("Resource {ty} {route_id} does not exist."),
        )),
    }
}

/// Relationship domain service.
pub struct RelationshipService;

impl RelationshipService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `data` against `rel`, then write it. Nothing is written when
    /// resolution fails.
    pub async fn resolve_and_apply<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ResourceRef,
        rel: &RelationDescriptor,
        operation: Operation,
        data: &RelationshipData,
        pointer: &str,
    ) -> Result<(), AppError> {
        let mutation =
            resolver::resolve(&StoredResources(conn), owner.ty, rel, operation, data, pointer).await?;
        sync::apply(conn, owner, rel, mutation).await?;
        Ok(())
    }

    pub async fn read_relationship<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: Owner<'_>,
        rel: &RelationDescriptor,
        query: &QueryParams,
    ) -> Result<RelationshipDocument, AppError> {
        Ok(reader::read_relationship(conn, owner, rel, query).await?)
    }

    pub async fn read_related<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: Owner<'_>,
        rel: &RelationDescriptor,
        query: &QueryParams,
    ) -> Result<Document, AppError> {
        Ok(reader::read_related(conn, owner, rel, query).await?)
    }
}

impl Default for RelationshipService {
    fn default() -> Self {
        Self::new()
    }
}

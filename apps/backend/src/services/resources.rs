//! Resource create/update/read carrying relationships.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::resources_sea::ResourceAttributes;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::jsonapi::document::{Document, ErrorSource, IncomingResource};
use crate::jsonapi::query::QueryParams;
use crate::relationships::{reader, resolver, sync, Operation, ResolvedMutation, StoredResources};
use crate::repos::resources;
use crate::schema::{relation, RelationDescriptor, ResourceRef, ResourceType};
use crate::trace_ctx;

/// Check the document's type against the URL and parse its attributes.
fn attributes_for(ty: ResourceType, incoming: &IncomingResource) -> Result<ResourceAttributes, AppError> {
    if incoming.ty != ty.as_str() {
        return Err(AppError::conflict_at(
            ErrorCode::Conflict,
            format!("Resource type {} does not match the endpoint type {ty}.", incoming.ty),
            "/data/type",
        ));
    }

    match ResourceAttributes::parse(ty, incoming.attributes.clone()) {
        None => Err(AppError::forbidden(
            ErrorCode::NotModifiable,
            format!("Resources of type {ty} cannot be written through the API."),
        )),
        Some(Err(e)) => Err(AppError::invalid_document(
            format!("Invalid attributes: {e}"),
            "/data/attributes",
        )),
        Some(Ok(attributes)) => Ok(attributes),
    }
}

/// Resolve every relationship of the document before anything is written.
async fn resolve_relationships<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ty: ResourceType,
    incoming: &IncomingResource,
) -> Result<Vec<(&'static RelationDescriptor, ResolvedMutation)>, AppError> {
    let lookup = StoredResources(conn);
    let mut resolved = Vec::with_capacity(incoming.relationships.len());
    for (name, data) in &incoming.relationships {
        let pointer = format!("/data/relationships/{name}");
        let rel = relation(ty, name).ok_or_else(|| {
            AppError::invalid_document(
                format!("Relationship {name} does not exist on resource type {ty}."),
                pointer.clone(),
            )
        })?;
        let mutation = resolver::resolve(
            &lookup,
            ty,
            rel,
            Operation::Replace,
            data,
            &format!("{pointer}/data"),
        )
        .await?;
        resolved.push((rel, mutation));
    }
    Ok(resolved)
}

async fn apply_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    resolved: Vec<(&'static RelationDescriptor, ResolvedMutation)>,
) -> Result<(), AppError> {
    for (rel, mutation) in resolved {
        sync::apply(conn, owner, rel, mutation).await?;
    }
    Ok(())
}

async fn document_for<C: ConnectionTrait + Send + Sync>(conn: &C, owner: ResourceRef) -> Result<Document, AppError> {
    reader::read_resource(conn, owner, &QueryParams::default())
        .await?
        .ok_or_else(|| AppError::internal(format!("resource {owner} vanished after write")))
}

/// Resource domain service.
pub struct ResourceService;

impl ResourceService {
    pub fn new() -> Self {
        Self
    }

    /// Insert the resource, then set each relationship it carries.
    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ty: ResourceType,
        incoming: &IncomingResource,
    ) -> Result<Document, AppError> {
        let attributes = attributes_for(ty, incoming)?;
        if incoming.id.is_some() {
            return Err(AppError::Forbidden {
                code: ErrorCode::NotModifiable,
                detail: "Client-generated ids are not supported.".to_string(),
            });
        }
        if let Some(field) = attributes.missing_for_create() {
            return Err(AppError::Validation {
                code: ErrorCode::ValidationError,
                detail: format!("The {field} field is required."),
                error_source: Some(ErrorSource::Pointer(format!("/data/attributes/{field}"))),
            });
        }

        let resolved = resolve_relationships(conn, ty, incoming).await?;
        let owner = ResourceRef::new(ty, resources::insert(conn, attributes).await?);
        let relationship_count = resolved.len();
        apply_all(conn, owner, resolved).await?;

        info!(
            trace_id = %trace_ctx::trace_id(),
            resource = %owner,
            relationships = relationship_count,
            "Resource created"
        );
        document_for(conn, owner).await
    }

    /// Write the attributes present and replace each relationship present.
    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ResourceRef,
        route_id: &str,
        incoming: &IncomingResource,
    ) -> Result<Document, AppError> {
        let attributes = attributes_for(owner.ty, incoming)?;
        if incoming.id.as_deref() != Some(route_id) {
            return Err(AppError::conflict_at(
                ErrorCode::Conflict,
                format!("Resource id must be {route_id}."),
                "/data/id",
            ));
        }

        let resolved = resolve_relationships(conn, owner.ty, incoming).await?;
        resources::update(conn, owner.key, attributes).await?;
        apply_all(conn, owner, resolved).await?;

        info!(trace_id = %trace_ctx::trace_id(), resource = %owner, "Resource updated");
        document_for(conn, owner).await
    }

    pub async fn read<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: ResourceRef,
        query: &QueryParams,
    ) -> Result<Document, AppError> {
        reader::read_resource(conn, owner, query).await?.ok_or_else(|| {
            AppError::not_found(
                ErrorCode::ResourceNotFound,
                format!("Resource {} does not exist.", owner),
            )
        })
    }
}

impl Default for ResourceService {
    fn default() -> Self {
        Self::new()
    }
}

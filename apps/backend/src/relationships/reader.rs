//! Projects stored relation state into JSON:API documents.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;

use super::error::RelationshipError;
use crate::adapters::resources_sea::LoadCriteria;
use crate::errors::ErrorCode;
use crate::jsonapi::document::{
    Document, Links, RelationshipData, RelationshipDocument, ResourceIdentifier, ResourceObject,
};
use crate::jsonapi::links::relationship_links;
use crate::jsonapi::pagination::{paginate, PageMeta};
use crate::jsonapi::query::QueryParams;
use crate::repos::{relations, resources};
use crate::schema::{
    include_path_allowed, query_schema, relation, RelationDescriptor, ResourceRef, ResourceType,
};

/// The resource whose relation is read, with its wire id for links.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a> {
    pub reference: ResourceRef,
    pub route_id: &'a str,
}

fn filter_not_allowed(field: &str) -> RelationshipError {
    RelationshipError::validation(
        ErrorCode::InvalidFilter,
        format!("Filter parameter {field} is not allowed."),
        format!("filter.{field}"),
    )
}

fn sort_not_allowed(field: &str) -> RelationshipError {
    RelationshipError::validation(
        ErrorCode::InvalidSort,
        format!("Sort parameter {field} is not allowed."),
        "sort",
    )
}

/// Check `query` against `rel` and resolve filters and sorts to columns.
///
/// Filters and sorts need a single related type with a to-many shape;
/// anything else rejects them. Unknown filters are reported before empty
/// filter values, filters before sorts, sorts before includes.
pub fn validate<'q>(
    rel: &RelationDescriptor,
    query: &'q QueryParams,
) -> Result<LoadCriteria<'q>, RelationshipError> {
    let single = rel.single_type().filter(|_| rel.is_to_many());
    let mut criteria = LoadCriteria::default();

    let schema = single.map(query_schema);
    for (field, value) in &query.filters {
        let spec = schema
            .and_then(|s| s.filter(field))
            .ok_or_else(|| filter_not_allowed(field))?;
        if value.trim().is_empty() {
            return Err(RelationshipError::validation(
                ErrorCode::InvalidFilter,
                format!("The filter.{field} field must have a value."),
                format!("filter.{field}"),
            ));
        }
        criteria.filters.push((spec, value.as_str()));
    }

    for sort in &query.sort {
        let spec = schema
            .and_then(|s| s.sort(&sort.field))
            .ok_or_else(|| sort_not_allowed(&sort.field))?;
        criteria.sorts.push((spec, sort.descending));
    }

    for path in &query.include {
        if !rel.types.iter().any(|ty| include_path_allowed(*ty, path)) {
            return Err(RelationshipError::validation(
                ErrorCode::InvalidInclude,
                format!("Include path {path} is not allowed."),
                "include",
            ));
        }
    }

    if query.page.is_some() && rel.is_to_one() {
        return Err(RelationshipError::validation(
            ErrorCode::InvalidPage,
            format!("The {} relationship is to-one and cannot be paginated.", rel.name),
            "page",
        ));
    }

    Ok(criteria)
}

/// Related resources after filtering, sorting and paging.
async fn collect<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    query: &QueryParams,
) -> Result<(Vec<(ResourceRef, ResourceObject)>, Option<PageMeta>), RelationshipError> {
    let criteria = validate(rel, query)?;
    let members = relations::related(conn, owner, rel).await?;

    let loaded = match rel.single_type() {
        Some(ty) => {
            let keys: Vec<i64> = members.iter().map(|m| m.key).collect();
            resources::load(conn, ty, &keys, &criteria).await?
        }
        None => resources::load_refs(conn, &members).await?,
    };

    Ok(match query.page {
        Some(page) => {
            let (slice, meta) = paginate(loaded, page);
            (slice, Some(meta))
        }
        None => (loaded, None),
    })
}

/// Resources reachable from `primary` along each include path, excluding
/// the primary resources themselves. Order: path order, then storage order.
async fn included<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    primary: &[ResourceRef],
    paths: &[String],
) -> Result<Vec<ResourceObject>, RelationshipError> {
    let mut seen: HashSet<ResourceRef> = primary.iter().copied().collect();
    let mut order = Vec::new();

    for path in paths {
        let mut frontier: Vec<ResourceRef> = primary.to_vec();
        for segment in path.split('.') {
            let mut next = Vec::new();
            let mut next_seen = HashSet::new();
            for from in &frontier {
                let Some(rel) = relation(from.ty, segment).filter(|r| !r.is_read_only()) else {
                    continue;
                };
                for member in relations::related(conn, *from, rel).await? {
                    if next_seen.insert(member) {
                        next.push(member);
                    }
                    if seen.insert(member) {
                        order.push(member);
                    }
                }
            }
            frontier = next;
        }
    }

    Ok(resources::load_refs(conn, &order)
        .await?
        .into_iter()
        .map(|(_, object)| object)
        .collect())
}

/// `GET /{type}/{id}/relationships/{name}`
pub async fn read_relationship<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: Owner<'_>,
    rel: &RelationDescriptor,
    query: &QueryParams,
) -> Result<RelationshipDocument, RelationshipError> {
    let (members, meta) = collect(conn, owner.reference, rel, query).await?;
    let mut identifiers = members.iter().map(|(_, object)| object.identifier());

    let data = if rel.is_to_one() {
        RelationshipData::ToOne(identifiers.next())
    } else {
        RelationshipData::ToMany(identifiers.collect::<Vec<ResourceIdentifier>>())
    };

    Ok(RelationshipDocument {
        data,
        links: Some(relationship_links(owner.reference.ty, owner.route_id, rel.name)),
        meta: meta.map(PageMeta::into_meta),
    })
}

/// `GET /{type}/{id}/{name}`
pub async fn read_related<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner: Owner<'_>,
    rel: &RelationDescriptor,
    query: &QueryParams,
) -> Result<Document, RelationshipError> {
    let (members, meta) = collect(conn, owner.reference, rel, query).await?;
    let primary: Vec<ResourceRef> = members.iter().map(|(r, _)| *r).collect();
    let included = included(conn, &primary, &query.include).await?;

    let mut objects = members.into_iter().map(|(_, object)| object);
    let mut document = if rel.is_to_one() {
        Document::one(objects.next())
    } else {
        Document::many(objects.collect())
    };

    let links = relationship_links(owner.reference.ty, owner.route_id, rel.name);
    document.links = Some(Links {
        self_link: links.related,
        related: None,
    });
    document.included = included;
    document.meta = meta.map(PageMeta::into_meta);
    Ok(document)
}

/// `GET /{type}/{id}` with `include`.
pub async fn read_resource<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    reference: ResourceRef,
    query: &QueryParams,
) -> Result<Option<Document>, RelationshipError> {
    reject_collection_params(reference.ty, query)?;
    let Some(object) = resources::load_one(conn, reference).await? else {
        return Ok(None);
    };
    let mut document = Document::one(Some(object));
    document.included = included(conn, &[reference], &query.include).await?;
    Ok(Some(document))
}

/// A single resource takes `include` only.
fn reject_collection_params(ty: ResourceType, query: &QueryParams) -> Result<(), RelationshipError> {
    if let Some((field, _)) = query.filters.first() {
        return Err(filter_not_allowed(field));
    }
    if let Some(sort) = query.sort.first() {
        return Err(sort_not_allowed(&sort.field));
    }
    if query.page.is_some() {
        return Err(RelationshipError::validation(
            ErrorCode::InvalidPage,
            "A single resource cannot be paginated.",
            "page",
        ));
    }
    for path in &query.include {
        if !include_path_allowed(ty, path) {
            return Err(RelationshipError::validation(
                ErrorCode::InvalidInclude,
                format!("Include path {path} is not allowed."),
                "include",
            ));
        }
    }
    Ok(())
}

//! Relationship endpoints.
//!
//! - GET    /{type}/{id}/{rel}                  related resources
//! - GET    /{type}/{id}/relationships/{rel}    linkage
//! - PATCH  /{type}/{id}/relationships/{rel}    replace
//! - POST   /{type}/{id}/relationships/{rel}    add (to-many)
//! - DELETE /{type}/{id}/relationships/{rel}    remove (to-many)

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use super::jsonapi_response;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{JsonApiBody, JsonApiQuery};
use crate::jsonapi::document::RelationshipDocument;
use crate::relationships::{Operation, Owner};
use crate::services::relationships::{locate, relation_of, resource_type, RelationshipService};
use crate::state::app_state::AppState;

type RelationshipPath = web::Path<(String, String, String)>;

async fn read_related(
    http_req: HttpRequest,
    path: RelationshipPath,
    query: JsonApiQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (ty, id, name) = path.into_inner();
    let ty = resource_type(&ty)?;
    let rel = relation_of(ty, &name)?;

    let document = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let reference = locate(txn, ty, &id).await?;
            let owner = Owner {
                reference,
                route_id: &id,
            };
            RelationshipService::new().read_related(txn, owner, rel, &query).await
        })
    })
    .await?;

    Ok(jsonapi_response(StatusCode::OK, &document))
}

async fn read_relationship(
    http_req: HttpRequest,
    path: RelationshipPath,
    query: JsonApiQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (ty, id, name) = path.into_inner();
    let ty = resource_type(&ty)?;
    let rel = relation_of(ty, &name)?;

    let document = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let reference = locate(txn, ty, &id).await?;
            let owner = Owner {
                reference,
                route_id: &id,
            };
            RelationshipService::new()
                .read_relationship(txn, owner, rel, &query)
                .await
        })
    })
    .await?;

    Ok(jsonapi_response(StatusCode::OK, &document))
}

/// Shared body of PATCH/POST/DELETE; 204 on success.
async fn modify(
    http_req: HttpRequest,
    path: RelationshipPath,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
    operation: Operation,
) -> Result<HttpResponse, AppError> {
    let (ty, id, name) = path.into_inner();
    let ty = resource_type(&ty)?;
    let rel = relation_of(ty, &name)?;
    let document = RelationshipDocument::from_request(&body)?;

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let owner = locate(txn, ty, &id).await?;
            RelationshipService::new()
                .resolve_and_apply(txn, owner, rel, operation, &document.data, "/data")
                .await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn replace_relationship(
    http_req: HttpRequest,
    path: RelationshipPath,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    modify(http_req, path, body, app_state, Operation::Replace).await
}

async fn add_to_relationship(
    http_req: HttpRequest,
    path: RelationshipPath,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    modify(http_req, path, body, app_state, Operation::Add).await
}

async fn remove_from_relationship(
    http_req: HttpRequest,
    path: RelationshipPath,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    modify(http_req, path, body, app_state, Operation::Remove).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{type}/{id}/relationships/{rel}")
            .route(web::get().to(read_relationship))
            .route(web::patch().to(replace_relationship))
            .route(web::post().to(add_to_relationship))
            .route(web::delete().to(remove_from_relationship)),
    );
    cfg.service(web::resource("/{type}/{id}/{rel}").route(web::get().to(read_related)));
}

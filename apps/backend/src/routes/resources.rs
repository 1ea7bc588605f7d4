//! Resource endpoints: `POST /{type}`, `GET|PATCH /{type}/{id}`.

use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use super::jsonapi_response;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{JsonApiBody, JsonApiQuery};
use crate::jsonapi::document::{IncomingResource, PrimaryData};
use crate::services::relationships::{locate, resource_type};
use crate::services::resources::ResourceService;
use crate::state::app_state::AppState;

/// GET /api/v1/{type}/{id}
async fn read_resource(
    http_req: HttpRequest,
    path: web::Path<(String, String)>,
    query: JsonApiQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (ty, id) = path.into_inner();
    let ty = resource_type(&ty)?;

    let document = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let owner = locate(txn, ty, &id).await?;
            ResourceService::new().read(txn, owner, &query).await
        })
    })
    .await?;

    Ok(jsonapi_response(StatusCode::OK, &document))
}

/// POST /api/v1/{type}
///
/// Creates the resource and every relationship in the document in one
/// transaction; 201 with a `Location` header.
async fn create_resource(
    http_req: HttpRequest,
    path: web::Path<String>,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ty = resource_type(&path.into_inner())?;
    let incoming = IncomingResource::from_request(&body)?;

    let document = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { ResourceService::new().create(txn, ty, &incoming).await })
    })
    .await?;

    let mut response = jsonapi_response(StatusCode::CREATED, &document);
    if let PrimaryData::One(Some(created)) = &document.data {
        if let Some(location) = created.links.self_link.as_deref() {
            if let Ok(value) = location.parse() {
                response.headers_mut().insert(LOCATION, value);
            }
        }
    }
    Ok(response)
}

/// PATCH /api/v1/{type}/{id}
async fn update_resource(
    http_req: HttpRequest,
    path: web::Path<(String, String)>,
    body: JsonApiBody,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (ty, id) = path.into_inner();
    let ty = resource_type(&ty)?;
    let incoming = IncomingResource::from_request(&body)?;

    let document = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let owner = locate(txn, ty, &id).await?;
            ResourceService::new().update(txn, owner, &id, &incoming).await
        })
    })
    .await?;

    Ok(jsonapi_response(StatusCode::OK, &document))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{type}").route(web::post().to(create_resource)));
    cfg.service(
        web::resource("/{type}/{id}")
            .route(web::get().to(read_resource))
            .route(web::patch().to(update_resource)),
    );
}

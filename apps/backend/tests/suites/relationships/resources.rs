//! Resource documents that carry relationships.

use linkage::entities::{Posts, Taggables};
use linkage::errors::ErrorCode;
use linkage::jsonapi::document::{ErrorSource, IncomingResource, PrimaryData};
use linkage::schema::{ResourceRef, ResourceType};
use linkage::services::resources::ResourceService;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};

use super::{query, Harness};
use crate::support::factory::{post_ref, PostFactory, TagFactory, UserFactory};

fn incoming(body: Value) -> IncomingResource {
    IncomingResource::from_request(&body).expect("document should parse")
}

fn pointer(p: &str) -> ErrorSource {
    ErrorSource::Pointer(p.to_string())
}

fn post_document(author: Value, tags: Value) -> Value {
    json!({
        "data": {
            "type": "posts",
            "attributes": {
                "title": "Hello",
                "slug": linkage_test_support::unique_helpers::unique_slug("hello"),
                "content": "First post."
            },
            "relationships": {
                "author": { "data": author },
                "tags": { "data": tags }
            }
        }
    })
}

#[tokio::test]
async fn create_post_with_author_and_tags() {
    let h = Harness::new().await;
    let author = UserFactory::new().author().create(h.txn()).await.unwrap();
    let tags = TagFactory::new().times(h.txn(), 2).await.unwrap();

    let doc = ResourceService::new()
        .create(
            h.txn(),
            ResourceType::Posts,
            &incoming(post_document(
                json!({ "type": "users", "id": author.id.to_string() }),
                json!([
                    { "type": "tags", "id": tags[1].uuid },
                    { "type": "tags", "id": tags[0].uuid }
                ]),
            )),
        )
        .await
        .unwrap();

    let PrimaryData::One(Some(created)) = &doc.data else {
        panic!("expected one resource");
    };
    assert_eq!(created.ty, "posts");
    assert_eq!(created.attributes["title"], "Hello");
    assert!(created.relationships.contains_key("tags"));
    assert_eq!(
        created.links.self_link.as_deref(),
        Some(format!("/api/v1/posts/{}", created.id).as_str())
    );

    let owner = ResourceRef::new(ResourceType::Posts, created.id.parse().unwrap());
    assert_eq!(
        h.members(owner, "author").await,
        vec![ResourceRef::new(ResourceType::Users, author.id)]
    );
    assert_eq!(
        h.members(owner, "tags").await,
        vec![
            ResourceRef::new(ResourceType::Tags, tags[1].id),
            ResourceRef::new(ResourceType::Tags, tags[0].id),
        ]
    );
    h.finish().await;
}

#[tokio::test]
async fn failed_relationship_writes_nothing() {
    let h = Harness::new().await;
    let author = UserFactory::new().author().create(h.txn()).await.unwrap();
    let posts_before = Posts::find().count(h.txn()).await.unwrap();

    let err = ResourceService::new()
        .create(
            h.txn(),
            ResourceType::Posts,
            &incoming(post_document(
                json!({ "type": "users", "id": author.id.to_string() }),
                json!([{ "type": "tags", "id": "00000000-0000-4000-8000-000000000000" }]),
            )),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status().as_u16(), 404);
    assert_eq!(
        err.error_source(),
        Some(&pointer("/data/relationships/tags/data/0/id"))
    );
    assert_eq!(Posts::find().count(h.txn()).await.unwrap(), posts_before);
    assert_eq!(Taggables::find().count(h.txn()).await.unwrap(), 0);
    h.finish().await;
}

#[tokio::test]
async fn create_rejects_malformed_documents() {
    let h = Harness::new().await;
    let service = ResourceService::new();

    let err = service
        .create(
            h.txn(),
            ResourceType::Countries,
            &incoming(json!({ "data": { "type": "users", "attributes": {} } })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(err.error_source(), Some(&pointer("/data/type")));

    let err = service
        .create(
            h.txn(),
            ResourceType::Countries,
            &incoming(json!({ "data": { "type": "countries", "attributes": { "name": "Chile" } } })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 400);
    assert_eq!(err.detail(), "The code field is required.");
    assert_eq!(err.error_source(), Some(&pointer("/data/attributes/code")));

    let err = service
        .create(
            h.txn(),
            ResourceType::Countries,
            &incoming(json!({
                "data": { "type": "countries", "id": "9", "attributes": { "name": "Chile", "code": "CL" } }
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 403);

    let err = service
        .create(
            h.txn(),
            ResourceType::Countries,
            &incoming(json!({
                "data": { "type": "countries", "attributes": { "name": "Chile", "code": "CL", "capital": "Santiago" } }
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDocument);
    assert_eq!(err.error_source(), Some(&pointer("/data/attributes")));

    let err = service
        .create(
            h.txn(),
            ResourceType::Comments,
            &incoming(json!({ "data": { "type": "comments", "attributes": { "content": "hi" } } })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotModifiable);

    let err = service
        .create(
            h.txn(),
            ResourceType::Countries,
            &incoming(json!({
                "data": {
                    "type": "countries",
                    "attributes": { "name": "Chile", "code": "CL" },
                    "relationships": { "cities": { "data": [] } }
                }
            })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 400);
    assert_eq!(err.error_source(), Some(&pointer("/data/relationships/cities")));
    h.finish().await;
}

#[tokio::test]
async fn update_changes_attributes_and_replaces_relationships() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let tags = TagFactory::new().times(h.txn(), 2).await.unwrap();
    crate::support::factory::tag(h.txn(), tags[0].id, post_ref(&post)).await.unwrap();
    let id = post.id.to_string();

    let doc = ResourceService::new()
        .update(
            h.txn(),
            post_ref(&post),
            &id,
            &incoming(json!({
                "data": {
                    "type": "posts",
                    "id": id,
                    "attributes": { "title": "Renamed" },
                    "relationships": { "tags": { "data": [{ "type": "tags", "id": tags[1].uuid }] } }
                }
            })),
        )
        .await
        .unwrap();

    let PrimaryData::One(Some(updated)) = &doc.data else {
        panic!("expected one resource");
    };
    assert_eq!(updated.attributes["title"], "Renamed");
    assert_eq!(updated.attributes["slug"], post.slug);
    assert_eq!(
        h.members(post_ref(&post), "tags").await,
        vec![ResourceRef::new(ResourceType::Tags, tags[1].id)]
    );
    h.finish().await;
}

#[tokio::test]
async fn update_requires_matching_id() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();

    let err = ResourceService::new()
        .update(
            h.txn(),
            post_ref(&post),
            &post.id.to_string(),
            &incoming(json!({ "data": { "type": "posts", "id": "999999", "attributes": {} } })),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(err.error_source(), Some(&pointer("/data/id")));
    h.finish().await;
}

#[tokio::test]
async fn read_includes_related_resources() {
    let h = Harness::new().await;
    let author = UserFactory::new().author().name("Writer").create(h.txn()).await.unwrap();
    let post = PostFactory::new().author(author.id).published().create(h.txn()).await.unwrap();

    let doc = ResourceService::new()
        .read(h.txn(), post_ref(&post), &query(&[("include", "author")]))
        .await
        .unwrap();
    let body = serde_json::to_value(&doc).unwrap();

    assert_eq!(body["data"]["id"], post.id.to_string());
    assert_eq!(body["data"]["attributes"]["published"], true);
    assert_eq!(body["included"][0]["type"], "users");
    assert_eq!(body["included"][0]["attributes"]["name"], "Writer");
    assert!(body["included"][0]["attributes"].get("password").is_none());

    let err = ResourceService::new()
        .read(h.txn(), post_ref(&post), &query(&[("sort", "title")]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidSort);
    h.finish().await;
}

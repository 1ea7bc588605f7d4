//! End-to-end relationship scenarios at the service layer.

use linkage::entities::users::Column as UserColumn;
use linkage::entities::{taggables, Images, Users};
use linkage::jsonapi::document::{IncomingResource, PrimaryData};
use linkage::relationships::Operation;
use linkage::schema::{ResourceRef, ResourceType};
use linkage::services::resources::ResourceService;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde_json::json;

use super::{identifiers, query, users, Harness};
use crate::support::factory::{
    post_ref, video_ref, CountryFactory, ImageFactory, PostFactory, TagFactory, UserFactory,
    VideoFactory,
};

#[tokio::test]
async fn country_without_users_reads_empty() {
    let h = Harness::new().await;
    let country = CountryFactory::new().create(h.txn()).await.unwrap();
    let owner = ResourceRef::new(ResourceType::Countries, country.id);

    let doc = h
        .read_relationship(owner, &country.id.to_string(), "users", &query(&[]))
        .await
        .unwrap();
    let body = serde_json::to_value(&doc).unwrap();

    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["links"]["self"],
        format!("/api/v1/countries/{}/relationships/users", country.id)
    );
    h.finish().await;
}

#[tokio::test]
async fn country_created_with_two_users() {
    let h = Harness::new().await;
    let people = UserFactory::new().times(h.txn(), 2).await.unwrap();
    let keys: Vec<i64> = people.iter().map(|u| u.id).collect();

    let incoming = IncomingResource::from_request(&json!({
        "data": {
            "type": "countries",
            "attributes": { "name": "Wales", "code": "WL" },
            "relationships": { "users": { "data": identifiers(&users(&keys)) } }
        }
    }))
    .unwrap();
    let doc = ResourceService::new()
        .create(h.txn(), ResourceType::Countries, &incoming)
        .await
        .unwrap();

    let PrimaryData::One(Some(created)) = &doc.data else {
        panic!("create should return one resource");
    };
    let owner = ResourceRef::new(ResourceType::Countries, created.id.parse().unwrap());
    assert_eq!(h.members(owner, "users").await, users(&keys));
    h.finish().await;
}

#[tokio::test]
async fn tag_created_with_mixed_taggables_writes_three_junction_rows() {
    let h = Harness::new().await;
    let videos = VideoFactory::new().times(h.txn(), 2).await.unwrap();
    let post = PostFactory::new().create(h.txn()).await.unwrap();

    let incoming = IncomingResource::from_request(&json!({
        "data": {
            "type": "tags",
            "attributes": { "name": "featured" },
            "relationships": {
                "taggables": {
                    "data": [
                        { "type": "videos", "id": videos[0].id.to_string() },
                        { "type": "posts", "id": post.id.to_string() },
                        { "type": "videos", "id": videos[1].id.to_string() }
                    ]
                }
            }
        }
    }))
    .unwrap();
    ResourceService::new()
        .create(h.txn(), ResourceType::Tags, &incoming)
        .await
        .unwrap();

    let rows = taggables::Entity::find()
        .order_by_asc(taggables::Column::Id)
        .all(h.txn())
        .await
        .unwrap();
    let written: Vec<(String, i64)> = rows
        .iter()
        .map(|r| (r.taggable_type.clone(), r.taggable_id))
        .collect();
    assert_eq!(
        written,
        vec![
            ("videos".to_string(), videos[0].id),
            ("posts".to_string(), post.id),
            ("videos".to_string(), videos[1].id),
        ]
    );
    assert!(rows.iter().all(|r| r.tag_id == rows[0].tag_id));
    h.finish().await;
}

#[tokio::test]
async fn post_image_set_to_null_only_clears_that_image() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let other = PostFactory::new().create(h.txn()).await.unwrap();
    let image = ImageFactory::new().on(post_ref(&post)).create(h.txn()).await.unwrap();
    let kept = ImageFactory::new().on(post_ref(&other)).create(h.txn()).await.unwrap();

    h.apply(post_ref(&post), "image", Operation::Replace, json!(null))
        .await
        .unwrap();

    let cleared = Images::find_by_id(image.id)
        .one(h.txn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.imageable_type, None);
    assert_eq!(cleared.imageable_id, None);

    let untouched = Images::find_by_id(kept.id)
        .one(h.txn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.imageable_type.as_deref(), Some("posts"));
    assert_eq!(untouched.imageable_id, Some(other.id));
    assert!(h.members(post_ref(&post), "image").await.is_empty());
    h.finish().await;
}

#[tokio::test]
async fn related_users_sort_by_name_and_reject_unknown_sort() {
    let h = Harness::new().await;
    let country = CountryFactory::new().create(h.txn()).await.unwrap();
    for name in ["Carol", "Alice", "Bob"] {
        UserFactory::new()
            .name(name)
            .country(country.id)
            .create(h.txn())
            .await
            .unwrap();
    }
    let owner = ResourceRef::new(ResourceType::Countries, country.id);
    let route_id = country.id.to_string();

    let body = h
        .read_related(owner, &route_id, "users", &query(&[("sort", "name")]))
        .await
        .unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["attributes"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

    let err = h
        .read_related(owner, &route_id, "users", &query(&[("sort", "code")]))
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 400);
    assert_eq!(
        err.error_source(),
        Some(&linkage::jsonapi::document::ErrorSource::Parameter("sort".into()))
    );
    assert_eq!(err.detail(), "Sort parameter code is not allowed.");
    h.finish().await;
}

#[tokio::test]
async fn removing_two_of_four_users_nulls_their_country() {
    let h = Harness::new().await;
    let country = CountryFactory::new().create(h.txn()).await.unwrap();
    let people = UserFactory::new()
        .country(country.id)
        .times(h.txn(), 4)
        .await
        .unwrap();
    let keys: Vec<i64> = people.iter().map(|u| u.id).collect();
    let owner = ResourceRef::new(ResourceType::Countries, country.id);

    h.apply(
        owner,
        "users",
        Operation::Remove,
        identifiers(&users(&[keys[1], keys[3]])),
    )
    .await
    .unwrap();

    assert_eq!(h.members(owner, "users").await, users(&[keys[0], keys[2]]));
    let orphaned = Users::find()
        .filter(UserColumn::Id.is_in([keys[1], keys[3]]))
        .filter(UserColumn::CountryId.is_null())
        .count(h.txn())
        .await
        .unwrap();
    assert_eq!(orphaned, 2);
    h.finish().await;
}

#[tokio::test]
async fn related_posts_share_a_tag_or_the_author() {
    let h = Harness::new().await;
    let author = UserFactory::new().author().create(h.txn()).await.unwrap();
    let post = PostFactory::new().author(author.id).create(h.txn()).await.unwrap();
    let same_author = PostFactory::new().author(author.id).create(h.txn()).await.unwrap();
    let same_tag = PostFactory::new().create(h.txn()).await.unwrap();
    let unrelated = PostFactory::new().create(h.txn()).await.unwrap();
    let tag = TagFactory::new().create(h.txn()).await.unwrap();
    crate::support::factory::tag(h.txn(), tag.id, post_ref(&post)).await.unwrap();
    crate::support::factory::tag(h.txn(), tag.id, post_ref(&same_tag)).await.unwrap();

    let related = h.members(post_ref(&post), "related").await;
    assert_eq!(related, vec![post_ref(&same_author), post_ref(&same_tag)]);
    assert!(!related.contains(&post_ref(&unrelated)));

    let err = h
        .apply(post_ref(&post), "related", Operation::Replace, json!([]))
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 403);

    let video = VideoFactory::new().create(h.txn()).await.unwrap();
    crate::support::factory::tag(h.txn(), tag.id, video_ref(&video)).await.unwrap();
    assert_eq!(h.members(post_ref(&post), "related").await.len(), 2);
    h.finish().await;
}

#[tokio::test]
async fn related_video_is_the_first_sharing_a_tag_or_the_author() {
    let h = Harness::new().await;
    let author = UserFactory::new().author().create(h.txn()).await.unwrap();
    let post = PostFactory::new().author(author.id).create(h.txn()).await.unwrap();
    assert!(h.members(post_ref(&post), "relatedVideo").await.is_empty());

    let tagged = VideoFactory::new().create(h.txn()).await.unwrap();
    let by_author = VideoFactory::new().uploaded_by(author.id).create(h.txn()).await.unwrap();
    VideoFactory::new().create(h.txn()).await.unwrap();
    assert_eq!(
        h.members(post_ref(&post), "relatedVideo").await,
        vec![video_ref(&by_author)]
    );

    let tag = TagFactory::new().create(h.txn()).await.unwrap();
    crate::support::factory::tag(h.txn(), tag.id, post_ref(&post)).await.unwrap();
    crate::support::factory::tag(h.txn(), tag.id, video_ref(&tagged)).await.unwrap();
    assert_eq!(
        h.members(post_ref(&post), "relatedVideo").await,
        vec![video_ref(&tagged)]
    );

    let err = h
        .apply(post_ref(&post), "relatedVideo", Operation::Replace, json!(null))
        .await
        .unwrap_err();
    assert_eq!(err.status().as_u16(), 403);
    h.finish().await;
}

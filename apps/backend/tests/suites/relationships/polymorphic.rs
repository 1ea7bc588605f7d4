use linkage::entities::images::Column as ImageColumn;
use linkage::entities::{Comments, Images};
use linkage::relationships::Operation;
use linkage::schema::{ResourceRef, ResourceType};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use super::{identifier, Harness};
use crate::support::factory::{
    post_ref, video_ref, CommentFactory, ImageFactory, PostFactory, TagFactory, VideoFactory,
};

#[tokio::test]
async fn morph_one_move_between_posts_never_leaves_two_holders() {
    let h = Harness::new().await;
    let first = PostFactory::new().create(h.txn()).await.unwrap();
    let second = PostFactory::new().create(h.txn()).await.unwrap();
    let image = ImageFactory::new().on(post_ref(&first)).create(h.txn()).await.unwrap();
    let image_ref = ResourceRef::new(ResourceType::Images, image.id);

    h.apply(
        post_ref(&second),
        "image",
        Operation::Replace,
        identifier(ResourceType::Images, image.id),
    )
    .await
    .unwrap();

    assert!(h.members(post_ref(&first), "image").await.is_empty());
    assert_eq!(h.members(post_ref(&second), "image").await, vec![image_ref]);
    assert_eq!(
        h.members(image_ref, "imageable").await,
        vec![post_ref(&second)]
    );
    h.finish().await;
}

#[tokio::test]
async fn morph_one_replace_releases_the_old_image() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let old = ImageFactory::new().on(post_ref(&post)).create(h.txn()).await.unwrap();
    let new = ImageFactory::new().create(h.txn()).await.unwrap();

    h.apply(
        post_ref(&post),
        "image",
        Operation::Replace,
        identifier(ResourceType::Images, new.id),
    )
    .await
    .unwrap();

    let released = Images::find_by_id(old.id).one(h.txn()).await.unwrap().unwrap();
    assert_eq!((released.imageable_type, released.imageable_id), (None, None));
    let held = Images::find_by_id(new.id).one(h.txn()).await.unwrap().unwrap();
    assert_eq!(held.imageable_type.as_deref(), Some("posts"));
    assert_eq!(held.imageable_id, Some(post.id));
    h.finish().await;
}

#[tokio::test]
async fn morph_to_onto_a_post_with_an_image_leaves_one_holder() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let first = ImageFactory::new().on(post_ref(&post)).create(h.txn()).await.unwrap();
    let second = ImageFactory::new().create(h.txn()).await.unwrap();
    let second_ref = ResourceRef::new(ResourceType::Images, second.id);

    h.apply(
        second_ref,
        "imageable",
        Operation::Replace,
        identifier(ResourceType::Posts, post.id),
    )
    .await
    .unwrap();

    let holders = Images::find()
        .filter(ImageColumn::ImageableType.eq("posts"))
        .filter(ImageColumn::ImageableId.eq(post.id))
        .count(h.txn())
        .await
        .unwrap();
    assert_eq!(holders, 1);
    assert_eq!(h.members(post_ref(&post), "image").await, vec![second_ref]);
    let released = Images::find_by_id(first.id).one(h.txn()).await.unwrap().unwrap();
    assert_eq!((released.imageable_type, released.imageable_id), (None, None));
    h.finish().await;
}

#[tokio::test]
async fn morph_to_onto_a_video_keeps_other_images() {
    let h = Harness::new().await;
    let video = VideoFactory::new().create(h.txn()).await.unwrap();
    let first = ImageFactory::new().on(video_ref(&video)).create(h.txn()).await.unwrap();
    let second = ImageFactory::new().create(h.txn()).await.unwrap();

    h.apply(
        ResourceRef::new(ResourceType::Images, second.id),
        "imageable",
        Operation::Replace,
        identifier(ResourceType::Videos, video.id),
    )
    .await
    .unwrap();

    let kept = Images::find_by_id(first.id).one(h.txn()).await.unwrap().unwrap();
    assert_eq!(kept.imageable_id, Some(video.id));
    h.finish().await;
}

#[tokio::test]
async fn morph_to_moves_a_comment_from_post_to_video() {
    let h = Harness::new().await;
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let video = VideoFactory::new().create(h.txn()).await.unwrap();
    let comment = CommentFactory::new().on(post_ref(&post)).create(h.txn()).await.unwrap();
    let comment_ref = ResourceRef::new(ResourceType::Comments, comment.id);

    h.apply(
        comment_ref,
        "commentable",
        Operation::Replace,
        identifier(ResourceType::Videos, video.id),
    )
    .await
    .unwrap();

    assert!(h.members(post_ref(&post), "comments").await.is_empty());
    assert_eq!(h.members(video_ref(&video), "comments").await, vec![comment_ref]);
    let stored = Comments::find_by_id(comment.id).one(h.txn()).await.unwrap().unwrap();
    assert_eq!(stored.commentable_type.as_deref(), Some("videos"));
    assert_eq!(stored.commentable_id, Some(video.id));
    h.finish().await;
}

#[tokio::test]
async fn morph_to_rejects_types_outside_the_union() {
    let h = Harness::new().await;
    let comment = CommentFactory::new().post().create(h.txn()).await.unwrap();
    let comment_ref = ResourceRef::new(ResourceType::Comments, comment.id);
    let before = h.members(comment_ref, "commentable").await;

    let err = h
        .apply(
            comment_ref,
            "commentable",
            Operation::Replace,
            json!({ "type": "users", "id": "1" }),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(
        err.detail(),
        "The commentable field must be a to-one relationship containing posts, videos resources."
    );
    assert_eq!(h.members(comment_ref, "commentable").await, before);
    h.finish().await;
}

#[tokio::test]
async fn morph_many_remove_nulls_both_pointer_columns() {
    let h = Harness::new().await;
    let video = VideoFactory::new().create(h.txn()).await.unwrap();
    let comments = CommentFactory::new()
        .on(video_ref(&video))
        .times(h.txn(), 2)
        .await
        .unwrap();

    h.apply(
        video_ref(&video),
        "comments",
        Operation::Remove,
        json!([identifier(ResourceType::Comments, comments[0].id)]),
    )
    .await
    .unwrap();

    let removed = Comments::find_by_id(comments[0].id)
        .one(h.txn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!((removed.commentable_type, removed.commentable_id), (None, None));
    assert_eq!(
        h.members(video_ref(&video), "comments").await,
        vec![ResourceRef::new(ResourceType::Comments, comments[1].id)]
    );
    h.finish().await;
}

#[tokio::test]
async fn morph_to_many_keeps_mixed_members_in_request_order() {
    let h = Harness::new().await;
    let tag = TagFactory::new().create(h.txn()).await.unwrap();
    let tag_ref = ResourceRef::new(ResourceType::Tags, tag.id);
    let post = PostFactory::new().create(h.txn()).await.unwrap();
    let video = VideoFactory::new().create(h.txn()).await.unwrap();

    h.apply(
        tag_ref,
        "taggables",
        Operation::Replace,
        json!([
            identifier(ResourceType::Videos, video.id),
            identifier(ResourceType::Posts, post.id)
        ]),
    )
    .await
    .unwrap();
    assert_eq!(
        h.members(tag_ref, "taggables").await,
        vec![video_ref(&video), post_ref(&post)]
    );

    h.apply(
        tag_ref,
        "taggables",
        Operation::Remove,
        json!([identifier(ResourceType::Videos, video.id)]),
    )
    .await
    .unwrap();
    assert_eq!(h.members(tag_ref, "taggables").await, vec![post_ref(&post)]);
    assert_eq!(h.members(post_ref(&post), "tags").await, vec![tag_ref]);
    h.finish().await;
}

use linkage::adapters::relations_sea;
use linkage::entities::{Comments, Phones, Taggables, Users};
use linkage::schema::{relation, RelationDescriptor, ResourceRef, ResourceType};
use sea_orm::{EntityTrait, PaginatorTrait};

use super::open_txn;
use crate::support::factory::{
    post_ref, tag, video_ref, CommentFactory, CountryFactory, PhoneFactory, PostFactory, TagFactory,
    UserFactory, VideoFactory,
};

fn rel(ty: ResourceType, name: &str) -> &'static RelationDescriptor {
    relation(ty, name).expect("relation should exist")
}

fn user_ref(id: i64) -> ResourceRef {
    ResourceRef::new(ResourceType::Users, id)
}

#[tokio::test]
async fn has_many_attach_detach_and_order() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let country = CountryFactory::new().create(txn).await.unwrap();
    let other = CountryFactory::new().create(txn).await.unwrap();
    let users = UserFactory::new().times(txn, 3).await.unwrap();
    let owner = ResourceRef::new(ResourceType::Countries, country.id);
    let users_rel = rel(ResourceType::Countries, "users");

    // attach in reverse; reads come back in key order
    let members: Vec<_> = users.iter().rev().map(|u| user_ref(u.id)).collect();
    relations_sea::attach(txn, owner, users_rel, &members).await.unwrap();
    let read = relations_sea::related(txn, owner, users_rel).await.unwrap();
    assert_eq!(read, users.iter().map(|u| user_ref(u.id)).collect::<Vec<_>>());

    // detaching from the wrong owner touches nothing
    let other_ref = ResourceRef::new(ResourceType::Countries, other.id);
    let cleared = relations_sea::detach(txn, other_ref, users_rel, &members).await.unwrap();
    assert_eq!(cleared, 0);

    let cleared = relations_sea::detach(txn, owner, users_rel, &[user_ref(users[1].id)])
        .await
        .unwrap();
    assert_eq!(cleared, 1);
    let kept = Users::find_by_id(users[1].id).one(txn).await.unwrap().unwrap();
    assert_eq!(kept.country_id, None);
    assert_eq!(
        relations_sea::related(txn, owner, users_rel).await.unwrap(),
        vec![user_ref(users[0].id), user_ref(users[2].id)]
    );

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn belongs_to_associate_and_dissociate() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let country = CountryFactory::new().create(txn).await.unwrap();
    let user = UserFactory::new().create(txn).await.unwrap();
    let owner = user_ref(user.id);
    let country_rel = rel(ResourceType::Users, "country");

    assert!(relations_sea::related(txn, owner, country_rel).await.unwrap().is_empty());

    let target = ResourceRef::new(ResourceType::Countries, country.id);
    relations_sea::associate(txn, owner, country_rel, target).await.unwrap();
    assert_eq!(relations_sea::related(txn, owner, country_rel).await.unwrap(), vec![target]);

    assert_eq!(relations_sea::dissociate(txn, owner, country_rel).await.unwrap(), 1);
    assert!(relations_sea::related(txn, owner, country_rel).await.unwrap().is_empty());

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn has_one_associate_moves_the_previous_holder_off() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let user = UserFactory::new().create(txn).await.unwrap();
    let first = PhoneFactory::new().user(user.id).create(txn).await.unwrap();
    let second = PhoneFactory::new().create(txn).await.unwrap();
    let owner = user_ref(user.id);
    let phone_rel = rel(ResourceType::Users, "phone");

    let second_ref = ResourceRef::new(ResourceType::Phones, second.id);
    relations_sea::associate(txn, owner, phone_rel, second_ref).await.unwrap();

    assert_eq!(relations_sea::related(txn, owner, phone_rel).await.unwrap(), vec![second_ref]);
    let first = Phones::find_by_id(first.id).one(txn).await.unwrap().unwrap();
    assert_eq!(first.user_id, None);

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn morph_to_reads_the_stored_pair() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let video = VideoFactory::new().create(txn).await.unwrap();
    let comment = CommentFactory::new().on(video_ref(&video)).create(txn).await.unwrap();
    let owner = ResourceRef::new(ResourceType::Comments, comment.id);
    let commentable = rel(ResourceType::Comments, "commentable");

    assert_eq!(
        relations_sea::related(txn, owner, commentable).await.unwrap(),
        vec![video_ref(&video)]
    );

    relations_sea::dissociate(txn, owner, commentable).await.unwrap();
    let stored = Comments::find_by_id(comment.id).one(txn).await.unwrap().unwrap();
    assert_eq!(stored.commentable_type, None);
    assert_eq!(stored.commentable_id, None);

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn morph_many_detach_requires_matching_discriminator() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let post = PostFactory::new().create(txn).await.unwrap();
    let comment = CommentFactory::new().on(post_ref(&post)).create(txn).await.unwrap();
    let comments_rel = rel(ResourceType::Posts, "comments");
    let member = ResourceRef::new(ResourceType::Comments, comment.id);

    // a video with the same key as the post does not own the comment
    let impostor = ResourceRef::new(ResourceType::Videos, post.id);
    let video_comments = rel(ResourceType::Videos, "comments");
    assert_eq!(
        relations_sea::detach(txn, impostor, video_comments, &[member]).await.unwrap(),
        0
    );

    assert_eq!(
        relations_sea::detach(txn, post_ref(&post), comments_rel, &[member]).await.unwrap(),
        1
    );
    assert!(relations_sea::related(txn, post_ref(&post), comments_rel)
        .await
        .unwrap()
        .is_empty());

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn pivot_rows_follow_insertion_order() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let label = TagFactory::new().create(txn).await.unwrap();
    let post = PostFactory::new().create(txn).await.unwrap();
    let video = VideoFactory::new().create(txn).await.unwrap();
    let owner = ResourceRef::new(ResourceType::Tags, label.id);
    let taggables = rel(ResourceType::Tags, "taggables");

    let members = [video_ref(&video), post_ref(&post)];
    relations_sea::attach(txn, owner, taggables, &members).await.unwrap();
    assert_eq!(relations_sea::related(txn, owner, taggables).await.unwrap(), members);

    // the inverse side sees the same rows
    let post_tags = rel(ResourceType::Posts, "tags");
    assert_eq!(
        relations_sea::related(txn, post_ref(&post), post_tags).await.unwrap(),
        vec![owner]
    );

    let removed = relations_sea::detach(txn, post_ref(&post), post_tags, &[owner]).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(Taggables::find().count(txn).await.unwrap(), 1);

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn related_posts_skip_the_owner() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let label = TagFactory::new().create(txn).await.unwrap();
    let owner = PostFactory::new().create(txn).await.unwrap();
    let tagged = PostFactory::new().create(txn).await.unwrap();
    let stranger = PostFactory::new().create(txn).await.unwrap();
    tag(txn, label.id, post_ref(&owner)).await.unwrap();
    tag(txn, label.id, post_ref(&tagged)).await.unwrap();

    let related = relations_sea::related(txn, post_ref(&owner), rel(ResourceType::Posts, "related"))
        .await
        .unwrap();
    assert_eq!(related, vec![post_ref(&tagged)]);
    assert!(!related.contains(&post_ref(&stranger)));

    shared.rollback().await.unwrap();
}

#[tokio::test]
async fn writes_on_the_wrong_shape_are_rejected() {
    let shared = open_txn().await;
    let txn = shared.transaction();
    let user = UserFactory::new().create(txn).await.unwrap();

    let err = relations_sea::attach(
        txn,
        user_ref(user.id),
        rel(ResourceType::Users, "country"),
        &[ResourceRef::new(ResourceType::Countries, 1)],
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("not a writable to-many"));

    let country = ResourceRef::new(ResourceType::Countries, 1);
    let err = relations_sea::dissociate(txn, country, rel(ResourceType::Countries, "users"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not a writable to-one"));

    shared.rollback().await.unwrap();
}

//! Storage primitives for relations, one branch per `Accessor`.
//!
//! Statements are built with sea-query against the table and column names
//! carried by the relation descriptor. Functions return `DbErr`; the repos
//! layer maps to `DomainError`.

use sea_orm::sea_query::{
    Alias, Cond, DeleteStatement, Expr, InsertStatement, Order, Query, SelectStatement,
    UpdateStatement,
};
use sea_orm::{ConnectionTrait, DbErr, QueryResult};

use crate::schema::{
    has_exclusive_inverse, Accessor, Computed, Pivot, RelationDescriptor, ResourceRef,
    ResourceType,
};

fn col(name: &str) -> Alias {
    Alias::new(name)
}

fn target(rel: &RelationDescriptor) -> Result<ResourceType, DbErr> {
    rel.single_type()
        .ok_or_else(|| DbErr::Custom(format!("relation {} has more than one target type", rel.name)))
}

fn morph_type(raw: &str, rel: &RelationDescriptor) -> Result<ResourceType, DbErr> {
    raw.parse::<ResourceType>()
        .ok()
        .filter(|ty| rel.accepts(*ty))
        .ok_or_else(|| DbErr::Type(format!("unexpected morph type '{raw}' for relation {}", rel.name)))
}

async fn select_rows<C: ConnectionTrait>(conn: &C, stmt: &SelectStatement) -> Result<Vec<QueryResult>, DbErr> {
    let backend = conn.get_database_backend();
    conn.query_all(backend.build(stmt)).await
}

async fn exec_update<C: ConnectionTrait>(conn: &C, stmt: &UpdateStatement) -> Result<u64, DbErr> {
    let backend = conn.get_database_backend();
    Ok(conn.execute(backend.build(stmt)).await?.rows_affected())
}

async fn exec_delete<C: ConnectionTrait>(conn: &C, stmt: &DeleteStatement) -> Result<u64, DbErr> {
    let backend = conn.get_database_backend();
    Ok(conn.execute(backend.build(stmt)).await?.rows_affected())
}

async fn exec_insert<C: ConnectionTrait>(conn: &C, stmt: &InsertStatement) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    conn.execute(backend.build(stmt)).await.map(|_| ())
}

/// Keys from a single `BIGINT` column, in row order.
async fn keys<C: ConnectionTrait>(conn: &C, stmt: &SelectStatement, column: &str) -> Result<Vec<i64>, DbErr> {
    select_rows(conn, stmt)
        .await?
        .iter()
        .map(|row| row.try_get::<i64>("", column))
        .collect()
}

fn morph_pair_matches(type_column: &str, id_column: &str, owner: ResourceRef) -> Cond {
    Cond::all()
        .add(Expr::col(col(type_column)).eq(owner.ty.as_str()))
        .add(Expr::col(col(id_column)).eq(owner.key))
}

/// Current members of `rel` on `owner`, in storage order.
///
/// To-one relations yield zero or one entry.
pub async fn related<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
) -> Result<Vec<ResourceRef>, DbErr> {
    match rel.accessor {
        Accessor::BelongsTo { foreign_key } => {
            let stmt = Query::select()
                .column(col(foreign_key))
                .from(col(owner.ty.table()))
                .and_where(Expr::col(col("id")).eq(owner.key))
                .to_owned();
            let ty = target(rel)?;
            let mut out = Vec::new();
            for row in select_rows(conn, &stmt).await? {
                if let Some(key) = row.try_get::<Option<i64>>("", foreign_key)? {
                    out.push(ResourceRef::new(ty, key));
                }
            }
            Ok(out)
        }
        Accessor::MorphTo { type_column, id_column } => {
            let stmt = Query::select()
                .columns([col(type_column), col(id_column)])
                .from(col(owner.ty.table()))
                .and_where(Expr::col(col("id")).eq(owner.key))
                .to_owned();
            let mut out = Vec::new();
            for row in select_rows(conn, &stmt).await? {
                let raw = row.try_get::<Option<String>>("", type_column)?;
                let key = row.try_get::<Option<i64>>("", id_column)?;
                if let (Some(raw), Some(key)) = (raw, key) {
                    out.push(ResourceRef::new(morph_type(&raw, rel)?, key));
                }
            }
            Ok(out)
        }
        Accessor::HasOne { foreign_key } | Accessor::HasMany { foreign_key } => {
            let ty = target(rel)?;
            let mut stmt = Query::select()
                .column(col("id"))
                .from(col(ty.table()))
                .and_where(Expr::col(col(foreign_key)).eq(owner.key))
                .order_by(col("id"), Order::Asc)
                .to_owned();
            if rel.is_to_one() {
                stmt.limit(1);
            }
            Ok(keys(conn, &stmt, "id")
                .await?
                .into_iter()
                .map(|key| ResourceRef::new(ty, key))
                .collect())
        }
        Accessor::MorphOne { type_column, id_column }
        | Accessor::MorphMany { type_column, id_column } => {
            let ty = target(rel)?;
            let mut stmt = Query::select()
                .column(col("id"))
                .from(col(ty.table()))
                .cond_where(morph_pair_matches(type_column, id_column, owner))
                .order_by(col("id"), Order::Asc)
                .to_owned();
            if rel.is_to_one() {
                stmt.limit(1);
            }
            Ok(keys(conn, &stmt, "id")
                .await?
                .into_iter()
                .map(|key| ResourceRef::new(ty, key))
                .collect())
        }
        Accessor::MorphToMany(pivot) => {
            let stmt = Query::select()
                .columns([col(pivot.morph_type_column), col(pivot.morph_id_column)])
                .from(col(pivot.table))
                .and_where(Expr::col(col(pivot.key_column)).eq(owner.key))
                .order_by(col("id"), Order::Asc)
                .to_owned();
            select_rows(conn, &stmt)
                .await?
                .iter()
                .map(|row| {
                    let raw = row.try_get::<String>("", pivot.morph_type_column)?;
                    let key = row.try_get::<i64>("", pivot.morph_id_column)?;
                    Ok(ResourceRef::new(morph_type(&raw, rel)?, key))
                })
                .collect()
        }
        Accessor::MorphedByMany(pivot) => {
            let ty = target(rel)?;
            let stmt = Query::select()
                .column(col(pivot.key_column))
                .from(col(pivot.table))
                .cond_where(morph_pair_matches(pivot.morph_type_column, pivot.morph_id_column, owner))
                .order_by(col("id"), Order::Asc)
                .to_owned();
            Ok(keys(conn, &stmt, pivot.key_column)
                .await?
                .into_iter()
                .map(|key| ResourceRef::new(ty, key))
                .collect())
        }
        Accessor::Computed(Computed::RelatedPosts) => related_posts(conn, owner).await,
        Accessor::Computed(Computed::RelatedVideo) => related_video(conn, owner).await,
    }
}

/// `None` when the post row is missing, `Some(None)` when it has no author.
async fn post_author<C: ConnectionTrait>(conn: &C, post: ResourceRef) -> Result<Option<Option<i64>>, DbErr> {
    let stmt = Query::select()
        .column(col("author_id"))
        .from(col(ResourceType::Posts.table()))
        .and_where(Expr::col(col("id")).eq(post.key))
        .to_owned();
    match select_rows(conn, &stmt).await?.first() {
        Some(row) => Ok(Some(row.try_get::<Option<i64>>("", "author_id")?)),
        None => Ok(None),
    }
}

/// Keys of `ty` rows tagged with any tag carried by `owner`.
fn sharing_a_tag(owner: ResourceRef, ty: ResourceType) -> SelectStatement {
    let owner_tags = Query::select()
        .column(col("tag_id"))
        .from(col("taggables"))
        .cond_where(morph_pair_matches("taggable_type", "taggable_id", owner))
        .to_owned();
    Query::select()
        .column(col("taggable_id"))
        .from(col("taggables"))
        .and_where(Expr::col(col("taggable_type")).eq(ty.as_str()))
        .and_where(Expr::col(col("tag_id")).in_subquery(owner_tags))
        .to_owned()
}

/// Lowest-keyed video sharing a tag with `owner` or uploaded by its author.
async fn related_video<C: ConnectionTrait>(conn: &C, owner: ResourceRef) -> Result<Vec<ResourceRef>, DbErr> {
    let Some(author) = post_author(conn, owner).await? else {
        return Ok(Vec::new());
    };
    let videos = ResourceType::Videos;

    let mut any = Cond::any().add(Expr::col(col("id")).in_subquery(sharing_a_tag(owner, videos)));
    if let Some(author) = author {
        any = any.add(Expr::col(col("user_id")).eq(author));
    }

    let stmt = Query::select()
        .column(col("id"))
        .from(col(videos.table()))
        .cond_where(any)
        .order_by(col("id"), Order::Asc)
        .limit(1)
        .to_owned();
    Ok(keys(conn, &stmt, "id")
        .await?
        .into_iter()
        .map(|key| ResourceRef::new(videos, key))
        .collect())
}

/// Posts sharing a tag or the author with `owner`, by key.
async fn related_posts<C: ConnectionTrait>(conn: &C, owner: ResourceRef) -> Result<Vec<ResourceRef>, DbErr> {
    let Some(author) = post_author(conn, owner).await? else {
        return Ok(Vec::new());
    };
    let posts = ResourceType::Posts;

    let mut any = Cond::any().add(Expr::col(col("id")).in_subquery(sharing_a_tag(owner, posts)));
    if let Some(author) = author {
        any = any.add(Expr::col(col("author_id")).eq(author));
    }

    let stmt = Query::select()
        .column(col("id"))
        .from(col(posts.table()))
        .and_where(Expr::col(col("id")).ne(owner.key))
        .cond_where(any)
        .order_by(col("id"), Order::Asc)
        .to_owned();
    Ok(keys(conn, &stmt, "id")
        .await?
        .into_iter()
        .map(|key| ResourceRef::new(posts, key))
        .collect())
}

fn key_list(members: &[ResourceRef]) -> Vec<i64> {
    members.iter().map(|m| m.key).collect()
}

fn pivot_insert(pivot: Pivot, key: i64, morph: ResourceRef) -> Result<InsertStatement, DbErr> {
    let mut stmt = Query::insert();
    stmt.into_table(col(pivot.table))
        .columns([
            col(pivot.key_column),
            col(pivot.morph_type_column),
            col(pivot.morph_id_column),
        ])
        .values([key.into(), morph.ty.as_str().into(), morph.key.into()])
        .map_err(|e| DbErr::Custom(e.to_string()))?;
    Ok(stmt)
}

/// Link `members` to `owner` on a to-many relation.
///
/// Pivot rows are inserted one by one so insertion order follows `members`.
pub async fn attach<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<(), DbErr> {
    if members.is_empty() {
        return Ok(());
    }
    match rel.accessor {
        Accessor::HasMany { foreign_key } => {
            let stmt = Query::update()
                .table(col(target(rel)?.table()))
                .value(col(foreign_key), owner.key)
                .and_where(Expr::col(col("id")).is_in(key_list(members)))
                .to_owned();
            exec_update(conn, &stmt).await.map(|_| ())
        }
        Accessor::MorphMany { type_column, id_column } => {
            let stmt = Query::update()
                .table(col(target(rel)?.table()))
                .value(col(type_column), owner.ty.as_str())
                .value(col(id_column), owner.key)
                .and_where(Expr::col(col("id")).is_in(key_list(members)))
                .to_owned();
            exec_update(conn, &stmt).await.map(|_| ())
        }
        Accessor::MorphToMany(pivot) => {
            for member in members {
                exec_insert(conn, &pivot_insert(pivot, owner.key, *member)?).await?;
            }
            Ok(())
        }
        Accessor::MorphedByMany(pivot) => {
            for member in members {
                exec_insert(conn, &pivot_insert(pivot, member.key, owner)?).await?;
            }
            Ok(())
        }
        _ => Err(DbErr::Custom(format!("relation {} is not a writable to-many", rel.name))),
    }
}

/// Unlink `members` from `owner` on a to-many relation. Rows that do not
/// currently point at `owner` are left alone.
pub async fn detach<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    members: &[ResourceRef],
) -> Result<u64, DbErr> {
    if members.is_empty() {
        return Ok(0);
    }
    match rel.accessor {
        Accessor::HasMany { foreign_key } => {
            let stmt = Query::update()
                .table(col(target(rel)?.table()))
                .value(col(foreign_key), Option::<i64>::None)
                .and_where(Expr::col(col("id")).is_in(key_list(members)))
                .and_where(Expr::col(col(foreign_key)).eq(owner.key))
                .to_owned();
            exec_update(conn, &stmt).await
        }
        Accessor::MorphMany { type_column, id_column } => {
            let stmt = Query::update()
                .table(col(target(rel)?.table()))
                .value(col(type_column), Option::<String>::None)
                .value(col(id_column), Option::<i64>::None)
                .and_where(Expr::col(col("id")).is_in(key_list(members)))
                .cond_where(morph_pair_matches(type_column, id_column, owner))
                .to_owned();
            exec_update(conn, &stmt).await
        }
        Accessor::MorphToMany(pivot) => {
            let any_member = members.iter().fold(Cond::any(), |cond, m| {
                cond.add(morph_pair_matches(pivot.morph_type_column, pivot.morph_id_column, *m))
            });
            let stmt = Query::delete()
                .from_table(col(pivot.table))
                .and_where(Expr::col(col(pivot.key_column)).eq(owner.key))
                .cond_where(any_member)
                .to_owned();
            exec_delete(conn, &stmt).await
        }
        Accessor::MorphedByMany(pivot) => {
            let stmt = Query::delete()
                .from_table(col(pivot.table))
                .cond_where(morph_pair_matches(pivot.morph_type_column, pivot.morph_id_column, owner))
                .and_where(Expr::col(col(pivot.key_column)).is_in(key_list(members)))
                .to_owned();
            exec_delete(conn, &stmt).await
        }
        _ => Err(DbErr::Custom(format!("relation {} is not a writable to-many", rel.name))),
    }
}

/// Clear a to-one relation on `owner`.
///
/// For inverse relations every row pointing at `owner` is cleared; the
/// rows themselves are kept.
pub async fn dissociate<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
) -> Result<u64, DbErr> {
    let stmt = match rel.accessor {
        Accessor::BelongsTo { foreign_key } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(foreign_key), Option::<i64>::None)
            .and_where(Expr::col(col("id")).eq(owner.key))
            .to_owned(),
        Accessor::MorphTo { type_column, id_column } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(type_column), Option::<String>::None)
            .value(col(id_column), Option::<i64>::None)
            .and_where(Expr::col(col("id")).eq(owner.key))
            .to_owned(),
        Accessor::HasOne { foreign_key } => Query::update()
            .table(col(target(rel)?.table()))
            .value(col(foreign_key), Option::<i64>::None)
            .and_where(Expr::col(col(foreign_key)).eq(owner.key))
            .to_owned(),
        Accessor::MorphOne { type_column, id_column } => Query::update()
            .table(col(target(rel)?.table()))
            .value(col(type_column), Option::<String>::None)
            .value(col(id_column), Option::<i64>::None)
            .cond_where(morph_pair_matches(type_column, id_column, owner))
            .to_owned(),
        _ => return Err(DbErr::Custom(format!("relation {} is not a writable to-one", rel.name))),
    };
    exec_update(conn, &stmt).await
}

/// Clear the pointer on every other `owner.ty` row that holds `related`
/// through `rel`.
async fn release_other_holders<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    related: ResourceRef,
) -> Result<u64, DbErr> {
    let stmt = match rel.accessor {
        Accessor::BelongsTo { foreign_key } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(foreign_key), Option::<i64>::None)
            .and_where(Expr::col(col(foreign_key)).eq(related.key))
            .and_where(Expr::col(col("id")).ne(owner.key))
            .to_owned(),
        Accessor::MorphTo { type_column, id_column } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(type_column), Option::<String>::None)
            .value(col(id_column), Option::<i64>::None)
            .cond_where(morph_pair_matches(type_column, id_column, related))
            .and_where(Expr::col(col("id")).ne(owner.key))
            .to_owned(),
        _ => return Ok(0),
    };
    exec_update(conn, &stmt).await
}

/// Point a to-one relation on `owner` at `related`.
///
/// Inverse relations clear the previous holder first, then move `related`
/// onto `owner` (away from whatever it pointed at before). Owner-side
/// relations whose target reads them back as has-one or morph-one release
/// any other row holding `related`.
pub async fn associate<C: ConnectionTrait>(
    conn: &C,
    owner: ResourceRef,
    rel: &RelationDescriptor,
    related: ResourceRef,
) -> Result<(), DbErr> {
    if has_exclusive_inverse(owner.ty, rel, related.ty) {
        release_other_holders(conn, owner, rel, related).await?;
    }
    let stmt = match rel.accessor {
        Accessor::BelongsTo { foreign_key } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(foreign_key), related.key)
            .and_where(Expr::col(col("id")).eq(owner.key))
            .to_owned(),
        Accessor::MorphTo { type_column, id_column } => Query::update()
            .table(col(owner.ty.table()))
            .value(col(type_column), related.ty.as_str())
            .value(col(id_column), related.key)
            .and_where(Expr::col(col("id")).eq(owner.key))
            .to_owned(),
        Accessor::HasOne { foreign_key } => {
            dissociate(conn, owner, rel).await?;
            Query::update()
                .table(col(related.ty.table()))
                .value(col(foreign_key), owner.key)
                .and_where(Expr::col(col("id")).eq(related.key))
                .to_owned()
        }
        Accessor::MorphOne { type_column, id_column } => {
            dissociate(conn, owner, rel).await?;
            Query::update()
                .table(col(related.ty.table()))
                .value(col(type_column), owner.ty.as_str())
                .value(col(id_column), owner.key)
                .and_where(Expr::col(col("id")).eq(related.key))
                .to_owned()
        }
        _ => return Err(DbErr::Custom(format!("relation {} is not a writable to-one", rel.name))),
    };
    exec_update(conn, &stmt).await.map(|_| ())
}

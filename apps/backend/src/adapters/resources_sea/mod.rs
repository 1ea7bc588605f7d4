//! SeaORM adapter for resources: route key lookup, loading into resource
//! objects, and attribute writes.

use std::collections::HashMap;

use sea_orm::sea_query::{Alias, Expr, LikeExpr, Order, Query, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    NotSet, QueryFilter, QueryOrder, Set, Unchanged,
};
use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;

use crate::entities::{comments, countries, images, phones, posts, tags, users, videos};
use crate::jsonapi::document::ResourceObject;
use crate::schema::{FilterMode, FilterSpec, ResourceRef, ResourceType, SortSpec};

pub mod dto;

pub use dto::ResourceAttributes;

/// A stored model that can be rendered as a JSON:API resource object.
pub trait ResourceModel {
    fn key(&self) -> i64;

    fn route_id(&self) -> String {
        self.key().to_string()
    }

    fn attributes(&self) -> Map<String, Value>;
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl ResourceModel for countries::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({ "name": self.name, "code": self.code }))
    }
}

impl ResourceModel for users::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({
            "name": self.name,
            "email": self.email,
            "author": self.author,
            "admin": self.admin,
        }))
    }
}

impl ResourceModel for phones::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({ "number": self.number }))
    }
}

impl ResourceModel for posts::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        let published_at = self.published_at.and_then(|at| at.format(&Rfc3339).ok());
        object(json!({
            "title": self.title,
            "slug": self.slug,
            "content": self.content,
            "publishedAt": published_at,
            "published": self.published_at.is_some(),
        }))
    }
}

impl ResourceModel for images::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({ "url": self.url }))
    }
}

impl ResourceModel for comments::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({ "content": self.content }))
    }
}

impl ResourceModel for tags::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn route_id(&self) -> String {
        self.uuid.clone()
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({ "name": self.name }))
    }
}

impl ResourceModel for videos::Model {
    fn key(&self) -> i64 {
        self.id
    }

    fn attributes(&self) -> Map<String, Value> {
        object(json!({
            "url": self.url,
            "title": self.title,
            "description": self.description,
        }))
    }
}

/// Storage key of the resource addressed by `route_id`, if it exists.
pub async fn find_key<C: ConnectionTrait>(
    conn: &C,
    ty: ResourceType,
    route_id: &str,
) -> Result<Option<i64>, DbErr> {
    let matches: SimpleExpr = if ty.route_key_is_storage_key() {
        // only the canonical spelling addresses a row ("007" and "+7" do not)
        match route_id.parse::<i64>() {
            Ok(key) if key.to_string() == route_id => Expr::col(Alias::new("id")).eq(key),
            _ => return Ok(None),
        }
    } else {
        Expr::col(Alias::new(ty.route_key())).eq(route_id)
    };

    let stmt = Query::select()
        .column(Alias::new("id"))
        .from(Alias::new(ty.table()))
        .and_where(matches)
        .limit(1)
        .to_owned();
    let backend = conn.get_database_backend();
    match conn.query_one(backend.build(&stmt)).await? {
        Some(row) => Ok(Some(row.try_get::<i64>("", "id")?)),
        None => Ok(None),
    }
}

const LIKE_ESCAPE: char = '!';

/// Client values match literally inside `LIKE` patterns.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

fn filter_expr(spec: &FilterSpec, value: &str) -> SimpleExpr {
    let column = Expr::col(Alias::new(spec.column));
    let literal = escape_like(value);
    match spec.mode {
        FilterMode::Contains => column.like(LikeExpr::new(format!("%{literal}%")).escape(LIKE_ESCAPE)),
        FilterMode::Prefix => column.like(LikeExpr::new(format!("{literal}%")).escape(LIKE_ESCAPE)),
        FilterMode::Equals => column.eq(value),
    }
}

/// Criteria applied when loading a related collection.
#[derive(Debug, Default, Clone)]
pub struct LoadCriteria<'a> {
    pub filters: Vec<(&'static FilterSpec, &'a str)>,
    pub sorts: Vec<(&'static SortSpec, bool)>,
}

async fn fetch<E, C>(
    conn: &C,
    ty: ResourceType,
    keys: &[i64],
    criteria: &LoadCriteria<'_>,
) -> Result<Vec<(ResourceRef, ResourceObject)>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: ResourceModel,
{
    let mut select = E::find().filter(Expr::col(Alias::new("id")).is_in(keys.iter().copied()));
    for (spec, value) in &criteria.filters {
        select = select.filter(filter_expr(spec, value));
    }
    for (spec, descending) in &criteria.sorts {
        let order = if *descending { Order::Desc } else { Order::Asc };
        select = select.order_by(Expr::col(Alias::new(spec.column)), order);
    }

    let mut models = select.all(conn).await?;
    if criteria.sorts.is_empty() {
        let position: HashMap<i64, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        models.sort_by_key(|m| position.get(&m.key()).copied().unwrap_or(usize::MAX));
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let reference = ResourceRef::new(ty, m.key());
            (reference, ResourceObject::new(ty, m.route_id(), m.attributes()))
        })
        .collect())
}

/// Load resources of one type by storage key.
///
/// Without sorts the result follows the order of `keys`; rows excluded by
/// filters are dropped.
pub async fn load<C: ConnectionTrait>(
    conn: &C,
    ty: ResourceType,
    keys: &[i64],
    criteria: &LoadCriteria<'_>,
) -> Result<Vec<(ResourceRef, ResourceObject)>, DbErr> {
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    match ty {
        ResourceType::Countries => fetch::<countries::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Users => fetch::<users::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Phones => fetch::<phones::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Posts => fetch::<posts::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Images => fetch::<images::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Comments => fetch::<comments::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Tags => fetch::<tags::Entity, _>(conn, ty, keys, criteria).await,
        ResourceType::Videos => fetch::<videos::Entity, _>(conn, ty, keys, criteria).await,
    }
}

/// Load a mixed list of references, keeping their order.
pub async fn load_refs<C: ConnectionTrait>(
    conn: &C,
    refs: &[ResourceRef],
) -> Result<Vec<(ResourceRef, ResourceObject)>, DbErr> {
    let mut by_type: HashMap<ResourceType, Vec<i64>> = HashMap::new();
    for r in refs {
        by_type.entry(r.ty).or_default().push(r.key);
    }

    let mut loaded: HashMap<ResourceRef, ResourceObject> = HashMap::new();
    for (ty, keys) in by_type {
        for (reference, object) in load(conn, ty, &keys, &LoadCriteria::default()).await? {
            loaded.insert(reference, object);
        }
    }

    Ok(refs
        .iter()
        .filter_map(|r| loaded.get(r).map(|o| (*r, o.clone())))
        .collect())
}

fn set_if<T>(value: Option<T>) -> sea_orm::ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        Some(v) => Set(v),
        None => NotSet,
    }
}

/// Insert a resource; returns its storage key.
pub async fn insert<C: ConnectionTrait>(conn: &C, attributes: ResourceAttributes) -> Result<i64, DbErr> {
    let missing = |field: &str| DbErr::Custom(format!("attribute {field} is required"));

    let key = match attributes {
        ResourceAttributes::Countries(a) => {
            countries::ActiveModel {
                id: NotSet,
                name: Set(a.name.ok_or_else(|| missing("name"))?),
                code: Set(a.code.ok_or_else(|| missing("code"))?),
            }
            .insert(conn)
            .await?
            .id
        }
        ResourceAttributes::Users(a) => {
            users::ActiveModel {
                id: NotSet,
                name: Set(a.name.ok_or_else(|| missing("name"))?),
                email: Set(a.email.ok_or_else(|| missing("email"))?),
                password: Set(a.password.ok_or_else(|| missing("password"))?),
                author: Set(a.author.unwrap_or(false)),
                admin: Set(a.admin.unwrap_or(false)),
                country_id: Set(None),
            }
            .insert(conn)
            .await?
            .id
        }
        ResourceAttributes::Posts(a) => {
            posts::ActiveModel {
                id: NotSet,
                title: Set(a.title.ok_or_else(|| missing("title"))?),
                slug: Set(a.slug.ok_or_else(|| missing("slug"))?),
                content: Set(a.content.ok_or_else(|| missing("content"))?),
                author_id: Set(None),
                published_at: Set(a.published_at),
            }
            .insert(conn)
            .await?
            .id
        }
        ResourceAttributes::Tags(a) => {
            tags::ActiveModel {
                id: NotSet,
                uuid: Set(uuid::Uuid::new_v4().to_string()),
                name: Set(a.name.ok_or_else(|| missing("name"))?),
            }
            .insert(conn)
            .await?
            .id
        }
        ResourceAttributes::Videos(a) => {
            videos::ActiveModel {
                id: NotSet,
                uuid: Set(uuid::Uuid::new_v4().to_string()),
                url: Set(a.url.ok_or_else(|| missing("url"))?),
                title: Set(a.title.ok_or_else(|| missing("title"))?),
                description: Set(a.description.ok_or_else(|| missing("description"))?),
                user_id: Set(None),
            }
            .insert(conn)
            .await?
            .id
        }
        ResourceAttributes::Images(a) => {
            images::ActiveModel {
                id: NotSet,
                url: Set(a.url.ok_or_else(|| missing("url"))?),
                imageable_type: Set(None),
                imageable_id: Set(None),
            }
            .insert(conn)
            .await?
            .id
        }
    };
    Ok(key)
}

/// Write the attributes present in `attributes`; relation columns are
/// never touched here.
pub async fn update<C: ConnectionTrait>(conn: &C, key: i64, attributes: ResourceAttributes) -> Result<(), DbErr> {
    match attributes {
        ResourceAttributes::Countries(a) => {
            let model = countries::ActiveModel {
                id: Unchanged(key),
                name: set_if(a.name),
                code: set_if(a.code),
            };
            save_changes(conn, model).await
        }
        ResourceAttributes::Users(a) => {
            let model = users::ActiveModel {
                id: Unchanged(key),
                name: set_if(a.name),
                email: set_if(a.email),
                password: set_if(a.password),
                author: set_if(a.author),
                admin: set_if(a.admin),
                country_id: NotSet,
            };
            save_changes(conn, model).await
        }
        ResourceAttributes::Posts(a) => {
            let model = posts::ActiveModel {
                id: Unchanged(key),
                title: set_if(a.title),
                slug: set_if(a.slug),
                content: set_if(a.content),
                author_id: NotSet,
                published_at: match a.published_at {
                    Some(at) => Set(Some(at)),
                    None => NotSet,
                },
            };
            save_changes(conn, model).await
        }
        ResourceAttributes::Tags(a) => {
            let model = tags::ActiveModel {
                id: Unchanged(key),
                uuid: NotSet,
                name: set_if(a.name),
            };
            save_changes(conn, model).await
        }
        ResourceAttributes::Videos(a) => {
            let model = videos::ActiveModel {
                id: Unchanged(key),
                uuid: NotSet,
                url: set_if(a.url),
                title: set_if(a.title),
                description: set_if(a.description),
                user_id: NotSet,
            };
            save_changes(conn, model).await
        }
        ResourceAttributes::Images(a) => {
            let model = images::ActiveModel {
                id: Unchanged(key),
                url: set_if(a.url),
                imageable_type: NotSet,
                imageable_id: NotSet,
            };
            save_changes(conn, model).await
        }
    }
}

async fn save_changes<A, C>(conn: &C, model: A) -> Result<(), DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    if !model.is_changed() {
        return Ok(());
    }
    model.update(conn).await.map(|_| ())
}

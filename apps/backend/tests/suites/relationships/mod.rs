mod polymorphic;
mod resources;
mod scenarios;

use linkage::db::require_db;
use linkage::db::txn::SharedTxn;
use linkage::jsonapi::document::{RelationshipData, RelationshipDocument};
use linkage::jsonapi::query::QueryParams;
use linkage::relationships::{Operation, Owner};
use linkage::repos::relations;
use linkage::schema::{relation, ResourceRef, ResourceType};
use linkage::services::relationships::RelationshipService;
use linkage::state::app_state::AppState;
use linkage::AppError;
use sea_orm::DatabaseTransaction;
use serde_json::{json, Value};

use crate::support::test_state::build_test_state;

/// A fresh database and one open transaction around it.
pub struct Harness {
    _state: AppState,
    shared: SharedTxn,
}

impl Harness {
    pub async fn new() -> Self {
        let state = build_test_state().await.expect("test state should build");
        let db = require_db(&state).expect("test state should have a database");
        let shared = SharedTxn::open(db).await.expect("transaction should open");
        Self {
            _state: state,
            shared,
        }
    }

    pub fn txn(&self) -> &DatabaseTransaction {
        self.shared.transaction()
    }

    /// Resolve and write `data` (the value of a document's `data` member).
    pub async fn apply(
        &self,
        owner: ResourceRef,
        name: &str,
        operation: Operation,
        data: Value,
    ) -> Result<(), AppError> {
        let rel = relation(owner.ty, name).expect("relation should exist");
        let data = RelationshipData::parse(&data, "/data")?;
        RelationshipService::new()
            .resolve_and_apply(self.txn(), owner, rel, operation, &data, "/data")
            .await
    }

    /// Current members straight from storage.
    pub async fn members(&self, owner: ResourceRef, name: &str) -> Vec<ResourceRef> {
        let rel = relation(owner.ty, name).expect("relation should exist");
        relations::related(self.txn(), owner, rel)
            .await
            .expect("related should load")
    }

    pub async fn read_relationship(
        &self,
        owner: ResourceRef,
        route_id: &str,
        name: &str,
        query: &QueryParams,
    ) -> Result<RelationshipDocument, AppError> {
        let rel = relation(owner.ty, name).expect("relation should exist");
        let owner = Owner {
            reference: owner,
            route_id,
        };
        RelationshipService::new()
            .read_relationship(self.txn(), owner, rel, query)
            .await
    }

    pub async fn read_related(
        &self,
        owner: ResourceRef,
        route_id: &str,
        name: &str,
        query: &QueryParams,
    ) -> Result<Value, AppError> {
        let rel = relation(owner.ty, name).expect("relation should exist");
        let owner = Owner {
            reference: owner,
            route_id,
        };
        let doc = RelationshipService::new()
            .read_related(self.txn(), owner, rel, query)
            .await?;
        Ok(serde_json::to_value(doc).expect("document should serialize"))
    }

    pub async fn finish(self) {
        self.shared.rollback().await.expect("rollback should succeed");
    }
}

pub fn query(pairs: &[(&str, &str)]) -> QueryParams {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    QueryParams::parse(&owned).expect("query should parse")
}

pub fn identifier(ty: ResourceType, id: impl ToString) -> Value {
    json!({ "type": ty.as_str(), "id": id.to_string() })
}

pub fn identifiers(refs: &[ResourceRef]) -> Value {
    Value::Array(refs.iter().map(|r| identifier(r.ty, r.key)).collect())
}

pub fn users(keys: &[i64]) -> Vec<ResourceRef> {
    keys.iter()
        .map(|k| ResourceRef::new(ResourceType::Users, *k))
        .collect()
}

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::warn;

use super::txn_policy::{self, TxnPolicy};
use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A transaction shared through request extensions.
///
/// When present, `with_txn` runs inside it and leaves commit/rollback to the
/// owner (tests use this to seed and assert inside one transaction).
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    pub async fn open(db: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self(Arc::new(db.begin().await?)))
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Make this transaction visible to `with_txn` for `req`.
    pub fn inject(&self, req: &mut HttpRequest) {
        req.extensions_mut().insert(self.clone());
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        let txn = Arc::try_unwrap(self.0).map_err(|_| {
            AppError::internal("shared transaction still referenced at rollback")
        })?;
        txn.rollback().await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), AppError> {
        let txn = Arc::try_unwrap(self.0).map_err(|_| {
            AppError::internal("shared transaction still referenced at commit")
        })?;
        txn.commit().await?;
        Ok(())
    }
}

/// Run `f` inside one database transaction.
///
/// 1) SharedTxn in request extensions: run inside it, no commit/rollback here
/// 2) Otherwise: begin, run, apply the txn policy on Ok, roll back on Err
pub async fn with_txn<R, F>(req: Option<&HttpRequest>, state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> LocalBoxFuture<'t, Result<R, AppError>>,
{
    // Clone out of extensions before awaiting so no RefCell borrow is held.
    let shared_txn = req.and_then(|r| r.extensions().get::<SharedTxn>().cloned());

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let txn = require_db(state)?.begin().await?;

    let out = f(&txn).await;
    match out {
        Ok(val) => {
            match txn_policy::current() {
                TxnPolicy::CommitOnOk => txn.commit().await?,
                TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // preserve the original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback after failed transaction also failed");
            }
            Err(err)
        }
    }
}

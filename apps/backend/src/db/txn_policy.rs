use std::sync::OnceLock;

/// What `with_txn` does with a transaction whose closure succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit (default)
    CommitOnOk,
    /// Roll back; lets test binaries exercise handlers without leaving data behind
    RollbackOnOk,
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

/// Current policy; `CommitOnOk` until something sets it.
pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the policy for the process. First call wins.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}

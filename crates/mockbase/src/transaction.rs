//! Optimistic transactions against the simulated server
//!
//! A transaction resolves in a single synchronous pass:
//!
//! ```text
//! Pending ──server rejects──────────────▶ Aborted (snapshot of current value)
//!    │
//!    └──update(current)──┬── None ──────▶ Aborted (empty snapshot)
//!                        └── Some(v) ───▶ Committed (v written, snapshot of v)
//! ```
//!
//! Whether the server accepts is not decided by contention but by the
//! cursor's `transaction_success` flag.

use crate::Snapshot;
use mockbase_core::Value;

/// Outcome of a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    /// Whether the new value was written
    pub committed: bool,
    /// The value the transaction ended with
    pub snapshot: Snapshot,
}

/// Decision reached for a pending transaction
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolution {
    /// Write this value, then report it as committed
    Commit(Value),
    /// Report without writing
    Abort(Snapshot),
}

/// Run the update function (if the server accepts) and decide the outcome
///
/// The update function is not called at all when the server rejects.
pub(crate) fn resolve<F>(
    key: Option<String>,
    current: Value,
    accepted: bool,
    update: F,
) -> Resolution
where
    F: FnOnce(Value) -> Option<Value>,
{
    if !accepted {
        return Resolution::Abort(Snapshot::new(key, current));
    }

    match update(current) {
        Some(value) => Resolution::Commit(value),
        None => Resolution::Abort(Snapshot::new(key, Value::Null)),
    }
}

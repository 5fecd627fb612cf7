//! Cursors into the shared tree

use crate::database::Shared;
use crate::event::{EventType, Listener};
use crate::transaction::{self, Resolution, TransactionOutcome};
use crate::{Deferred, Snapshot};
use futures::future;
use log::debug;
use mockbase_core::{clean, tree, Address, Error, Result, Value};
use std::fmt;
use std::rc::Rc;

/// A cursor at one address of a [`Database`](crate::Database)
///
/// Cursors are cheap: an address plus a handle to the shared state.
/// Navigating returns a new cursor and never touches `self`.
///
/// Reads and writes return a [`Deferred`] that has already settled by the
/// time the call returns, so listeners fired by a write have run before the
/// caller sees its result.
#[derive(Clone)]
pub struct Reference {
    shared: Rc<Shared>,
    address: Address,
    transaction_success: bool,
}

impl Reference {
    pub(crate) fn new(shared: Rc<Shared>, address: Address, transaction_success: bool) -> Self {
        Self {
            shared,
            address,
            transaction_success,
        }
    }

    fn at(&self, address: Address) -> Self {
        Self::new(Rc::clone(&self.shared), address, self.transaction_success)
    }

    // ---- Navigation ----

    /// Cursor at a `/`-separated path below this one
    pub fn child(&self, path: &str) -> Reference {
        self.at(self.address.child(path))
    }

    /// Cursor one level up
    ///
    /// Fails with `InvalidOperation` at the root.
    pub fn parent(&self) -> Result<Reference> {
        let address = self
            .address
            .parent()
            .ok_or_else(|| Error::InvalidOperation("cannot call parent on root".into()))?;
        Ok(self.at(address))
    }

    /// Cursor at the root of the same database
    pub fn root(&self) -> Reference {
        self.at(Address::root())
    }

    /// Last segment of the address, `None` for the root
    pub fn key(&self) -> Option<&str> {
        self.address.last()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether transactions through this cursor are accepted
    ///
    /// Cursors derived from this one inherit the setting.
    pub fn transaction_success(&self) -> bool {
        self.transaction_success
    }

    pub fn set_transaction_success(&mut self, success: bool) {
        self.transaction_success = success;
    }

    // ---- Reads ----

    /// Value at this address, null when there is none
    pub fn current(&self) -> Value {
        self.shared.read(&self.address)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.key().map(str::to_string), self.current())
    }

    /// Read the value once
    ///
    /// Only [`EventType::Value`] is supported.
    pub fn once(&self, event: EventType) -> Deferred<Snapshot> {
        future::ready(self.read_once(event))
    }

    /// Read the value once and hand it to `callback` right away
    pub fn once_with(&self, event: EventType, callback: impl FnOnce(&Snapshot)) -> Result<()> {
        let snapshot = self.read_once(event)?;
        callback(&snapshot);
        Ok(())
    }

    fn read_once(&self, event: EventType) -> Result<Snapshot> {
        match event {
            EventType::Value => Ok(self.snapshot()),
            other => Err(Error::UnsupportedEventType(other.to_string())),
        }
    }

    // ---- Writes ----

    /// Replace the value at this address
    ///
    /// Writing null deletes the key.
    pub fn set(&self, value: impl Into<Value>) -> Deferred<()> {
        future::ready(self.write(value.into()))
    }

    /// Delete the value at this address
    pub fn remove(&self) -> Deferred<()> {
        self.set(Value::Null)
    }

    /// Merge `updates` into the map at this address
    ///
    /// Keys in `updates` overwrite existing keys, other keys are kept, and
    /// the merged map is deep-cleaned before it is written. Anything but a
    /// map fails with `InvalidArgument`.
    pub fn update(&self, updates: impl Into<Value>) -> Deferred<()> {
        future::ready(self.merge(updates.into()))
    }

    fn merge(&self, updates: Value) -> Result<()> {
        let Value::Map(updates) = updates else {
            return Err(Error::InvalidArgument(format!(
                "expected map, got {}",
                updates.type_name()
            )));
        };

        let mut merged = match self.current() {
            Value::Map(map) => map,
            _ => Default::default(),
        };
        merged.extend(updates);
        clean::deep_clean(&mut merged);

        self.write(Value::Map(merged))
    }

    /// Add `value` under a newly generated key
    ///
    /// The address must already hold a map. A null value is stored as an
    /// empty map and lists as index-keyed maps. `child_added` listeners at
    /// this address have been called by the time this returns.
    pub fn push(&self, value: impl Into<Value>) -> Deferred<Snapshot> {
        future::ready(self.insert(value.into()))
    }

    fn insert(&self, value: Value) -> Result<Snapshot> {
        let child = if value.is_null() {
            Value::empty_map()
        } else {
            clean::index_lists(value)
        };

        let key = {
            let mut root = self.shared.tree.borrow_mut();
            let existing = tree::resolve_mut(&mut root, &self.address).and_then(Value::as_map_mut);
            let Some(existing) = existing else {
                return Err(Error::InvalidOperation(format!("no item at path {}", self.address)));
            };
            let key = self.shared.free_key(existing)?;
            existing.insert(key.clone(), child.clone());
            key
        };
        debug!("pushed {} at {}", key, self.address);

        let snapshot = Snapshot::new(Some(key.clone()), child);
        self.shared.notify_child_added(&self.address, &snapshot);
        self.shared.notify_value(&self.address.child(&key));
        Ok(snapshot)
    }

    fn write(&self, value: Value) -> Result<()> {
        debug!("set {} = {}", self.address, value);
        tree::assign(&mut self.shared.tree.borrow_mut(), &self.address, value);
        self.shared.notify_value(&self.address);
        Ok(())
    }

    // ---- Transactions ----

    /// Atomically replace the value with the result of `update`
    ///
    /// `update` receives the current value (null when absent) and returns
    /// the new value, or `None` to abort. When this cursor's
    /// `transaction_success` is false the simulated server rejects and
    /// `update` is never called.
    pub fn transaction<F>(&self, update: F) -> Deferred<TransactionOutcome>
    where
        F: FnOnce(Value) -> Option<Value>,
    {
        future::ready(self.run_transaction(update))
    }

    /// Like [`transaction`](Self::transaction), reporting through a callback
    ///
    /// The callback receives `(error, committed, snapshot)`; on failure it
    /// gets the error, `false` and an empty snapshot.
    pub fn transaction_with<F, C>(&self, update: F, on_complete: C)
    where
        F: FnOnce(Value) -> Option<Value>,
        C: FnOnce(Option<&Error>, bool, Snapshot),
    {
        match self.run_transaction(update) {
            Ok(outcome) => on_complete(None, outcome.committed, outcome.snapshot),
            Err(e) => on_complete(Some(&e), false, Snapshot::default()),
        }
    }

    fn run_transaction<F>(&self, update: F) -> Result<TransactionOutcome>
    where
        F: FnOnce(Value) -> Option<Value>,
    {
        let key = self.key().map(str::to_string);
        let outcome = match transaction::resolve(
            key.clone(),
            self.current(),
            self.transaction_success,
            update,
        ) {
            Resolution::Abort(snapshot) => TransactionOutcome {
                committed: false,
                snapshot,
            },
            Resolution::Commit(value) => {
                let value = clean::index_lists(value);
                self.write(value.clone())?;
                TransactionOutcome {
                    committed: true,
                    snapshot: Snapshot::new(key, value),
                }
            }
        };
        let status = if outcome.committed {
            "committed"
        } else {
            "aborted"
        };
        debug!("transaction at {} {}", self.address, status);
        Ok(outcome)
    }

    // ---- Listeners ----

    /// Register `listener` for `event` at this address
    ///
    /// The same handle may be registered more than once and is then called
    /// once per registration.
    pub fn on(&self, event: EventType, listener: &Listener) {
        self.shared
            .registry
            .borrow_mut()
            .add(&self.address, event, listener.clone());
    }

    /// Unregister listeners for `event` at this address
    ///
    /// Without a listener the whole list for `event` is dropped; with one,
    /// every registration of that handle is removed. Fails with `NotFound`
    /// when nothing was ever registered here for `event`.
    pub fn off(&self, event: EventType, listener: Option<&Listener>) -> Result<()> {
        self.shared
            .registry
            .borrow_mut()
            .remove(&self.address, event, listener)
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("address", &self.address)
            .field("transaction_success", &self.transaction_success)
            .finish()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

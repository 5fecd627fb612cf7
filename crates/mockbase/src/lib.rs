//! Mockbase - In-memory realtime tree database
//!
//! Emulates the client surface of a hosted realtime tree database closely
//! enough to drive deterministic tests of code written against it:
//! - [`Database`] owns one tree; [`Reference`] cursors address into it
//! - `set`, `update` (merge + deep-clean) and `push` (generated keys)
//! - Optimistic [`transaction`](Reference::transaction)s with a simulated
//!   server verdict
//! - `on`/`off` listeners fired synchronously by writes
//!
//! Everything runs on the caller's stack. Operations that are asynchronous in
//! a real client return a [`Deferred`], which is already settled when the call
//! returns.
//!
//! ## Example
//!
//! ```
//! use futures::executor::block_on;
//! use mockbase::{Database, EventType, Listener, Value};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let db = Database::new(Value::object([("messages", Value::empty_map())]));
//! let messages = db.reference("messages");
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let listener = Listener::new(move |snap| sink.borrow_mut().push(snap.val().clone()));
//! messages.on(EventType::ChildAdded, &listener);
//!
//! let snap = block_on(messages.push(Value::object([("text", "hi")]))).unwrap();
//! assert!(snap.exists());
//! assert_eq!(*seen.borrow(), vec![Value::object([("text", "hi")])]);
//! ```

mod config;
mod database;
mod event;
mod reference;
mod snapshot;
mod transaction;

pub use config::DatabaseConfig;
pub use database::Database;
pub use event::{EventRegistry, EventType, Listener};
pub use reference::Reference;
pub use snapshot::Snapshot;
pub use transaction::TransactionOutcome;

pub use mockbase_core::{
    Address, Error, KeyGenerator, Result, ShortIdGenerator, Value, ValueMap, SERVER_VALUE_KEY,
};

/// Result of an operation that is asynchronous in a real client
///
/// Always ready; failures come back through the `Err` side.
pub type Deferred<T> = futures::future::Ready<Result<T>>;

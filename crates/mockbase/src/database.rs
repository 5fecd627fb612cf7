//! The database root and the state every cursor shares

use crate::event::{EventRegistry, EventType, Listener};
use crate::{DatabaseConfig, Reference, Snapshot};
use log::{debug, trace, warn};
use mockbase_core::{clean, tree, Address, Error, KeyGenerator, Result, Value, ValueMap};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// State shared by the database and every cursor derived from it
pub(crate) struct Shared {
    pub(crate) tree: RefCell<Value>,
    pub(crate) registry: RefCell<EventRegistry>,
    keys: RefCell<Box<dyn KeyGenerator>>,
    max_key_attempts: usize,
}

impl Shared {
    /// Value currently at `address`, null when absent
    pub(crate) fn read(&self, address: &Address) -> Value {
        tree::resolve(&self.tree.borrow(), address)
            .cloned()
            .unwrap_or_default()
    }

    /// Pick a key not present in `taken`
    ///
    /// Candidates that are empty or contain `/` could not be addressed as a
    /// single segment and are skipped like collisions.
    pub(crate) fn free_key(&self, taken: &ValueMap) -> Result<String> {
        let mut keys = self.keys.borrow_mut();
        for attempt in 1..=self.max_key_attempts {
            let key = keys.generate();
            if key.is_empty() || key.contains('/') {
                debug!("push key {:?} is not a path segment (attempt {})", key, attempt);
                continue;
            }
            if !taken.contains_key(&key) {
                return Ok(key);
            }
            debug!("push key {} already taken (attempt {})", key, attempt);
        }
        warn!("no free push key after {} attempts", self.max_key_attempts);
        Err(Error::KeyExhausted {
            attempts: self.max_key_attempts,
        })
    }

    /// Fire `child_added` listeners registered exactly at `parent`
    pub(crate) fn notify_child_added(&self, parent: &Address, child: &Snapshot) {
        let listeners = self.registry.borrow().listeners(parent, EventType::ChildAdded);
        trace!("child_added at {}: {} listener(s)", parent, listeners.len());
        dispatch(&listeners, child);
    }

    /// Fire `value` listeners whose address lies on the path of `written`
    ///
    /// Each listener gets a snapshot of its own address.
    pub(crate) fn notify_value(&self, written: &Address) {
        let affected = self
            .registry
            .borrow()
            .overlapping(written, EventType::Value);
        for (address, listeners) in affected {
            trace!("value at {}: {} listener(s)", address, listeners.len());
            let snapshot = Snapshot::new(address.last().map(str::to_string), self.read(&address));
            dispatch(&listeners, &snapshot);
        }
    }
}

// Registry and tree borrows must be released before this runs; listeners
// are free to read, write and unregister.
fn dispatch(listeners: &[Listener], snapshot: &Snapshot) {
    for listener in listeners {
        listener.call(snapshot);
    }
}

/// An in-memory database
///
/// Owns the tree, the listener registry and the push-key generator. Every
/// [`Reference`] obtained from it shares that state; no cursor ever holds a
/// copy of the tree.
///
/// # Example
///
/// ```
/// use mockbase::{Database, Value};
/// use futures::executor::block_on;
///
/// let db = Database::new(Value::object([(
///     "parent",
///     Value::object([("child", Value::object([("name", "baby")]))]),
/// )]));
///
/// block_on(db.root().child("parent/child/name").set("baby-2")).unwrap();
///
/// assert_eq!(
///     db.data(),
///     Value::object([(
///         "parent",
///         Value::object([("child", Value::object([("name", "baby-2")]))]),
///     )])
/// );
/// ```
pub struct Database {
    shared: Rc<Shared>,
    transaction_success: bool,
}

impl Database {
    /// Create a database holding `initial`, with default configuration
    ///
    /// A null initial value starts the tree as an empty map. Lists are
    /// stored as index-keyed maps.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_config(initial, &DatabaseConfig::default())
    }

    /// Create a database with explicit configuration
    pub fn with_config(initial: impl Into<Value>, config: &DatabaseConfig) -> Self {
        let mut initial = clean::index_lists(initial.into());
        if initial.is_null() {
            initial = Value::empty_map();
        }
        let keys: Box<dyn KeyGenerator> = Box::new(config.key_generator());
        Self {
            shared: Rc::new(Shared {
                tree: RefCell::new(initial),
                registry: RefCell::new(EventRegistry::new()),
                keys: RefCell::new(keys),
                max_key_attempts: config.key_attempts(),
            }),
            transaction_success: config.transaction_success,
        }
    }

    /// Replace the push-key generator
    pub fn with_key_generator(self, keys: impl KeyGenerator + 'static) -> Self {
        *self.shared.keys.borrow_mut() = Box::new(keys);
        self
    }

    /// Cursor at the root of the tree
    pub fn root(&self) -> Reference {
        Reference::new(Rc::clone(&self.shared), Address::root(), self.transaction_success)
    }

    /// Cursor at `path` below the root
    pub fn reference(&self, path: &str) -> Reference {
        self.root().child(path)
    }

    /// Copy of the whole tree
    pub fn data(&self) -> Value {
        self.shared.tree.borrow().clone()
    }

    /// Transaction outcome for cursors created from now on
    pub fn set_transaction_success(&mut self, success: bool) {
        self.transaction_success = success;
    }

    pub fn transaction_success(&self) -> bool {
        self.transaction_success
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new(Value::empty_map())
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("tree", &self.shared.tree.borrow())
            .field("registry", &self.shared.registry.borrow())
            .field("transaction_success", &self.transaction_success)
            .finish()
    }
}

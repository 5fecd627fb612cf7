//! Event types, listener handles and the listener registry

use crate::Snapshot;
use indexmap::IndexMap;
use mockbase_core::{Address, Error, Result};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Events a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The value at the address changed
    Value,
    /// A child was pushed under the address
    ChildAdded,
}

impl EventType {
    /// The protocol name of this event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Value => "value",
            EventType::ChildAdded => "child_added",
        }
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "value" => Ok(EventType::Value),
            "child_added" => Ok(EventType::ChildAdded),
            other => Err(Error::UnsupportedEventType(other.to_string())),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered callback
///
/// Cloning a listener yields the same handle; `off` matches handles by
/// identity, never by behaviour.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Snapshot)>);

impl Listener {
    /// Wrap a callback in a new handle
    pub fn new(callback: impl Fn(&Snapshot) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Check if both handles refer to the same callback
    pub fn same(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    pub(crate) fn call(&self, snapshot: &Snapshot) {
        (self.0)(snapshot)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0))
    }
}

/// Listeners by address, then by event type
///
/// Buckets are created on first registration. Registration order is kept
/// within a bucket and duplicates are allowed.
#[derive(Debug, Default)]
pub struct EventRegistry {
    buckets: IndexMap<Address, IndexMap<EventType, Vec<Listener>>>,
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, address: &Address, event: EventType, listener: Listener) {
        self.buckets
            .entry(address.clone())
            .or_default()
            .entry(event)
            .or_default()
            .push(listener);
    }

    /// Unregister listeners
    ///
    /// With `listener == None` the whole bucket for `event` is dropped, and
    /// the address itself once it has no buckets left. Otherwise every
    /// occurrence of that handle is filtered out and the (possibly empty)
    /// bucket stays registered.
    pub fn remove(
        &mut self,
        address: &Address,
        event: EventType,
        listener: Option<&Listener>,
    ) -> Result<()> {
        let by_type = self.buckets.get_mut(address).ok_or_else(|| {
            Error::NotFound(format!("no listeners registered at {}", address))
        })?;
        let bucket = by_type.get_mut(&event).ok_or_else(|| {
            Error::NotFound(format!("no {} listeners registered at {}", event, address))
        })?;

        match listener {
            Some(listener) => bucket.retain(|registered| !registered.same(listener)),
            None => {
                by_type.shift_remove(&event);
                if by_type.is_empty() {
                    self.buckets.shift_remove(address);
                }
            }
        }
        Ok(())
    }

    /// Listeners for an exact address and event, in registration order
    pub fn listeners(&self, address: &Address, event: EventType) -> Vec<Listener> {
        self.buckets
            .get(address)
            .and_then(|by_type| by_type.get(&event))
            .cloned()
            .unwrap_or_default()
    }

    /// Listeners for `event` at every address on the path of `address`
    pub fn overlapping(
        &self,
        address: &Address,
        event: EventType,
    ) -> Vec<(Address, Vec<Listener>)> {
        self.buckets
            .iter()
            .filter(|(registered, _)| registered.overlaps(address))
            .filter_map(|(registered, by_type)| {
                let bucket = by_type.get(&event)?;
                (!bucket.is_empty()).then(|| (registered.clone(), bucket.clone()))
            })
            .collect()
    }

    /// Number of listeners for an exact address and event
    pub fn count(&self, address: &Address, event: EventType) -> usize {
        self.buckets
            .get(address)
            .and_then(|by_type| by_type.get(&event))
            .map_or(0, Vec::len)
    }

    /// Number of addresses with at least one bucket
    pub fn addresses(&self) -> usize {
        self.buckets.len()
    }
}

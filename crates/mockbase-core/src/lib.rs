//! Mockbase Core - Path-addressable value tree
//!
//! This crate provides the data layer underneath the mockbase database
//! emulation:
//! - Dynamic value types (`Value`, `ValueMap`)
//! - Addresses into the tree (`Address`) and pure resolution over them
//! - Deep-clean normalisation applied to merged updates
//! - Push-key generation with an injectable generator
//!
//! Nothing in here knows about cursors, listeners or deferred results; those
//! live in the `mockbase` crate.

mod address;
pub mod clean;
mod error;
mod keygen;
pub mod tree;
mod value;

pub use address::Address;
pub use error::{Error, Result};
pub use keygen::{KeyGenerator, ShortIdGenerator, XorShift64};
pub use value::{Value, ValueMap, SERVER_VALUE_KEY};

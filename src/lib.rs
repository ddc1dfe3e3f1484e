//! Databag: Dot-Path Addressable Data Container
//!
//! A mutable key-value store over a nested, insertion-ordered mapping, with
//! read-only locking, deep get/set/delete via dotted key paths (`"a.b.c"`),
//! recursive merging of multiple sources, and bracket-style indexed access.
//! Typical use is as the backing store for configuration objects or request
//! parameter bags.

pub mod container;
pub mod error;
pub mod merge;
pub mod path;
pub mod value;

pub use container::{DataContainer, IndexedAccess, MergeSource};
pub use error::ContainerError;
pub use merge::is_associative;
pub use value::{Map, Value};

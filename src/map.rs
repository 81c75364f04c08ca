//! Map type used for `Mapping` nodes and the root `Tree`.
//!
//! By default this is a `BTreeMap`, which gives a stable, sorted iteration
//! order. With the `indexmap` feature enabled, an `IndexMap` is used
//! instead so that keys iterate in the order they were first seen in the
//! querystring.

#[cfg(not(feature = "indexmap"))]
pub type Map<K, V> = std::collections::BTreeMap<K, V>;

#[cfg(feature = "indexmap")]
pub type Map<K, V> = indexmap::IndexMap<K, V>;

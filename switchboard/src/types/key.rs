//! Per-type routing keys.
//!
//! This module provides [`RoutingKey`], the identifier both channels use to index their
//! registries. A key is derived from a type on demand and is never stored on message values.
//!
//! # Identity
//!
//! A key wraps [`std::any::TypeId`], so two values of the same type always produce the same
//! key and two distinct types never collide. The key also carries the type's name, but only for
//! diagnostics: equality, ordering and hashing look at the `TypeId` alone.
//!
//! # Example
//!
//! ```rust
//! use switchboard::RoutingKey;
//!
//! struct Ping;
//! struct Pong;
//!
//! assert_eq!(RoutingKey::of::<Ping>(), RoutingKey::of::<Ping>());
//! assert_ne!(RoutingKey::of::<Ping>(), RoutingKey::of::<Pong>());
//! ```

use std::{
    any::{TypeId, type_name},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// A stable identifier for a declared message type.
#[derive(Clone, Copy)]
pub struct RoutingKey {
    id: TypeId,
    name: &'static str,
}

impl RoutingKey {
    /// Returns the routing key of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying Rust `TypeId`.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The type's name, as reported by [`std::any::type_name`].
    ///
    /// The exact text is not guaranteed to be stable across compiler versions; use it for
    /// diagnostics only.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this key was derived from `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for RoutingKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RoutingKey {}

impl Hash for RoutingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for RoutingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoutingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutingKey").field(&self.name).finish()
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Checks that a list of routing keys contains no duplicates.
///
/// Returns the first key that appears more than once. A list of zero or one key is trivially
/// unique.
///
/// The derive macros and [`assert_unique_types!`](crate::assert_unique_types) reject duplicates
/// at compile time, but they compare types by spelling. This catches what they cannot see, such
/// as two aliases of the same type in a hand-written declaration tuple.
pub fn ensure_unique(keys: &[RoutingKey]) -> Result<(), RoutingKey> {
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(*key);
        }
    }
    Ok(())
}

/// Panics if `keys` contains a duplicate. `set` names the declaration being checked.
pub(crate) fn assert_unique(keys: &[RoutingKey], set: &str) {
    if let Err(dup) = ensure_unique(keys) {
        panic!("Duplicate type in declared {set} set: {dup}");
    }
}

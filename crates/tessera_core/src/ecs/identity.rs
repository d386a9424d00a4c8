//! # Component Type Identity
//!
//! Every component type gets a runtime identity that orders and hashes the
//! same way in every store of the process. Stores key their columns by it,
//! so two stores with the same type set walk their columns in the same order.

use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use super::component::Component;

/// Seed of the type-set hash fold.
pub const TYPE_HASH_SEED: u64 = 17;

/// Folds `value` into `seed`. Order-sensitive: `combine(combine(s, a), b)`
/// differs from `combine(combine(s, b), a)` for `a != b`.
#[inline]
#[must_use]
pub const fn combine_hash(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Folds a sequence of type hashes into one type-set hash.
#[must_use]
pub fn hash_type_sequence<'a, I>(types: I) -> u64
where
    I: IntoIterator<Item = &'a ComponentTypeId>,
{
    types
        .into_iter()
        .fold(TYPE_HASH_SEED, |hash, ty| combine_hash(hash, ty.hash_value()))
}

/// Runtime identity of one component type.
///
/// Equality, ordering and hashing only look at the [`TypeId`]; the name and
/// the precomputed hash are carried along for diagnostics and hash folding.
#[derive(Clone, Copy)]
pub struct ComponentTypeId {
    id: TypeId,
    name: &'static str,
    hash: u64,
}

impl ComponentTypeId {
    /// Returns the identity of component type `C`.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        let id = TypeId::of::<C>();
        // Fixed keys: the hash must not vary between stores or calls.
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        id.hash(&mut hasher);
        Self {
            id,
            name: type_name::<C>(),
            hash: hasher.finish(),
        }
    }

    /// Returns the underlying [`TypeId`].
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the Rust type name of the component.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the stable 64-bit hash of this type.
    #[inline]
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for ComponentTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentTypeId {}

impl PartialOrd for ComponentTypeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentTypeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for ComponentTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentTypeId").field(&self.name).finish()
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

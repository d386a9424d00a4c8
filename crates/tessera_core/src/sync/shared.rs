//! # Shared Entity Stores
//!
//! An [`EntityStore`] has no internal locking. When worker threads mutate
//! stores owned by one registry, each store sits behind a
//! [`SharedEntityStore`]: an `Arc<Mutex<EntityStore>>` plus its archetype
//! hash, cached at creation because the type set never changes.
//!
//! Merges lock two stores at once. Both locks are always taken in one
//! global order (archetype hash, then allocation address) so two threads
//! merging the same pair in opposite directions cannot deadlock.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::ecs::EntityStore;
use crate::error::{StoreError, StoreResult};

/// Cloneable, thread-safe handle to one entity store.
#[derive(Clone, Debug)]
pub struct SharedEntityStore {
    inner: Arc<Mutex<EntityStore>>,
    archetype_hash: u64,
}

impl SharedEntityStore {
    /// Wraps `store` for shared access.
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        let archetype_hash = store.hash_types();
        Self {
            inner: Arc::new(Mutex::new(store)),
            archetype_hash,
        }
    }

    /// Locks the store for exclusive access.
    pub fn lock(&self) -> MutexGuard<'_, EntityStore> {
        self.inner.lock()
    }

    /// Returns the cached [`EntityStore::hash_types`] of the store.
    #[inline]
    #[must_use]
    pub fn archetype_hash(&self) -> u64 {
        self.archetype_hash
    }

    /// Returns the current entity count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Checks if the store currently holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Checks if both handles point at the same store.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Moves every row of `donor` into this store, draining `donor`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SelfMerge`] if both handles point at the same store
    /// - any error of [`EntityStore::insert`]
    pub fn merge_from(&self, donor: &Self) -> StoreResult<()> {
        if self.ptr_eq(donor) {
            return Err(StoreError::SelfMerge);
        }
        let (mut target, mut source) = if self.lock_key() <= donor.lock_key() {
            let target = self.inner.lock();
            (target, donor.inner.lock())
        } else {
            let source = donor.inner.lock();
            (self.inner.lock(), source)
        };
        target.insert(&mut source)
    }

    /// Removes the entity at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn erase(&self, index: usize) -> StoreResult<()> {
        self.inner.lock().erase(index)
    }

    /// Moves the entity at `index` into a new, unshared single-entity store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn extract(&self, index: usize) -> StoreResult<EntityStore> {
        self.inner.lock().extract(index)
    }

    /// Global lock order: archetype hash, then allocation address.
    fn lock_key(&self) -> (u64, usize) {
        (self.archetype_hash, Arc::as_ptr(&self.inner) as usize)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::ecs::{Position, Velocity};

    fn store(n: usize) -> EntityStore {
        EntityStore::builder()
            .with_pod_component(vec![Position::new(1.0, 0.0, 0.0); n])
            .with_pod_component(vec![Velocity::new(0.0, 1.0, 0.0); n])
            .build()
            .unwrap()
    }

    #[test]
    fn test_merge_from() {
        let a = SharedEntityStore::new(store(2));
        let b = SharedEntityStore::new(store(3));
        a.merge_from(&b).unwrap();
        assert_eq!(a.len(), 5);
        assert!(b.is_empty());
        assert_eq!(a.archetype_hash(), b.archetype_hash());
    }

    #[test]
    fn test_merge_from_rejects_other_archetype() {
        let a = SharedEntityStore::new(
            EntityStore::builder()
                .with_pod_component(vec![Position::default(); 2])
                .build()
                .unwrap(),
        );
        let b = SharedEntityStore::new(store(3));
        assert_ne!(a.archetype_hash(), b.archetype_hash());

        assert!(matches!(
            a.merge_from(&b),
            Err(StoreError::ArchetypeMismatch { .. })
        ));
        assert!(matches!(
            b.merge_from(&a),
            Err(StoreError::ArchetypeMismatch { .. })
        ));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_self_merge_rejected() {
        let a = SharedEntityStore::new(store(2));
        let alias = a.clone();
        assert!(alias.ptr_eq(&a));
        assert_eq!(a.merge_from(&alias), Err(StoreError::SelfMerge));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_extract_and_erase() {
        let a = SharedEntityStore::new(store(3));
        let extracted = a.extract(0).unwrap();
        assert_eq!(extracted.len(), 1);
        a.erase(0).unwrap();
        assert_eq!(a.len(), 1);
        assert!(a.erase(1).is_err());
        assert_eq!(a.lock().column::<Velocity>().unwrap().len(), 1);
    }

    #[test]
    fn test_opposing_merges_do_not_deadlock() {
        let a = SharedEntityStore::new(store(100));
        let b = SharedEntityStore::new(store(100));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let (x, y) = if t % 2 == 0 {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                thread::spawn(move || {
                    for _ in 0..100 {
                        x.merge_from(&y).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(a.len() + b.len(), 200);
    }
}

//! # Archetype-based Entity Storage
//!
//! Entities with the same component set are stored together in one
//! [`EntityStore`], one dense column per component type:
//!
//! ```text
//! EntityStore { Position, Velocity }:
//!   Position[]:  [P0, P1, P2, P3]
//!   Velocity[]:  [V0, V1, V2, V3]
//!                 ^ row 0 is one entity across every column
//! ```
//!
//! Columns live in a `BTreeMap` keyed by [`ComponentTypeId`], so any two
//! stores with the same type set list their columns in the same order.
//! Merge and extract rely on that: they walk two stores' columns side by
//! side instead of looking each type up again.
//!
//! ## Structural operations
//!
//! - [`EntityStore::insert`]: absorb every row of a compatible store
//! - [`EntityStore::erase`]: drop one row from every column
//! - [`EntityStore::extract`]: move one row into a new single-entity store
//!
//! Rows are removed with swap-remove: the last row moves into the hole.

use std::collections::BTreeMap;

use bytemuck::Pod;
use tracing::{debug, trace, warn};

use super::column::ComponentColumn;
use super::component::Component;
use super::identity::{hash_type_sequence, ComponentTypeId};
use super::storage::ComponentStorage;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Signature of an archetype - which components it contains.
///
/// Uses a sorted vector of [`ComponentTypeId`]s, the same order a store
/// keeps its columns in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ArchetypeSignature {
    /// Sorted list of component types.
    components: Vec<ComponentTypeId>,
}

impl ArchetypeSignature {
    /// Creates a new archetype signature from component types.
    #[must_use]
    pub fn new(mut components: Vec<ComponentTypeId>) -> Self {
        components.sort();
        components.dedup();
        Self { components }
    }

    /// Checks if this signature contains a component type.
    #[must_use]
    pub fn contains<C: Component>(&self) -> bool {
        self.components
            .binary_search(&ComponentTypeId::of::<C>())
            .is_ok()
    }

    /// Returns the component types in column order.
    #[must_use]
    pub fn components(&self) -> &[ComponentTypeId] {
        &self.components
    }

    /// Iterates over the component types in column order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentTypeId> {
        self.components.iter()
    }

    /// Returns the number of component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the type-set hash; equal to [`EntityStore::hash_types`] of any
    /// store with this signature.
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        hash_type_sequence(&self.components)
    }
}

/// A single archetype table - stores all entities with the same component set.
///
/// # Invariants
///
/// - every column holds exactly [`Self::len`] rows
/// - the column set never changes after [`EntityStoreBuilder::build`]
///
/// # Thread Safety
///
/// No internal locking. Wrap in a
/// [`SharedEntityStore`](crate::SharedEntityStore) to share across threads.
#[derive(Debug)]
pub struct EntityStore {
    /// One column per component type, in [`ComponentTypeId`] order.
    columns: BTreeMap<ComponentTypeId, ComponentColumn>,
    /// Number of entities currently stored.
    len: usize,
    /// Limits and reservations this store was built with.
    config: StoreConfig,
}

impl EntityStore {
    /// Starts building a store with the default config.
    #[must_use]
    pub fn builder() -> EntityStoreBuilder {
        EntityStoreBuilder::new(StoreConfig::default())
    }

    /// Starts building a store with `config`.
    #[must_use]
    pub fn builder_with_config(config: StoreConfig) -> EntityStoreBuilder {
        EntityStoreBuilder::new(config)
    }

    /// Returns the number of entities in this store.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of component types (columns).
    #[inline]
    #[must_use]
    pub fn component_type_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterates over the component types in column order.
    pub fn component_types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.columns.keys().copied()
    }

    /// Returns the signature of this archetype.
    #[must_use]
    pub fn signature(&self) -> ArchetypeSignature {
        ArchetypeSignature {
            components: self.columns.keys().copied().collect(),
        }
    }

    /// Returns the config this store was built with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Checks if this store has a column for `C`.
    #[must_use]
    pub fn contains<C: Component>(&self) -> bool {
        self.columns.contains_key(&ComponentTypeId::of::<C>())
    }

    /// Returns the rows of column `C`.
    #[must_use]
    pub fn column<C: Component>(&self) -> Option<&[C]> {
        self.columns
            .get(&ComponentTypeId::of::<C>())
            .and_then(ComponentColumn::downcast_ref::<C>)
            .map(ComponentStorage::as_slice)
    }

    /// Returns the rows of column `C` mutably.
    ///
    /// Values can be changed; the row count cannot.
    pub fn column_mut<C: Component>(&mut self) -> Option<&mut [C]> {
        self.columns
            .get_mut(&ComponentTypeId::of::<C>())
            .and_then(ComponentColumn::downcast_mut::<C>)
            .map(ComponentStorage::as_mut_slice)
    }

    /// Gets component `C` of the entity at `row`.
    #[must_use]
    pub fn get<C: Component>(&self, row: usize) -> Option<&C> {
        self.column::<C>()?.get(row)
    }

    /// Returns the raw bytes of column `C` if it was added as a pod column.
    #[must_use]
    pub fn column_bytes<C: Component>(&self) -> Option<&[u8]> {
        self.columns
            .get(&ComponentTypeId::of::<C>())?
            .bytes()
    }

    /// Checks if `other` holds exactly the same component types, in the same
    /// column order.
    #[must_use]
    pub fn compare_types(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.keys().eq(other.columns.keys())
    }

    /// Hashes the component type set.
    ///
    /// Constant over the store's lifetime; equal for stores where
    /// [`Self::compare_types`] holds.
    #[must_use]
    pub fn hash_types(&self) -> u64 {
        hash_type_sequence(self.columns.keys())
    }

    /// Moves every row of `other` onto the end of this store.
    ///
    /// `other` is left drained: every column empty and [`Self::len`] zero.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ArchetypeMismatch`] if the type sets differ
    /// - [`StoreError::CapacityExceeded`] if the merged store would exceed
    ///   `max_entities`
    ///
    /// Neither store is modified on error.
    pub fn insert(&mut self, other: &mut Self) -> StoreResult<()> {
        if !self.compare_types(other) {
            let err = StoreError::ArchetypeMismatch {
                expected: self.hash_types(),
                found: other.hash_types(),
            };
            warn!(%err, "rejected merge");
            return Err(err);
        }
        let requested = self.len + other.len;
        self.config.check_limit(requested)?;

        debug!(
            rows = other.len,
            total = requested,
            columns = self.columns.len(),
            "merging entity store"
        );
        // Same key sequence on both sides, so positions line up.
        for (mine, theirs) in self.columns.values_mut().zip(other.columns.values_mut()) {
            mine.insert_range(theirs)?;
        }
        self.len = requested;
        other.len = 0;
        Ok(())
    }

    /// Removes the entity at `index` from every column.
    ///
    /// The last entity moves into `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn erase(&mut self, index: usize) -> StoreResult<()> {
        self.check_index(index)?;
        trace!(index, len = self.len, "erasing row");
        for column in self.columns.values_mut() {
            column.erase_at(index)?;
        }
        self.len -= 1;
        Ok(())
    }

    /// Moves the entity at `index` into a new single-entity store with the
    /// same component types.
    ///
    /// The last entity moves into `index`. The returned store inherits this
    /// store's config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn extract(&mut self, index: usize) -> StoreResult<Self> {
        self.check_index(index)?;
        debug!(index, len = self.len, "extracting row");

        // Empty columns first, in our order, sharing our operation tables.
        let mut extracted: BTreeMap<ComponentTypeId, ComponentColumn> = self
            .columns
            .iter()
            .map(|(ty, column)| (*ty, column.empty_like()))
            .collect();

        for (source, target) in self.columns.values_mut().zip(extracted.values_mut()) {
            let mut row = source.extract_at(index)?;
            target.insert_range(&mut row)?;
        }
        self.len -= 1;

        Ok(Self {
            columns: extracted,
            len: 1,
            config: self.config.clone(),
        })
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }
}

/// Builds an [`EntityStore`] from one initial column per component type.
///
/// # Example
///
/// ```rust,ignore
/// let store = EntityStore::builder()
///     .with_pod_component(vec![Position::new(0.0, 0.0, 0.0)])
///     .with_pod_component(vec![Velocity::new(1.0, 0.0, 0.0)])
///     .build()?;
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug)]
#[must_use]
pub struct EntityStoreBuilder {
    columns: Vec<ComponentColumn>,
    config: StoreConfig,
}

impl EntityStoreBuilder {
    fn new(config: StoreConfig) -> Self {
        Self {
            columns: Vec::new(),
            config,
        }
    }

    /// Adds a column of component `C`.
    pub fn with_component<C: Component>(self, rows: Vec<C>) -> Self {
        self.with_column(ComponentColumn::new(ComponentStorage::from_vec(rows)))
    }

    /// Adds a column of plain-old-data component `C` with a byte view.
    pub fn with_pod_component<C: Component + Pod>(self, rows: Vec<C>) -> Self {
        self.with_column(ComponentColumn::new_pod(ComponentStorage::from_vec(rows)))
    }

    /// Adds a prebuilt column.
    pub fn with_column(mut self, column: ComponentColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Validates the columns and builds the store.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateComponent`] if a type was added twice
    /// - [`StoreError::ColumnLengthMismatch`] if columns differ in length
    /// - [`StoreError::CapacityExceeded`] if the row count exceeds
    ///   `max_entities`
    /// - [`StoreError::AllocationFailed`] if `initial_capacity` rows cannot
    ///   be reserved
    pub fn build(self) -> StoreResult<EntityStore> {
        let len = self.columns.first().map_or(0, ComponentColumn::len);
        self.config.check_limit(len)?;
        let additional = self.config.reservation().saturating_sub(len);
        let mut columns = BTreeMap::new();

        for mut column in self.columns {
            let ty = column.component_type();
            if column.len() != len {
                return Err(StoreError::ColumnLengthMismatch {
                    component: ty.name(),
                    expected: len,
                    found: column.len(),
                });
            }
            if columns.contains_key(&ty) {
                return Err(StoreError::DuplicateComponent(ty.name()));
            }
            column.reserve(additional)?;
            columns.insert(ty, column);
        }

        debug!(rows = len, columns = columns.len(), "built entity store");
        Ok(EntityStore {
            columns,
            len,
            config: self.config,
        })
    }
}

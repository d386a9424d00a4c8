//! # Component Storage
//!
//! Dense, growable storage for a single component type.
//!
//! The storage uses a dense array strategy:
//! - Rows are packed with no gaps (row `i` is element `i`)
//! - Access is O(1) via row index
//! - Iteration is cache-friendly (contiguous memory)
//! - Removal is swap-remove: the last row fills the hole

use super::component::Component;
use crate::error::{StoreError, StoreResult};

/// Dense storage for a single component type.
///
/// This is the concrete array behind every [`ComponentColumn`]; the column
/// only ever sees it as an opaque blob.
///
/// # Type Parameters
///
/// * `C` - The component type to store
///
/// # Example
///
/// ```rust,ignore
/// let mut storage = ComponentStorage::from_vec(vec![Position::new(1.0, 2.0, 3.0)]);
/// storage.push(Position::new(4.0, 5.0, 6.0));
/// let removed = storage.swap_remove(0)?;
/// ```
///
/// [`ComponentColumn`]: super::column::ComponentColumn
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentStorage<C: Component> {
    /// The dense array of components.
    data: Vec<C>,
}

impl<C: Component> Default for ComponentStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentStorage<C> {
    /// Creates empty storage.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates empty storage with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Wraps existing rows.
    #[must_use]
    pub fn from_vec(data: Vec<C>) -> Self {
        Self { data }
    }

    /// Returns the number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets a component by row index.
    ///
    /// # Returns
    ///
    /// Reference to the component, or None if index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets a mutable component by row index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Returns a slice of all components.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Returns a mutable slice of all components.
    ///
    /// Values may change through the slice; the row count cannot.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// Iterates over all components with their row indices.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, &C)> {
        self.data.iter().enumerate()
    }

    /// Appends one row.
    #[inline]
    pub fn push(&mut self, component: C) {
        self.data.push(component);
    }

    /// Reserves room for `additional` more rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the capacity overflows or
    /// the allocator refuses the request.
    pub fn try_reserve(&mut self, additional: usize) -> StoreResult<()> {
        self.data
            .try_reserve(additional)
            .map_err(|_| StoreError::AllocationFailed {
                component: std::any::type_name::<C>(),
                requested: additional,
            })
    }

    /// Moves every row of `other` onto the end of `self`, in order.
    ///
    /// `other` is left empty.
    pub fn append(&mut self, other: &mut Self) {
        self.data.append(&mut other.data);
    }

    /// Removes the row at `index`, moving the last row into its place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> StoreResult<C> {
        self.check_index(index)?;
        Ok(self.data.swap_remove(index))
    }

    /// Removes the row at `index` into a new single-row storage.
    ///
    /// Uses the same swap-remove policy as [`Self::swap_remove`], so a store
    /// that extracts from all its columns keeps them aligned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn extract(&mut self, index: usize) -> StoreResult<Self> {
        let component = self.swap_remove(index)?;
        Ok(Self::from_vec(vec![component]))
    }

    /// Consumes the storage, returning its rows.
    #[must_use]
    pub fn into_vec(self) -> Vec<C> {
        self.data
    }

    #[inline]
    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index < self.data.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.data.len(),
            })
        }
    }
}

impl<C: Component> From<Vec<C>> for ComponentStorage<C> {
    fn from(data: Vec<C>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Position;

    fn positions(n: usize) -> ComponentStorage<Position> {
        (0..n)
            .map(|i| Position::new(i as f32, 0.0, 0.0))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_storage_get() {
        let storage = positions(3);
        assert_eq!(storage.len(), 3);
        assert_eq!(storage.get(2).unwrap().x, 2.0);
        assert!(storage.get(3).is_none());
    }

    #[test]
    fn test_swap_remove_moves_last_row() {
        let mut storage = positions(4);
        let removed = storage.swap_remove(1).unwrap();
        assert_eq!(removed.x, 1.0);
        let xs: Vec<f32> = storage.as_slice().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 2.0]);
    }

    #[test]
    fn test_swap_remove_bounds() {
        let mut storage = positions(2);
        assert_eq!(
            storage.swap_remove(2),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_extract_single_row() {
        let mut storage = positions(3);
        let extracted = storage.extract(0).unwrap();
        assert_eq!(extracted.as_slice(), &[Position::new(0.0, 0.0, 0.0)]);
        assert_eq!(storage.len(), 2);
        assert!(ComponentStorage::<Position>::new().extract(0).is_err());
    }

    #[test]
    fn test_try_reserve_overflow() {
        let mut storage = positions(2);
        assert!(storage.try_reserve(8).is_ok());
        assert!(matches!(
            storage.try_reserve(usize::MAX),
            Err(StoreError::AllocationFailed { .. })
        ));
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get(1).map(|p| p.x), Some(1.0));
    }

    #[test]
    fn test_append_drains_other() {
        let mut a = positions(2);
        let mut b = positions(1);
        a.append(&mut b);
        assert_eq!(a.len(), 3);
        assert!(b.is_empty());
        assert_eq!(a.get(2).unwrap().x, 0.0);
    }
}

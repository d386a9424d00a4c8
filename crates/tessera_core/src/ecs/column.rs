//! # Type-Erased Component Columns
//!
//! A [`ComponentColumn`] owns one [`ComponentStorage<C>`] behind an opaque
//! `Box<dyn Any>` and a [`ColumnOps`] table of plain function pointers that
//! were monomorphised for `C` when the column was created. The owning store
//! can append, erase and extract rows without knowing `C`.
//!
//! ```text
//! ComponentColumn
//! ├── component: ComponentTypeId     (Position)
//! ├── data:      Box<dyn Any>        -> ComponentStorage<Position>
//! └── ops:       ColumnOps
//!                ├── insert_range    = insert_range::<Position>
//!                ├── erase_at        = erase_at::<Position>
//!                ├── extract_at      = extract_at::<Position>
//!                └── ...
//! ```
//!
//! Every column of every store erases rows through
//! [`ComponentStorage::swap_remove`], so all columns apply the same policy
//! and rows stay aligned.

use std::any::{type_name, Any};
use std::fmt;

use bytemuck::Pod;

use super::component::Component;
use super::identity::ComponentTypeId;
use super::storage::ComponentStorage;
use crate::error::{StoreError, StoreResult};

/// Opaque column data: always a `ComponentStorage<C>` for the column's `C`.
type Blob = Box<dyn Any + Send + Sync>;

/// Operations bound to one concrete component type.
///
/// Created by [`ColumnOps::of`] or [`ColumnOps::of_pod`]. Copies of the
/// table are shared between a column and every column derived from it.
#[derive(Clone, Copy)]
pub struct ColumnOps {
    insert_range: fn(&mut dyn Any, &mut dyn Any) -> StoreResult<()>,
    erase_at: fn(&mut dyn Any, usize) -> StoreResult<()>,
    extract_at: fn(&mut dyn Any, usize) -> StoreResult<Blob>,
    len: fn(&dyn Any) -> usize,
    empty: fn() -> Blob,
    reserve: fn(&mut dyn Any, usize) -> StoreResult<()>,
    bytes: Option<fn(&dyn Any) -> Option<&[u8]>>,
    type_name: &'static str,
}

impl ColumnOps {
    /// Binds the operations for component type `C`.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self {
            insert_range: insert_range::<C>,
            erase_at: erase_at::<C>,
            extract_at: extract_at::<C>,
            len: len::<C>,
            empty: empty::<C>,
            reserve: reserve::<C>,
            bytes: None,
            type_name: type_name::<C>(),
        }
    }

    /// Binds the operations for `C`, plus a raw byte view of the column.
    #[must_use]
    pub fn of_pod<C: Component + Pod>() -> Self {
        Self {
            bytes: Some(pod_bytes::<C>),
            ..Self::of::<C>()
        }
    }

    /// Returns `true` if columns using this table expose a byte view.
    #[must_use]
    pub fn has_byte_view(&self) -> bool {
        self.bytes.is_some()
    }
}

impl fmt::Debug for ColumnOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnOps")
            .field("type_name", &self.type_name)
            .field("byte_view", &self.bytes.is_some())
            .finish_non_exhaustive()
    }
}

fn storage_mut<C: Component>(blob: &mut dyn Any) -> StoreResult<&mut ComponentStorage<C>> {
    blob.downcast_mut::<ComponentStorage<C>>()
        .ok_or(StoreError::TypeMismatch {
            expected: type_name::<C>(),
        })
}

fn insert_range<C: Component>(dst: &mut dyn Any, src: &mut dyn Any) -> StoreResult<()> {
    let src = storage_mut::<C>(src)?;
    let dst = storage_mut::<C>(dst)?;
    dst.append(src);
    Ok(())
}

fn erase_at<C: Component>(blob: &mut dyn Any, index: usize) -> StoreResult<()> {
    storage_mut::<C>(blob)?.swap_remove(index).map(drop)
}

fn extract_at<C: Component>(blob: &mut dyn Any, index: usize) -> StoreResult<Blob> {
    let extracted = storage_mut::<C>(blob)?.extract(index)?;
    Ok(Box::new(extracted))
}

fn len<C: Component>(blob: &dyn Any) -> usize {
    blob.downcast_ref::<ComponentStorage<C>>()
        .map_or(0, ComponentStorage::len)
}

fn empty<C: Component>() -> Blob {
    Box::new(ComponentStorage::<C>::new())
}

fn reserve<C: Component>(blob: &mut dyn Any, additional: usize) -> StoreResult<()> {
    storage_mut::<C>(blob)?.try_reserve(additional)
}

fn pod_bytes<C: Component + Pod>(blob: &dyn Any) -> Option<&[u8]> {
    blob.downcast_ref::<ComponentStorage<C>>()
        .map(|storage| bytemuck::cast_slice(storage.as_slice()))
}

/// One component column: a type identity, an opaque dense array and the
/// operations bound to its concrete type.
pub struct ComponentColumn {
    component: ComponentTypeId,
    data: Blob,
    ops: ColumnOps,
}

impl ComponentColumn {
    /// Creates a column owning `storage`.
    #[must_use]
    pub fn new<C: Component>(storage: ComponentStorage<C>) -> Self {
        Self {
            component: ComponentTypeId::of::<C>(),
            data: Box::new(storage),
            ops: ColumnOps::of::<C>(),
        }
    }

    /// Creates a column owning `storage` that also exposes [`Self::bytes`].
    #[must_use]
    pub fn new_pod<C: Component + Pod>(storage: ComponentStorage<C>) -> Self {
        Self {
            component: ComponentTypeId::of::<C>(),
            data: Box::new(storage),
            ops: ColumnOps::of_pod::<C>(),
        }
    }

    /// Creates an empty column of the same type sharing this column's
    /// operation table.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            component: self.component,
            data: (self.ops.empty)(),
            ops: self.ops,
        }
    }

    /// Returns the component type stored in this column.
    #[inline]
    #[must_use]
    pub fn component_type(&self) -> ComponentTypeId {
        self.component
    }

    /// Returns the bound operation table.
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &ColumnOps {
        &self.ops
    }

    /// Returns the number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        (self.ops.len)(&*self.data)
    }

    /// Checks if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends every row of `other` in order, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] if `other` holds another
    /// component type. Neither column is modified in that case.
    pub fn insert_range(&mut self, other: &mut Self) -> StoreResult<()> {
        if self.component != other.component {
            return Err(StoreError::TypeMismatch {
                expected: self.ops.type_name,
            });
        }
        (self.ops.insert_range)(&mut *self.data, &mut *other.data)
    }

    /// Removes the row at `index`; the last row takes its place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn erase_at(&mut self, index: usize) -> StoreResult<()> {
        (self.ops.erase_at)(&mut *self.data, index)
    }

    /// Removes the row at `index` into a new single-row column.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= len`.
    pub fn extract_at(&mut self, index: usize) -> StoreResult<Self> {
        let data = (self.ops.extract_at)(&mut *self.data, index)?;
        Ok(Self {
            component: self.component,
            data,
            ops: self.ops,
        })
    }

    /// Reserves room for `additional` more rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailed`] if the rows cannot be
    /// reserved.
    pub fn reserve(&mut self, additional: usize) -> StoreResult<()> {
        (self.ops.reserve)(&mut *self.data, additional)
    }

    /// Returns the raw bytes of the column, if it was created with
    /// [`Self::new_pod`].
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        self.ops.bytes.and_then(|bytes| bytes(&*self.data))
    }

    /// Returns the typed storage if this column holds `C`.
    #[must_use]
    pub fn downcast_ref<C: Component>(&self) -> Option<&ComponentStorage<C>> {
        self.data.downcast_ref()
    }

    /// Returns the typed storage mutably if this column holds `C`.
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut ComponentStorage<C>> {
        self.data.downcast_mut()
    }
}

impl fmt::Debug for ComponentColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentColumn")
            .field("component", &self.component)
            .field("len", &self.len())
            .finish()
    }
}

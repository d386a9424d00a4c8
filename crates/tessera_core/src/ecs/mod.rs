//! # Entity Component System Storage
//!
//! Archetype tables with type-erased, column-wise component storage.
//!
//! ## Design Philosophy
//!
//! - Entities sharing a component set share one [`EntityStore`]
//! - Each component type is one dense column; a row is one entity
//! - Columns are manipulated through bound operation tables, never through
//!   static knowledge of the component type
//! - Column order is deterministic across stores with the same type set

pub mod archetype;
mod column;
mod component;
mod identity;
mod storage;

pub use archetype::{ArchetypeSignature, EntityStore, EntityStoreBuilder};
pub use column::{ColumnOps, ComponentColumn};
pub use component::{Component, Position, Velocity};
pub use identity::{combine_hash, hash_type_sequence, ComponentTypeId, TYPE_HASH_SEED};
pub use storage::ComponentStorage;

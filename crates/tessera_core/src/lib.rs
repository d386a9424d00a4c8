//! # Tessera Core
//!
//! Archetype-based component storage for an Entity Component System.
//!
//! Entities that share an identical combination of component types live in
//! one [`EntityStore`], stored column-wise: one dense array per component
//! type, all columns index-aligned.
//!
//! ## Architecture Rules
//!
//! 1. **Columns stay aligned** - every structural operation touches every
//!    column with the same row and the same removal policy
//! 2. **Type set is fixed** - a store's columns are chosen at build time
//! 3. **No unsafe** - type erasure goes through `Any` and bound function
//!    tables
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_core::{EntityStore, Position, Velocity};
//!
//! let mut store = EntityStore::builder()
//!     .with_pod_component(vec![Position::new(0.0, 0.0, 0.0)])
//!     .with_pod_component(vec![Velocity::new(1.0, 0.0, 0.0)])
//!     .build()?;
//!
//! // Entity changes archetype: pull its row out
//! let moved = store.extract(0)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod sync;

pub use config::StoreConfig;
pub use ecs::{
    ArchetypeSignature, ColumnOps, Component, ComponentColumn, ComponentStorage,
    ComponentTypeId, EntityStore, EntityStoreBuilder, Position, Velocity,
};
pub use error::{ConfigError, StoreError, StoreResult};
pub use sync::SharedEntityStore;

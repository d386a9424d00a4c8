//! # Component System
//!
//! Components are pure data containers with no behavior.
//! Any `Send + Sync + 'static` type can be a component; plain-old-data
//! components additionally get a raw byte view of their column.

use bytemuck::{Pod, Zeroable};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Send + Sync`: stores may be shared across worker threads
/// - `'static`: identity is taken from [`std::any::TypeId`]
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Send + Sync + 'static {}

/// Position component for entities.
///
/// Represents a 3D position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// X coordinate in world space.
    pub x: f32,
    /// Y coordinate in world space.
    pub y: f32,
    /// Z coordinate in world space.
    pub z: f32,
    /// Padding that keeps rows 16 bytes wide in byte views.
    pub _padding: f32,
}

impl Component for Position {}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            _padding: 0.0,
        }
    }
}

/// Velocity component for entities.
///
/// Represents movement speed in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// X velocity component.
    pub x: f32,
    /// Y velocity component.
    pub y: f32,
    /// Z velocity component.
    pub z: f32,
    /// Padding for alignment.
    pub _padding: f32,
}

impl Component for Velocity {}

impl Velocity {
    /// Creates a new velocity.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            _padding: 0.0,
        }
    }
}

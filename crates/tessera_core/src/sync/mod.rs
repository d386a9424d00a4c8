//! # Cross-Thread Store Access
//!
//! Entity stores are single-writer. Owners that spread stores over worker
//! threads serialize access per store through [`SharedEntityStore`].

mod shared;

pub use shared::SharedEntityStore;

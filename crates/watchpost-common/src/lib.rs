//! # Watchpost Common
//!
//! Common types, utilities, and shared abstractions for Watchpost.
//!
//! This crate provides foundational types used across all Watchpost crates:
//! - ID types (EntityId, EmitterId)
//! - Math helpers on top of `glam` (remapping, horizontal facing)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

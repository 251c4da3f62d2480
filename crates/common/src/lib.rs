//! Shared leaf types for the glaze scene viewer.
//!
//! # Invariants
//! - Everything here is a plain value type; no I/O, no global state.
//! - Viewport computation is a pure function of its inputs.

pub mod color;
pub mod types;
pub mod viewport;

pub use color::Color;
pub use types::{AnimationFlags, Transform, splitmix64};
pub use viewport::{Extent, Viewport, compute_viewport};

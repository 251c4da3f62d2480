//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A renderer reads the scene and a view; it never mutates either.
//!
//! The trait is the stable seam; the wgpu backend lives in its own crate and
//! the [`TextFrameRenderer`] here serves the CLI and tests.

mod renderer;

pub use renderer::{SceneRenderer, TextFrameRenderer, ViewSettings};

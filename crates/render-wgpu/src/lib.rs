//! wgpu render backend for the glaze viewer.
//!
//! Renders the object registry as instanced copies of the loaded template
//! mesh under one area light and one ambient light, clearing to the scene's
//! drifting background color. The orbit camera lives here too: rotate/zoom
//! around the origin with per-frame damping.
//!
//! # Invariants
//! - The renderer never mutates scene state.
//! - Until the template mesh is uploaded, a frame is just the background
//!   clear.
//! - Camera damping only integrates inside `OrbitCamera::update`, called
//!   once per frame.

mod gpu;
mod orbit;
mod shaders;

pub use gpu::GpuRenderer;
pub use orbit::OrbitCamera;

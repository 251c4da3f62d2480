//! Scene model for the glaze viewer: materials, clonable objects, lights.
//!
//! # Invariants
//! - Materials are shared by handle; recoloring a material recolors every
//!   object referencing it.
//! - The object registry only grows (populated once when the template mesh
//!   arrives) and is safe to iterate while empty.
//! - Cloning never mutates the template.

mod material;
mod object;
mod scene;

pub use material::{Material, MaterialHandle, MaterialStore};
pub use object::{AxisOverride, CloneOptions, ObjectRegistry, SceneObject};
pub use scene::{AmbientLight, AreaLight, GRID_SPACING, Scene, SceneSummary};

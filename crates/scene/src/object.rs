use glam::Vec3;
use glaze_common::Transform;
use serde::{Deserialize, Serialize};

use crate::material::MaterialHandle;

/// Sparse per-axis override: `Some` replaces the axis, `None` inherits it
/// from the clone source.
///
/// Presence is explicit rather than inferred from the value, so an override
/// of exactly zero is representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisOverride {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisOverride {
    /// Override all three axes.
    pub fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Compatibility constructor for data that encoded "no override" as an
    /// exact zero: a 0.0 component becomes `None`.
    pub fn nonzero(x: f32, y: f32, z: f32) -> Self {
        let keep = |v: f32| if v == 0.0 { None } else { Some(v) };
        Self {
            x: keep(x),
            y: keep(y),
            z: keep(z),
        }
    }

    /// Apply to a base vector, replacing only the present axes.
    pub fn apply(&self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.z.unwrap_or(base.z),
        )
    }
}

/// Sparse overrides applied while cloning a template object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CloneOptions {
    pub position: AxisOverride,
    pub rotation: AxisOverride,
    pub scale: AxisOverride,
    pub material: Option<MaterialHandle>,
}

/// A positioned, renderable instance of the template mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub transform: Transform,
    pub material: MaterialHandle,
}

impl SceneObject {
    pub fn new(material: MaterialHandle) -> Self {
        Self {
            transform: Transform::default(),
            material,
        }
    }

    /// Structural copy with sparse overrides. The source is untouched; the
    /// copy is owned by the caller. A material override copies the handle,
    /// so the material itself stays shared.
    pub fn clone_with(&self, options: &CloneOptions) -> Self {
        Self {
            transform: Transform {
                position: options.position.apply(self.transform.position),
                rotation: options.rotation.apply(self.transform.rotation),
                scale: options.scale.apply(self.transform.scale),
            },
            material: options.material.unwrap_or(self.material),
        }
    }
}

/// Ordered collection of scene objects.
///
/// Grows only, during the one-time load completion; iterated every frame,
/// which is trivially safe while empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectRegistry {
    objects: Vec<SceneObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

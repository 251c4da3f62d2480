use glam::{Vec2, Vec3};
use glaze_common::Color;
use serde::{Deserialize, Serialize};

use crate::material::MaterialHandle;
use crate::object::{AxisOverride, CloneOptions, ObjectRegistry, SceneObject};

/// Distance between neighboring grid cells, in world units.
pub const GRID_SPACING: f32 = 2.5;

/// A finite rectangular emitter aimed at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaLight {
    pub color: Color,
    pub intensity: f32,
    pub size: Vec2,
    pub position: Vec3,
}

/// Uniform, directionless fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// The full render-graph input: background, lights, and the object registry.
///
/// Owned by the application for the process lifetime; there is no teardown
/// beyond drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub background: Color,
    pub key_light: AreaLight,
    pub fill_light: AmbientLight,
    pub objects: ObjectRegistry,
}

impl Scene {
    /// Scene with the stock lighting rig and the given backdrop color.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            key_light: AreaLight {
                color: Color::WHITE,
                intensity: 0.3,
                size: Vec2::new(50.0, 50.0),
                position: Vec3::new(2.5, 5.0, 2.5),
            },
            fill_light: AmbientLight {
                color: Color::WHITE,
                intensity: 0.7,
            },
            objects: ObjectRegistry::new(),
        }
    }

    /// Populate the 3x3x3 grid: one clone of `template` per coordinate in
    /// {-1, 0, 1}^3, positioned at coordinate x `spacing` and sharing
    /// `material`.
    pub fn populate_grid(
        &mut self,
        template: &SceneObject,
        spacing: f32,
        material: MaterialHandle,
    ) {
        for x in -1i32..=1 {
            for y in -1i32..=1 {
                for z in -1i32..=1 {
                    let options = CloneOptions {
                        position: AxisOverride::xyz(
                            x as f32 * spacing,
                            y as f32 * spacing,
                            z as f32 * spacing,
                        ),
                        material: Some(material),
                        ..Default::default()
                    };
                    self.objects.push(template.clone_with(&options));
                }
            }
        }
        tracing::debug!(count = self.objects.len(), spacing, "grid populated");
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            object_count: self.objects.len(),
            background: self.background,
        }
    }
}

/// Read-only scene digest for tooling and the on-screen readout.
#[derive(Debug, Clone, Copy)]
pub struct SceneSummary {
    pub object_count: usize,
    pub background: Color,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: objects={} background=({:.3}, {:.3}, {:.3})",
            self.object_count, self.background.r, self.background.g, self.background.b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn stock_lighting_rig() {
        let scene = Scene::new(Color::from_rgb8(60, 60, 90));
        assert_eq!(scene.key_light.intensity, 0.3);
        assert_eq!(scene.key_light.size, Vec2::new(50.0, 50.0));
        assert_eq!(scene.key_light.position, Vec3::new(2.5, 5.0, 2.5));
        assert_eq!(scene.fill_light.intensity, 0.7);
        assert!(scene.objects.is_empty());
    }

    #[test]
    fn grid_has_27_distinct_positions() {
        let mut scene = Scene::new(Color::WHITE);
        let template = SceneObject::new(MaterialHandle(0));
        let shared = MaterialHandle(1);
        scene.populate_grid(&template, GRID_SPACING, shared);

        assert_eq!(scene.objects.len(), 27);

        let mut seen = BTreeSet::new();
        for obj in scene.objects.iter() {
            let p = obj.transform.position;
            for c in [p.x, p.y, p.z] {
                assert!(
                    c == -GRID_SPACING || c == 0.0 || c == GRID_SPACING,
                    "unexpected coordinate {c}"
                );
            }
            seen.insert((p.x.to_bits(), p.y.to_bits(), p.z.to_bits()));
            assert_eq!(obj.material, shared);
        }
        assert_eq!(seen.len(), 27);
    }

    #[test]
    fn grid_clones_leave_template_untouched() {
        let mut scene = Scene::new(Color::WHITE);
        let template = SceneObject::new(MaterialHandle(0));
        scene.populate_grid(&template, GRID_SPACING, MaterialHandle(1));
        assert_eq!(template.transform, glaze_common::Transform::default());
        assert_eq!(template.material, MaterialHandle(0));
    }

    #[test]
    fn summary_display() {
        let scene = Scene::new(Color::WHITE);
        let s = scene.summary().to_string();
        assert!(s.contains("objects=0"));
    }
}

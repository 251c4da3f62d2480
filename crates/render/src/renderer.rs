use glam::Vec3;
use glaze_scene::{MaterialStore, Scene};

/// Camera/view configuration consumed by a renderer.
#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-40.0, 40.0, 40.0),
            target: Vec3::ZERO,
            fov_degrees: 12.5,
        }
    }
}

/// Renderer-agnostic interface. The backend reads scene + materials + view
/// and produces output; it never mutates the scene.
pub trait SceneRenderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(
        &self,
        scene: &Scene,
        materials: &MaterialStore,
        view: &ViewSettings,
    ) -> Self::Output;
}

/// Text renderer: a human-readable digest of the frame.
///
/// Used by the CLI for headless inspection and by tests that need to observe
/// what a frame would draw without a GPU.
#[derive(Debug, Default)]
pub struct TextFrameRenderer;

impl TextFrameRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl SceneRenderer for TextFrameRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, materials: &MaterialStore, view: &ViewSettings) -> String {
        let mut out = String::new();
        let bg = scene.background;
        out.push_str(&format!(
            "=== Frame (objects={}, bg=({:.3}, {:.3}, {:.3})) ===\n",
            scene.objects.len(),
            bg.r,
            bg.g,
            bg.b
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.1}\n",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        ));
        out.push_str(&format!(
            "Lights: key intensity={:.2} at ({:.1}, {:.1}, {:.1}), ambient intensity={:.2}\n",
            scene.key_light.intensity,
            scene.key_light.position.x,
            scene.key_light.position.y,
            scene.key_light.position.z,
            scene.fill_light.intensity
        ));

        for (index, object) in scene.objects.iter().enumerate() {
            let p = object.transform.position;
            let r = object.transform.rotation;
            let color = materials.color(object.material);
            out.push_str(&format!(
                "  [{index:>2}] pos=({:.2}, {:.2}, {:.2}) rot=({:.4}, {:.4}, {:.4}) color=({:.3}, {:.3}, {:.3})\n",
                p.x, p.y, p.z, r.x, r.y, r.z, color.r, color.g, color.b
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_common::Color;
    use glaze_scene::{GRID_SPACING, Material, MaterialStore, SceneObject};

    #[test]
    fn empty_scene_digest() {
        let scene = Scene::new(Color::WHITE);
        let materials = MaterialStore::new();
        let out = TextFrameRenderer::new().render(&scene, &materials, &ViewSettings::default());

        assert!(out.contains("objects=0"));
        assert!(out.contains("fov=12.5"));
    }

    #[test]
    fn populated_scene_lists_every_object() {
        let mut materials = MaterialStore::new();
        let shared = materials.add(Material {
            name: "bowl".into(),
            color: Color::from_rgb8(128, 0, 0),
        });
        let mut scene = Scene::new(Color::WHITE);
        scene.populate_grid(&SceneObject::new(shared), GRID_SPACING, shared);

        let out = TextFrameRenderer::new().render(&scene, &materials, &ViewSettings::default());
        assert!(out.contains("objects=27"));
        assert_eq!(out.matches("pos=").count(), 27);
    }

    #[test]
    fn view_defaults_match_scene_framing() {
        let view = ViewSettings::default();
        assert_eq!(view.eye, Vec3::new(-40.0, 40.0, 40.0));
        assert_eq!(view.target, Vec3::ZERO);
    }
}

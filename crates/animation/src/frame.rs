use glam::Vec3;
use glaze_common::AnimationFlags;
use glaze_scene::{MaterialHandle, MaterialStore, Scene};

/// Per-frame rotation increment in radians. The axes advance at different
/// rates so the tumble never reads as a short visual loop.
pub const ROTATION_STEP: Vec3 = Vec3::new(0.005, 0.0001, 0.005);

/// Per-frame hue advance in turns; one full background cycle per hour at
/// 60 fps.
pub const HUE_STEP: f32 = 1.0 / 3600.0;

/// A render failure surfaced by the frame step's render closure.
#[derive(Debug, thiserror::Error)]
#[error("frame render failed: {0}")]
pub struct FrameError(pub String);

/// Outcome of one frame step. The scheduler keeps requesting frames only on
/// `Rendered`; `Skipped` and `Halted` both leave the loop parked until a
/// resume input arrives.
#[derive(Debug)]
pub enum FrameStatus {
    /// Scene mutated (if enabled) and rendered; schedule the next frame.
    Rendered,
    /// The loop is paused; nothing ran.
    Skipped,
    /// The render failed; the loop transitioned to paused.
    Halted(FrameError),
}

impl FrameStatus {
    /// Whether the scheduler should request another frame.
    pub fn continues(&self) -> bool {
        matches!(self, FrameStatus::Rendered)
    }
}

/// The animation state machine: RUNNING/PAUSED plus the per-frame scene
/// mutation.
///
/// Rendering is injected as a closure so the step is exercisable without a
/// GPU; the closure's failure is the only path from RUNNING to PAUSED
/// besides an explicit pause.
#[derive(Debug)]
pub struct Animator {
    pub flags: AnimationFlags,
    rotation_step: Vec3,
    hue_step: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self {
            flags: AnimationFlags::default(),
            rotation_step: ROTATION_STEP,
            hue_step: HUE_STEP,
        }
    }

    /// Animator with custom increments (used by tests and demos).
    pub fn with_steps(rotation_step: Vec3, hue_step: f32) -> Self {
        Self {
            flags: AnimationFlags::default(),
            rotation_step,
            hue_step,
        }
    }

    pub fn is_running(&self) -> bool {
        self.flags.running
    }

    /// Re-arm a paused loop. The caller is responsible for scheduling the
    /// next frame afterwards.
    pub fn resume(&mut self) {
        self.flags.running = true;
    }

    pub fn pause(&mut self) {
        self.flags.running = false;
    }

    /// Execute one frame step.
    ///
    /// While running: advance every object's rotation and the background hue
    /// (when object animation is enabled), push the drifted color into the
    /// shared material, then render. The hue keeps drifting through the same
    /// material handle the grid clones share, so the bowls track the
    /// backdrop.
    pub fn step<R>(
        &mut self,
        scene: &mut Scene,
        materials: &mut MaterialStore,
        shared_material: MaterialHandle,
        render: R,
    ) -> FrameStatus
    where
        R: FnOnce(&Scene, &MaterialStore) -> Result<(), FrameError>,
    {
        if !self.flags.running {
            return FrameStatus::Skipped;
        }

        if self.flags.objects_animating {
            for object in scene.objects.iter_mut() {
                object.transform.rotation += self.rotation_step;
            }
            scene.background.offset_hue(self.hue_step);
            materials.set_color(shared_material, scene.background);
        }

        match render(scene, materials) {
            Ok(()) => FrameStatus::Rendered,
            Err(error) => {
                self.flags.running = false;
                tracing::error!(%error, "frame step failed, halting the loop");
                FrameStatus::Halted(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_common::Color;
    use glaze_scene::{GRID_SPACING, Material, SceneObject};

    fn rig() -> (Scene, MaterialStore, MaterialHandle) {
        let mut materials = MaterialStore::new();
        let shared = materials.add(Material {
            name: "bowl".into(),
            color: Color::from_rgb8(100, 40, 40),
        });
        let mut scene = Scene::new(Color::from_rgb8(100, 40, 40));
        let template = SceneObject::new(shared);
        scene.populate_grid(&template, GRID_SPACING, shared);
        (scene, materials, shared)
    }

    fn render_ok(_: &Scene, _: &MaterialStore) -> Result<(), FrameError> {
        Ok(())
    }

    #[test]
    fn n_steps_advance_rotation_n_times() {
        let (mut scene, mut materials, shared) = rig();
        let mut animator = Animator::new();

        let n = 10;
        for _ in 0..n {
            let status = animator.step(&mut scene, &mut materials, shared, render_ok);
            assert!(status.continues());
        }

        let expected = ROTATION_STEP * n as f32;
        for object in scene.objects.iter() {
            let r = object.transform.rotation;
            assert!((r.x - expected.x).abs() < 1e-6);
            assert!((r.y - expected.y).abs() < 1e-6);
            assert!((r.z - expected.z).abs() < 1e-6);
        }
    }

    #[test]
    fn disabled_objects_freeze_scene_but_still_render() {
        let (mut scene, mut materials, shared) = rig();
        let mut animator = Animator::new();
        animator.flags.objects_animating = false;

        let background_before = scene.background;
        let rotation_before = scene.objects.get(0).unwrap().transform.rotation;

        let mut renders = 0;
        for _ in 0..5 {
            let status = animator.step(&mut scene, &mut materials, shared, |_, _| {
                renders += 1;
                Ok(())
            });
            assert!(status.continues());
        }

        assert_eq!(renders, 5);
        assert_eq!(scene.background, background_before);
        assert_eq!(
            scene.objects.get(0).unwrap().transform.rotation,
            rotation_before
        );
    }

    #[test]
    fn hue_drift_reaches_background_and_shared_material() {
        let (mut scene, mut materials, shared) = rig();
        let mut animator = Animator::new();

        let before = scene.background;
        animator.step(&mut scene, &mut materials, shared, render_ok);

        assert_ne!(scene.background, before);
        assert_eq!(materials.color(shared), scene.background);
    }

    #[test]
    fn failing_render_halts_and_skips_until_resume() {
        let (mut scene, mut materials, shared) = rig();
        let mut animator = Animator::new();

        let status = animator.step(&mut scene, &mut materials, shared, |_, _| {
            Err(FrameError("surface gone".into()))
        });
        assert!(matches!(status, FrameStatus::Halted(_)));
        assert!(!animator.is_running());

        // Parked: the render closure must not run again.
        let status = animator.step(&mut scene, &mut materials, shared, |_, _| {
            panic!("must not render while paused")
        });
        assert!(matches!(status, FrameStatus::Skipped));
        assert!(!status.continues());

        // A resume re-arms the loop.
        animator.resume();
        let status = animator.step(&mut scene, &mut materials, shared, render_ok);
        assert!(status.continues());
    }

    #[test]
    fn paused_loop_does_not_mutate() {
        let (mut scene, mut materials, shared) = rig();
        let mut animator = Animator::new();
        animator.pause();

        let before = scene.objects.get(0).unwrap().transform.rotation;
        let status = animator.step(&mut scene, &mut materials, shared, render_ok);
        assert!(matches!(status, FrameStatus::Skipped));
        assert_eq!(scene.objects.get(0).unwrap().transform.rotation, before);
    }

    #[test]
    fn empty_registry_steps_safely() {
        let mut scene = Scene::new(Color::WHITE);
        let mut materials = MaterialStore::new();
        let shared = materials.add(Material {
            name: "bowl".into(),
            color: Color::WHITE,
        });
        let mut animator = Animator::new();
        let status = animator.step(&mut scene, &mut materials, shared, render_ok);
        assert!(status.continues());
    }
}

use glam::{Mat4, Vec3};

/// The camera's home diagonal: the subject is framed from (-d, d, d) where
/// d grows as the viewport narrows.
const HOME_DIAGONAL: f32 = 40.0;

/// Orbit camera: rotate/zoom around a fixed target with damped motion.
///
/// Dragging adds angular velocity; [`OrbitCamera::update`] integrates and
/// decays it once per frame, so motion glides to a stop after the pointer is
/// released. There is no panning; the subject stays centered.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    /// Fraction of angular velocity retained per frame.
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut camera = Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            min_distance: 0.1,
            max_distance: f32::MAX,
            fov: 12.5_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            damping: 0.85,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        };
        camera.frame_for_aspect(1.0);
        camera
    }
}

impl OrbitCamera {
    /// Place the camera at `eye`, looking at the current target.
    pub fn look_from(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        self.distance = offset.length().max(1e-4);
        self.yaw = offset.z.atan2(offset.x);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
    }

    /// Camera position derived from the spherical coordinates.
    pub fn eye(&self) -> Vec3 {
        self.target
            + self.distance
                * Vec3::new(
                    self.pitch.cos() * self.yaw.cos(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.sin(),
                )
    }

    /// Reframe for a new viewport aspect ratio.
    ///
    /// The eye sits on the (-1, 1, 1) diagonal at component distance
    /// d = 40 / clamp(aspect, ..1): a narrow (portrait) viewport pushes the
    /// camera back so the grid stays inside the frame, a wide one keeps the
    /// home distance. Zoom limits follow the new distance.
    pub fn frame_for_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        let d = HOME_DIAGONAL / aspect.clamp(f32::EPSILON, 1.0);
        self.look_from(Vec3::new(-d, d, d));
        self.min_distance = self.distance * 0.75;
        self.max_distance = self.distance * 1.5;
    }

    /// Add drag motion. Integrated (with damping) by `update`.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity += dx * self.rotate_sensitivity;
        self.pitch_velocity += dy * self.rotate_sensitivity;
    }

    /// Dolly toward/away from the target; positive `delta` zooms in.
    pub fn zoom(&mut self, delta: f32) {
        let next = self.distance * (1.0 - delta * self.zoom_sensitivity);
        self.distance = next.clamp(self.min_distance, self.max_distance);
    }

    /// Integrate and decay angular velocity. Must run once per frame for the
    /// glide-out to advance.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.yaw_velocity *= self.damping;
        self.pitch_velocity *= self.damping;
        if self.yaw_velocity.abs() < 1e-6 {
            self.yaw_velocity = 0.0;
        }
        if self.pitch_velocity.abs() < 1e-6 {
            self.pitch_velocity = 0.0;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect.max(1e-4), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

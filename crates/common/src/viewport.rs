use serde::{Deserialize, Serialize};

/// Fixed edge length used when fill-screen sizing is disabled.
pub const DEFAULT_EDGE: u32 = 500;

/// Raw container (window) dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Derived canvas size. Recomputed on every resize, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub aspect: f32,
}

/// Compute the target viewport from container dimensions and the fill policy.
///
/// With `fill_screen` off the result is a fixed square (aspect exactly 1.0)
/// regardless of the container. With it on, both edges scale by `max_cover`
/// and the height is floored at 1 so the aspect ratio is always finite and
/// positive.
pub fn compute_viewport(container: Extent, fill_screen: bool, max_cover: f32) -> Viewport {
    if !fill_screen {
        return Viewport {
            width: DEFAULT_EDGE,
            height: DEFAULT_EDGE,
            aspect: 1.0,
        };
    }
    let width = (container.width as f32 * max_cover) as u32;
    let height = ((container.height as f32 * max_cover) as u32).max(1);
    Viewport {
        width,
        height,
        aspect: width as f32 / height as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_is_square_for_any_container() {
        for (w, h) in [(0, 0), (1, 1000), (1920, 1080), (333, 7)] {
            let v = compute_viewport(Extent::new(w, h), false, 1.0);
            assert_eq!(v.width, DEFAULT_EDGE);
            assert_eq!(v.height, DEFAULT_EDGE);
            assert_eq!(v.aspect, 1.0);
        }
    }

    #[test]
    fn fill_mode_aspect_matches_dimensions() {
        let v = compute_viewport(Extent::new(1920, 1080), true, 1.0);
        assert_eq!(v.width, 1920);
        assert_eq!(v.height, 1080);
        assert!((v.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert!(v.aspect > 0.0);
    }

    #[test]
    fn fill_mode_respects_max_cover() {
        let v = compute_viewport(Extent::new(1000, 500), true, 0.5);
        assert_eq!(v.width, 500);
        assert_eq!(v.height, 250);
        assert!((v.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_container_never_divides_by_zero() {
        let v = compute_viewport(Extent::new(800, 0), true, 1.0);
        assert_eq!(v.height, 1);
        assert!(v.aspect.is_finite());
        assert!(v.aspect > 0.0);
    }
}

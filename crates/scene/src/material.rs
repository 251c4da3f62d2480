use glaze_common::Color;
use serde::{Deserialize, Serialize};

/// A handle referencing a material in the [`MaterialStore`].
///
/// Handles are plain indices and are freely copied: many objects referencing
/// the same handle see every mutation of that material on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub usize);

/// A minimal surface description: a name and a base color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: Color,
}

/// Slab of materials addressed by handle.
///
/// Materials are never removed; the store only grows during scene setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return its handle.
    pub fn add(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.materials.len());
        self.materials.push(material);
        handle
    }

    pub fn get(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0)
    }

    /// Base color for a handle; white for a dangling handle so rendering
    /// never has to fail over a missing material.
    pub fn color(&self, handle: MaterialHandle) -> Color {
        self.materials
            .get(handle.0)
            .map(|m| m.color)
            .unwrap_or(Color::WHITE)
    }

    /// Recolor a material in place. Every object holding this handle picks
    /// up the new color on its next draw.
    pub fn set_color(&mut self, handle: MaterialHandle, color: Color) {
        if let Some(material) = self.materials.get_mut(handle.0) {
            material.color = color;
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut store = MaterialStore::new();
        let h = store.add(Material {
            name: "bowl".into(),
            color: Color::from_rgb8(245, 245, 245),
        });
        assert_eq!(store.get(h).unwrap().name, "bowl");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn recolor_is_visible_through_every_handle_copy() {
        let mut store = MaterialStore::new();
        let h = store.add(Material {
            name: "bowl".into(),
            color: Color::WHITE,
        });
        let h2 = h;
        store.set_color(h, Color::from_rgb8(128, 0, 0));
        assert_eq!(store.color(h2), Color::from_rgb8(128, 0, 0));
    }

    #[test]
    fn dangling_handle_reads_white() {
        let store = MaterialStore::new();
        assert_eq!(store.color(MaterialHandle(3)), Color::WHITE);
    }
}

//! Scene regions in the ground (XZ) plane.

use serde::{Deserialize, Serialize};

/// Anything that can answer "is (x, z) inside this region?".
pub trait Region {
    fn contains(&self, x: f32, z: f32) -> bool;
}

impl<R: Region + ?Sized> Region for &R {
    fn contains(&self, x: f32, z: f32) -> bool {
        (**self).contains(x, z)
    }
}

/// Axis-aligned room or floor rectangle. Edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl RegionBounds {
    pub fn new(x_min: f32, x_max: f32, z_min: f32, z_max: f32) -> Self {
        Self {
            x_min: x_min.min(x_max),
            x_max: x_min.max(x_max),
            z_min: z_min.min(z_max),
            z_max: z_min.max(z_max),
        }
    }

    /// A `width` × `depth` rectangle centered on (`cx`, `cz`).
    pub fn centered(cx: f32, cz: f32, width: f32, depth: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cx + width / 2.0,
            cz - depth / 2.0,
            cz + depth / 2.0,
        )
    }
}

impl Region for RegionBounds {
    fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.x_min && x <= self.x_max && z >= self.z_min && z <= self.z_max
    }
}

/// Simple polygon region (vertices in order, implicitly closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRegion {
    pub vertices: Vec<(f32, f32)>,
}

impl PolygonRegion {
    pub fn new(vertices: Vec<(f32, f32)>) -> Self {
        Self { vertices }
    }
}

impl Region for PolygonRegion {
    /// Even-odd ray casting. Degenerate polygons contain nothing.
    fn contains(&self, x: f32, z: f32) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, zi) = self.vertices[i];
            let (xj, zj) = self.vertices[j];
            if (zi > z) != (zj > z) && x < (xj - xi) * (z - zi) / (zj - zi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

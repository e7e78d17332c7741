//! Footprint and bounds queries on model anchors.
//!
//! Pure functions over [`ModelMetadata`]. All checks are axis-aligned:
//! the object's rotation is never applied to its anchors, so a rotated
//! object is tested as if it were unrotated.

use crate::catalog::{ModelMetadata, Vec3};
use crate::region::Region;

/// Ground-plane bounding box (X and Z only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Aabb {
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.x_min && x <= self.x_max && z >= self.z_min && z <= self.z_max
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.z_min < other.z_max
            && other.z_min < self.z_max
    }

    /// The box pulled in by `margin` on every side.
    pub fn shrunk(&self, margin: f32) -> Aabb {
        Aabb {
            x_min: self.x_min + margin,
            x_max: self.x_max - margin,
            z_min: self.z_min + margin,
            z_max: self.z_max - margin,
        }
    }
}

/// Left-right and front-back extents of a model.
pub fn span(model: &ModelMetadata) -> (f32, f32) {
    let b = &model.bounds;
    (b.left.distance(&b.right), b.front.distance(&b.back))
}

/// The larger of the two spans: the model's planar footprint.
pub fn footprint(model: &ModelMetadata) -> f32 {
    let (w, d) = span(model);
    w.max(d)
}

/// Model bounds translated to `position`.
pub fn absolute_bounds(model: &ModelMetadata, position: Vec3) -> Aabb {
    let b = &model.bounds;
    let (lx, rx) = (b.left.x + position.x, b.right.x + position.x);
    let (fz, bz) = (b.front.z + position.z, b.back.z + position.z);
    Aabb {
        x_min: lx.min(rx),
        x_max: lx.max(rx),
        z_min: fz.min(bz),
        z_max: fz.max(bz),
    }
}

/// True iff every fit anchor, placed at `position`, lies inside `region`.
pub fn fits_in_region(model: &ModelMetadata, position: Vec3, region: &dyn Region) -> bool {
    model
        .bounds
        .fit_anchors()
        .iter()
        .all(|a| region.contains(a.x + position.x, a.z + position.z))
}

/// Rotate a ground-plane offset by `degrees` of yaw (Y up, clockwise seen from above).
pub fn rotate_yaw(dx: f32, dz: f32, degrees: f32) -> (f32, f32) {
    if degrees == 0.0 {
        return (dx, dz);
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (dx * cos + dz * sin, -dx * sin + dz * cos)
}

/// Rotate `point` about `pivot` by `degrees` of yaw. Y is untouched.
pub fn rotate_about(point: Vec3, pivot: Vec3, degrees: f32) -> Vec3 {
    let (dx, dz) = rotate_yaw(point.x - pivot.x, point.z - pivot.z, degrees);
    Vec3::new(pivot.x + dx, point.y, pivot.z + dz)
}

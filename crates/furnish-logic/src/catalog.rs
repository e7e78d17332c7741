//! Model catalog and object-id allocation.
//!
//! The engine never owns model data: it reads records through the
//! [`ModelCatalog`] trait and asks an [`IdAllocator`] for object ids. The
//! bundled [`Catalog`] is loaded from `data/household.json`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A point or offset in world space (Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Bounding anchors of a model, relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBounds {
    pub left: Vec3,
    pub right: Vec3,
    pub front: Vec3,
    pub back: Vec3,
    pub center: Vec3,
    pub top: Vec3,
    pub bottom: Vec3,
}

impl ModelBounds {
    /// The five anchors used for region fit checks.
    pub fn fit_anchors(&self) -> [Vec3; 5] {
        [self.left, self.right, self.front, self.back, self.center]
    }
}

/// Read-only metadata for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    /// Catalog label; arrangement categories come from the tables.
    #[serde(default)]
    pub category: String,
    pub bounds: ModelBounds,
}

/// Lookup of model records by name.
pub trait ModelCatalog {
    fn record(&self, name: &str) -> Option<&ModelMetadata>;
}

/// In-memory catalog keyed by model name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: HashMap<String, ModelMetadata>,
}

#[derive(Deserialize)]
struct CatalogFile {
    models: Vec<ModelMetadata>,
}

impl Catalog {
    pub fn new(records: impl IntoIterator<Item = ModelMetadata>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }

    /// Parse a catalog from JSON with a top-level `models` array.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.models))
    }

    /// The household catalog bundled with the crate.
    pub fn household() -> Result<Self> {
        Self::from_json(crate::HOUSEHOLD_JSON)
    }

    pub fn insert(&mut self, record: ModelMetadata) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ModelCatalog for Catalog {
    fn record(&self, name: &str) -> Option<&ModelMetadata> {
        self.records.get(name)
    }
}

/// Source of session-unique object ids.
pub trait IdAllocator {
    fn next_id(&mut self) -> u32;
}

/// Monotonic id counter.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl<A: IdAllocator + ?Sized> IdAllocator for &mut A {
    fn next_id(&mut self) -> u32 {
        (**self).next_id()
    }
}

/// Symmetric bounds for a box `width` × `depth` × `height` resting on its origin.
///
/// Convenience for tests and synthetic catalogs.
pub fn box_bounds(width: f32, depth: f32, height: f32) -> ModelBounds {
    let mid = height / 2.0;
    ModelBounds {
        left: Vec3::new(-width / 2.0, mid, 0.0),
        right: Vec3::new(width / 2.0, mid, 0.0),
        front: Vec3::new(0.0, mid, depth / 2.0),
        back: Vec3::new(0.0, mid, -depth / 2.0),
        center: Vec3::new(0.0, mid, 0.0),
        top: Vec3::new(0.0, height, 0.0),
        bottom: Vec3::ZERO,
    }
}

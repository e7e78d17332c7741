//! Placement instructions and arrangement results.
//!
//! These are the engine's only output. A downstream simulator turns each
//! [`Placement`] into whatever "add object" command it speaks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Vec3;

/// One object to instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: u32,
    pub model_name: String,
    /// Arrangement category this object satisfies.
    pub category: String,
    /// World position, with the arrangement frame's rotation already applied.
    pub position: Vec3,
    /// The object's own yaw inside its arrangement frame, in degrees.
    pub rotation: f32,
    /// Yaw of the arrangement frame (the requested rotation), in degrees.
    pub frame_rotation: f32,
    pub kinematic: bool,
}

impl Placement {
    /// Final yaw in world space, in [0, 360).
    pub fn world_yaw(&self) -> f32 {
        (self.frame_rotation + self.rotation).rem_euclid(360.0)
    }
}

/// Outcome of one `arrange` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrangementResult {
    pub success: bool,
    pub object_ids: Vec<u32>,
    pub kinematic_object_ids: Vec<u32>,
    /// Distinct categories touched, sorted.
    pub categories: Vec<String>,
    pub placements: Vec<Placement>,
}

impl ArrangementResult {
    /// "Nothing fits here."
    pub fn failure() -> Self {
        Self::default()
    }

    /// Build a successful result from placements in emission order.
    pub fn from_placements(placements: Vec<Placement>, categories: BTreeSet<String>) -> Self {
        let object_ids = placements.iter().map(|p| p.id).collect();
        let kinematic_object_ids = placements
            .iter()
            .filter(|p| p.kinematic)
            .map(|p| p.id)
            .collect();
        Self {
            success: true,
            object_ids,
            kinematic_object_ids,
            categories: categories.into_iter().collect(),
            placements,
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements of a given category.
    pub fn of_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Placement> + 'a {
        self.placements.iter().filter(move |p| p.category == category)
    }
}

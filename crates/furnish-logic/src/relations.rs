//! Spatial relations: what goes on, in, and beside a root object.
//!
//! The relation table maps a root category to dependent categories per
//! [`SpatialRelation`]. Surfaces (tops and shelves) are filled by the
//! packer; "beside" relations pick a dependent model and recurse into a
//! full arrangement rooted at it, so a side table can carry its own lamp.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::bounds::{absolute_bounds, fits_in_region, rotate_yaw, span, Aabb};
use crate::catalog::{IdAllocator, ModelCatalog, ModelMetadata, Vec3};
use crate::engine::{ArrangementEngine, SideOverlapPolicy};
use crate::error::{ArrangeError, Result};
use crate::packer::{pack, Surface};
use crate::placement::{ArrangementResult, Placement};
use crate::region::Region;

/// Slack allowed when a neighbour sits flush against an existing object.
const CONTACT_TOLERANCE: f32 = 1e-3;

/// Kinds of spatial relation, in the order they are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialRelation {
    OnTopOf,
    OnShelf,
    LeftOrRightOf,
}

impl SpatialRelation {
    pub const ALL: [SpatialRelation; 3] = [Self::OnTopOf, Self::OnShelf, Self::LeftOrRightOf];
}

impl fmt::Display for SpatialRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnTopOf => "on_top_of",
            Self::OnShelf => "on_shelf",
            Self::LeftOrRightOf => "left_or_right_of",
        };
        f.write_str(name)
    }
}

/// Which side of the root a neighbour goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign along the arrangement frame's X axis.
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Whether a side arrangement was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideOutcome {
    pub side: Side,
    pub success: bool,
}

/// Everything a root's relations produced.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub placements: Vec<Placement>,
    pub categories: BTreeSet<String>,
    pub sides: Vec<SideOutcome>,
}

/// A placed root object whose relations are being expanded.
#[derive(Debug, Clone, Copy)]
pub struct RootObject<'a> {
    pub record: &'a ModelMetadata,
    pub category: &'a str,
    pub position: Vec3,
    pub rotation: f32,
}

impl<C: ModelCatalog, A: IdAllocator> ArrangementEngine<C, A> {
    /// Expand every relation that applies to `root`.
    ///
    /// `placed` holds everything already emitted in this arrangement
    /// (including the root) and is only read.
    pub fn resolve_relations(
        &mut self,
        root: &RootObject<'_>,
        region: &dyn Region,
        placed: &[Placement],
        depth: u32,
    ) -> Result<Resolved> {
        let mut resolved = Resolved::default();
        for kind in self.tables.relations.kinds_for(root.category) {
            let dependents: Vec<String> = self
                .tables
                .relations
                .dependents(kind, root.category)
                .unwrap_or_default()
                .to_vec();
            debug!(
                "{} `{}` ({}) → {:?}",
                kind, root.record.name, root.category, dependents
            );
            match kind {
                SpatialRelation::OnTopOf => {
                    let center = Vec3::new(
                        root.position.x,
                        root.position.y + root.record.bounds.top.y,
                        root.position.z,
                    );
                    self.fill_surface(root, span(root.record), center, &dependents, region, &mut resolved)?;
                }
                SpatialRelation::OnShelf => {
                    let shelf = self.tables.shelf(&root.record.name).cloned().ok_or_else(|| {
                        ArrangeError::missing(root.record.name.as_str(), "no shelf geometry")
                    })?;
                    for y in &shelf.ys {
                        let center =
                            Vec3::new(root.position.x, root.position.y + y, root.position.z);
                        self.fill_surface(root, shelf.size, center, &dependents, region, &mut resolved)?;
                    }
                }
                SpatialRelation::LeftOrRightOf => {
                    if depth >= self.config.max_depth {
                        debug!(
                            "Depth {} reached; not placing neighbours of `{}`",
                            depth, root.record.name
                        );
                        continue;
                    }
                    for side in [Side::Left, Side::Right] {
                        let mut context = placed.to_vec();
                        context.extend(resolved.placements.iter().cloned());
                        let result =
                            self.arrange_beside(root, side, &dependents, region, &context, depth)?;
                        resolved.sides.push(SideOutcome {
                            side,
                            success: result.success,
                        });
                        if result.success {
                            resolved.placements.extend(result.placements);
                            resolved.categories.extend(result.categories);
                        }
                    }
                }
            }
        }
        Ok(resolved)
    }

    /// Pack `dependents` onto one surface of the root.
    ///
    /// Packed objects whose anchors leave `region` are dropped after
    /// packing; the generator stream does not depend on the region.
    fn fill_surface(
        &mut self,
        root: &RootObject<'_>,
        size: (f32, f32),
        center: Vec3,
        dependents: &[String],
        region: &dyn Region,
        resolved: &mut Resolved,
    ) -> Result<()> {
        let surface = Surface {
            size,
            center,
            rotation: root.rotation,
            params: self.tables.packing_params(root.category),
        };
        let outcome = pack(
            &self.catalog,
            &self.tables,
            &surface,
            dependents,
            &mut self.ids,
            &mut self.rng,
        )?;
        let before = resolved.placements.len();
        let packed = outcome.placements.len();
        for placement in outcome.placements {
            let record = self.catalog.record(&placement.model_name).ok_or_else(|| {
                ArrangeError::missing(placement.model_name.as_str(), "no catalog record")
            })?;
            if fits_in_region(record, placement.position, region) {
                resolved.categories.insert(placement.category.clone());
                resolved.placements.push(placement);
            }
        }
        let dropped = packed - (resolved.placements.len() - before);
        if dropped > 0 {
            debug!(
                "Dropped {} of {} objects packed on `{}`: outside the region",
                dropped, packed, root.record.name
            );
        }
        Ok(())
    }

    /// Place one neighbour on `side` of the root and arrange around it.
    fn arrange_beside(
        &mut self,
        root: &RootObject<'_>,
        side: Side,
        dependents: &[String],
        region: &dyn Region,
        placed: &[Placement],
        depth: u32,
    ) -> Result<ArrangementResult> {
        let mut candidates: Vec<(String, String)> = Vec::new();
        for category in dependents {
            let models = self.tables.models_in(category).ok_or_else(|| {
                ArrangeError::missing(
                    category.as_str(),
                    "dependent category is not in the category table",
                )
            })?;
            candidates.extend(models.iter().map(|m| (m.clone(), category.clone())));
        }
        candidates.shuffle(&mut self.rng);

        let occupied = self.occupied_bounds(placed)?;
        let (root_width, _) = span(root.record);
        let mut chosen = None;
        for (name, category) in candidates {
            let record = self
                .catalog
                .record(&name)
                .ok_or_else(|| ArrangeError::missing(name.as_str(), "no catalog record"))?;
            let (width, _) = span(record);
            let offset = side.sign() * (root_width / 2.0 + width / 2.0);
            let (dx, dz) = rotate_yaw(offset, 0.0, root.rotation);
            let position = Vec3::new(root.position.x + dx, root.position.y, root.position.z + dz);

            let footprint = absolute_bounds(record, position).shrunk(CONTACT_TOLERANCE);
            let collides = occupied.iter().any(|b| b.overlaps(&footprint));
            if collides {
                match self.config.side_overlap {
                    SideOverlapPolicy::Reject => continue,
                    SideOverlapPolicy::Advisory => {
                        debug!("`{}` overlaps an existing object (advisory)", name)
                    }
                }
            }
            if fits_in_region(record, position, region) {
                chosen = Some((record.clone(), category, position));
                break;
            }
        }

        let Some((record, category, position)) = chosen else {
            debug!("No {:?} neighbour fits beside `{}`", side, root.record.name);
            return Ok(ArrangementResult::failure());
        };
        self.arrange_from_root(&record, &category, position, root.rotation, region, placed, depth + 1)
    }

    /// Ground-plane bounds of already placed objects.
    fn occupied_bounds(&self, placed: &[Placement]) -> Result<Vec<Aabb>> {
        placed
            .iter()
            .map(|p| {
                self.catalog
                    .record(&p.model_name)
                    .map(|r| absolute_bounds(r, p.position))
                    .ok_or_else(|| ArrangeError::missing(p.model_name.as_str(), "no catalog record"))
            })
            .collect()
    }
}

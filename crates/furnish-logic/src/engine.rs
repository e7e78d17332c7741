//! Arrangement engine: root selection plus relation expansion.
//!
//! The engine owns the random generator, so a sequence of calls on an
//! engine built with the same seed, catalog and tables always yields the
//! same placements. Catalog and id allocator are injected; the engine
//! keeps no global state.
//!
//! ```rust,no_run
//! use furnish_logic::prelude::*;
//!
//! let mut engine = ArrangementEngine::household(EngineConfig::default()).unwrap();
//! let room = RegionBounds::centered(0.0, 0.0, 6.0, 6.0);
//! let result = engine.arrange_at("table", Vec3::ZERO, 0.0, &room).unwrap();
//! for p in &result.placements {
//!     println!("{} {} at {:?}", p.id, p.model_name, p.position);
//! }
//! ```

use std::collections::BTreeSet;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, IdAllocator, ModelCatalog, ModelMetadata, SequentialIds, Vec3};
use crate::error::{ArrangeError, Result};
use crate::packer::{pack, PackOutcome, Surface};
use crate::placement::{ArrangementResult, Placement};
use crate::region::Region;
use crate::relations::RootObject;
use crate::selector::select_fitting;
use crate::tables::ArrangementTables;

/// What to do when a candidate neighbour overlaps something already placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideOverlapPolicy {
    /// Skip the candidate and try the next one.
    #[default]
    Reject,
    /// Log the overlap and place anyway.
    Advisory,
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub seed: u64,
    /// Nesting limit for left/right-of expansion.
    pub max_depth: u32,
    pub side_overlap: SideOverlapPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_depth: 4,
            side_overlap: SideOverlapPolicy::Reject,
        }
    }
}

/// A request for one arrangement.
#[derive(Clone, Copy)]
pub struct PlacementRequest<'a> {
    pub category: &'a str,
    pub position: Vec3,
    /// Degrees about the vertical axis; applied to the whole arrangement.
    pub rotation: f32,
    pub region: &'a dyn Region,
}

/// Procedural arrangement generator.
pub struct ArrangementEngine<C: ModelCatalog = Catalog, A: IdAllocator = SequentialIds> {
    pub(crate) catalog: C,
    pub(crate) tables: ArrangementTables,
    pub(crate) ids: A,
    pub(crate) rng: StdRng,
    pub(crate) config: EngineConfig,
}

impl ArrangementEngine {
    /// Engine over the bundled household catalog and tables.
    pub fn household(config: EngineConfig) -> Result<Self> {
        Ok(Self::new(
            Catalog::household()?,
            ArrangementTables::household()?,
            SequentialIds::default(),
            config,
        ))
    }
}

impl<C: ModelCatalog, A: IdAllocator> ArrangementEngine<C, A> {
    pub fn new(catalog: C, tables: ArrangementTables, ids: A, config: EngineConfig) -> Self {
        Self {
            catalog,
            tables,
            ids,
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn tables(&self) -> &ArrangementTables {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Restart the generator from `seed`. Ids keep counting.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Generate an arrangement rooted at a model of `request.category`.
    ///
    /// An unknown category is an error. If no model of the category fits
    /// the region, the result is unsuccessful and empty.
    pub fn arrange(&mut self, request: &PlacementRequest<'_>) -> Result<ArrangementResult> {
        let models = self
            .tables
            .models_in(request.category)
            .ok_or_else(|| ArrangeError::InvalidCategory(request.category.to_string()))?;
        let record = select_fitting(
            &self.catalog,
            models,
            request.position,
            request.region,
            &mut self.rng,
        )?
        .cloned();
        let Some(record) = record else {
            debug!(
                "No `{}` model fits at ({:.2}, {:.2})",
                request.category, request.position.x, request.position.z
            );
            return Ok(ArrangementResult::failure());
        };
        self.arrange_from_root(
            &record,
            request.category,
            request.position,
            request.rotation,
            request.region,
            &[],
            0,
        )
    }

    /// Convenience form of [`arrange`](Self::arrange).
    pub fn arrange_at(
        &mut self,
        category: &str,
        position: impl Into<Vec3>,
        rotation: f32,
        region: &dyn Region,
    ) -> Result<ArrangementResult> {
        self.arrange(&PlacementRequest {
            category,
            position: position.into(),
            rotation,
            region,
        })
    }

    /// Pack `categories` onto an arbitrary rectangle with the engine's generator and ids.
    pub fn rectangular_arrangement(
        &mut self,
        surface: &Surface,
        categories: &[String],
    ) -> Result<PackOutcome> {
        pack(
            &self.catalog,
            &self.tables,
            surface,
            categories,
            &mut self.ids,
            &mut self.rng,
        )
    }

    /// Emit the root placement, then everything its relations produce.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn arrange_from_root(
        &mut self,
        record: &ModelMetadata,
        category: &str,
        position: Vec3,
        rotation: f32,
        region: &dyn Region,
        prior: &[Placement],
        depth: u32,
    ) -> Result<ArrangementResult> {
        let kinematic = self.tables.is_kinematic(category);
        let own_rotation = if !kinematic && self.tables.has_random_rotation(category) {
            self.rng.gen_range(0.0..360.0)
        } else {
            0.0
        };
        let root = Placement {
            id: self.ids.next_id(),
            model_name: record.name.clone(),
            category: category.to_string(),
            position,
            rotation: own_rotation,
            frame_rotation: rotation,
            kinematic,
        };
        debug!(
            "Root `{}` ({}) id={} depth={}",
            record.name, category, root.id, depth
        );

        let mut placed = prior.to_vec();
        placed.push(root.clone());
        let resolved = self.resolve_relations(
            &RootObject {
                record,
                category,
                position,
                rotation,
            },
            region,
            &placed,
            depth,
        )?;

        let mut categories = BTreeSet::from([category.to_string()]);
        categories.extend(resolved.categories);
        let mut placements = Vec::with_capacity(resolved.placements.len() + 1);
        placements.push(root);
        placements.extend(resolved.placements);
        Ok(ArrangementResult::from_placements(placements, categories))
    }
}

//! Procedural arrangement logic for Furnish.
//!
//! Places clusters of household objects inside a room region: a root
//! object that fits the region, smaller objects packed onto its surfaces,
//! and neighbours beside it. Functions take plain data and return
//! declarative placements; nothing here talks to a simulator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bounds`] | Spans, absolute bounds, region fit checks, yaw rotation |
//! | [`catalog`] | Model metadata, catalog lookup, object-id allocation |
//! | [`engine`] | Root selection and arrangement orchestration |
//! | [`error`] | `ArrangeError` and the crate `Result` alias |
//! | [`grid`] | Occupancy grid with disc footprints |
//! | [`packer`] | Randomized grid packing of a rectangular surface |
//! | [`placement`] | Placement instructions and arrangement results |
//! | [`region`] | Rectangular and polygonal room regions |
//! | [`relations`] | On-top-of, on-shelf and left-or-right-of expansion |
//! | [`selector`] | Shuffle-and-first-fit model selection |
//! | [`tables`] | Static category, shelf, packing and relation tables |

pub mod bounds;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod grid;
pub mod packer;
pub mod placement;
pub mod region;
pub mod relations;
pub mod selector;
pub mod tables;

/// Household catalog and tables, embedded at compile time.
pub const HOUSEHOLD_JSON: &str = include_str!("../../../data/household.json");

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::{Catalog, IdAllocator, ModelCatalog, ModelMetadata, SequentialIds, Vec3};
    pub use crate::engine::{ArrangementEngine, EngineConfig, PlacementRequest, SideOverlapPolicy};
    pub use crate::error::{ArrangeError, Result};
    pub use crate::packer::Surface;
    pub use crate::placement::{ArrangementResult, Placement};
    pub use crate::region::{PolygonRegion, Region, RegionBounds};
    pub use crate::relations::SpatialRelation;
    pub use crate::tables::{ArrangementTables, PackingParams};
}

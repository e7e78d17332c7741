//! Randomized occupancy-grid packing of small objects onto a rectangle.
//!
//! Every candidate model is approximated by a disc whose radius (in cells)
//! is its larger planar span. Interior cells are scanned row-major; at each
//! free cell the largest disc that fits is found, a model small enough for
//! that disc is drawn at random, and the disc is marked occupied. Packing
//! is greedy: it never backtracks and makes no attempt at optimal coverage.

use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};
use rand::Rng;

use crate::bounds::{footprint, rotate_yaw};
use crate::catalog::{IdAllocator, ModelCatalog, Vec3};
use crate::error::{ArrangeError, Result};
use crate::grid::OccupancyGrid;
use crate::placement::Placement;
use crate::tables::{ArrangementTables, PackingParams};

/// Positional jitter as a fraction of the cell size.
const JITTER_FRACTION: f32 = 0.025;

/// Slack for float error when counting cells along an axis.
const AXIS_EPSILON: f32 = 1e-4;

/// A rectangular surface to pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// (x extent, z extent) before rotation.
    pub size: (f32, f32),
    /// Center of the rectangle; its Y is the height objects are placed at.
    pub center: Vec3,
    /// Yaw of the whole arrangement about `center`, in degrees.
    pub rotation: f32,
    pub params: PackingParams,
}

/// Objects packed onto one surface.
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    pub placements: Vec<Placement>,
    pub categories: BTreeSet<String>,
}

/// A model that could fit on the surface.
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    category: String,
    /// Footprint disc radius in cells.
    radius: usize,
}

/// Number of interior coordinates along an axis: `c, 2c, …` strictly below `extent - c`.
fn axis_cells(extent: f32, cell_size: f32) -> usize {
    let span = (extent - 2.0 * cell_size) / cell_size;
    if span <= 0.0 {
        0
    } else {
        (span - AXIS_EPSILON).ceil().max(0.0) as usize
    }
}

/// Collect models from `categories` whose footprint is below `max_footprint`.
fn eligible_candidates(
    catalog: &dyn ModelCatalog,
    tables: &ArrangementTables,
    categories: &[String],
    max_footprint: f32,
    cell_size: f32,
) -> Result<Vec<Candidate>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for category in categories {
        let Some(models) = tables.models_in(category) else {
            warn!("Invalid model category for packing: {}", category);
            return Err(ArrangeError::missing(
                category.as_str(),
                "dependent category is not in the category table",
            ));
        };
        for name in models {
            let record = catalog
                .record(name)
                .ok_or_else(|| ArrangeError::missing(name.as_str(), "no catalog record"))?;
            let size = footprint(record);
            if size < max_footprint && seen.insert(name.as_str()) {
                candidates.push(Candidate {
                    name: name.clone(),
                    category: category.clone(),
                    radius: (size / cell_size) as usize + 1,
                });
            }
        }
    }
    Ok(candidates)
}

/// Scan `radii` (ascending) and keep the last one whose disc fits at (`ix`, `iz`).
///
/// Stops at the first radius that fails. Discs are nested, so a failing
/// radius means every larger one fails too.
fn largest_fitting_radius(
    grid: &OccupancyGrid,
    ix: usize,
    iz: usize,
    radii: &[usize],
) -> Option<usize> {
    let mut best = None;
    for &r in radii {
        if !grid.disc_fits(ix, iz, r) {
            break;
        }
        best = Some(r);
    }
    best
}

/// Pack objects from `categories` onto `surface`.
///
/// Unknown categories and models without catalog records are configuration
/// errors. Everything else (skipped cells, models too large for the
/// surface) only affects how full the surface ends up.
pub fn pack(
    catalog: &dyn ModelCatalog,
    tables: &ArrangementTables,
    surface: &Surface,
    categories: &[String],
    ids: &mut impl IdAllocator,
    rng: &mut impl Rng,
) -> Result<PackOutcome> {
    let PackingParams { cell_size, density } = surface.params;
    let mut outcome = PackOutcome::default();
    if cell_size <= 0.0 {
        warn!("Refusing to pack with non-positive cell size {}", cell_size);
        return Ok(outcome);
    }

    // Grid axes run along (shorter, longer) side.
    let (sx, sz) = surface.size;
    let transposed = sx > sz;
    let (width, depth) = if transposed { (sz, sx) } else { (sx, sz) };

    let candidates = eligible_candidates(
        catalog,
        tables,
        categories,
        width - 2.0 * cell_size,
        cell_size,
    )?;
    let mut grid = OccupancyGrid::new(axis_cells(width, cell_size), axis_cells(depth, cell_size));
    let (nx, nz) = grid.shape();
    if candidates.is_empty() || nx == 0 || nz == 0 {
        debug!(
            "Nothing to pack on {:.2}×{:.2} surface ({} candidates)",
            sx,
            sz,
            candidates.len()
        );
        return Ok(outcome);
    }

    let mut radii: Vec<usize> = candidates.iter().map(|c| c.radius).collect();
    radii.sort_unstable();
    radii.dedup();

    let jitter = cell_size * JITTER_FRACTION;
    for ix in 0..nx {
        for iz in 0..nz {
            if grid.is_border(ix, iz) {
                continue;
            }
            if grid.is_occupied(ix, iz) || rng.gen::<f32>() < density {
                continue;
            }
            let Some(radius) = largest_fitting_radius(&grid, ix, iz, &radii) else {
                continue;
            };
            let fitting: Vec<&Candidate> = candidates.iter().filter(|c| c.radius <= radius).collect();
            if fitting.is_empty() {
                continue;
            }
            let chosen = fitting[rng.gen_range(0..fitting.len())];

            // Cell → offset from the surface center.
            let gx = ix as f32 * cell_size + rng.gen_range(-jitter..jitter) + cell_size - width / 2.0;
            let gz = iz as f32 * cell_size + rng.gen_range(-jitter..jitter) + cell_size - depth / 2.0;
            let (lx, lz) = if transposed { (gz, gx) } else { (gx, gz) };
            let (dx, dz) = rotate_yaw(lx, lz, surface.rotation);
            let position = Vec3::new(
                surface.center.x + dx,
                surface.center.y,
                surface.center.z + dz,
            );

            let id = ids.next_id();
            let kinematic = tables.is_kinematic(&chosen.category);
            let rotation = if kinematic {
                0.0
            } else {
                rng.gen_range(0.0..360.0)
            };
            outcome.placements.push(Placement {
                id,
                model_name: chosen.name.clone(),
                category: chosen.category.clone(),
                position,
                rotation,
                frame_rotation: surface.rotation,
                kinematic,
            });
            outcome.categories.insert(chosen.category.clone());
            grid.mark_disc(ix, iz, radius);
        }
    }

    debug!(
        "Packed {} objects on {}×{} grid ({} cells occupied)",
        outcome.placements.len(),
        nx,
        nz,
        grid.occupied_count()
    );
    Ok(outcome)
}

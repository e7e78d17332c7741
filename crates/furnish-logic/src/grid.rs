//! Occupancy grid for surface packing.
//!
//! A row-major boolean grid laid over a rectangular surface. A cell is
//! `true` once it is covered by a placed object's footprint disc. Grids
//! live for exactly one packing call.

/// Boolean occupancy over `nx` × `nz` cells.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    nx: usize,
    nz: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(nx: usize, nz: usize) -> Self {
        Self {
            nx,
            nz,
            cells: vec![false; nx * nz],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.nz)
    }

    pub fn is_occupied(&self, ix: usize, iz: usize) -> bool {
        self.cells[ix * self.nz + iz]
    }

    /// True if (`ix`, `iz`) lies on the outermost ring of cells.
    pub fn is_border(&self, ix: usize, iz: usize) -> bool {
        ix == 0 || iz == 0 || ix + 1 >= self.nx || iz + 1 >= self.nz
    }

    /// A disc of `radius` cells centered on (`ix`, `iz`) stays inside the grid.
    pub fn disc_in_bounds(&self, ix: usize, iz: usize, radius: usize) -> bool {
        ix >= radius && iz >= radius && ix + radius < self.nx && iz + radius < self.nz
    }

    /// The disc touches no occupied cell. Assumes the disc is in bounds.
    pub fn disc_is_free(&self, ix: usize, iz: usize, radius: usize) -> bool {
        self.disc_cells(ix, iz, radius)
            .all(|(x, z)| !self.is_occupied(x, z))
    }

    /// Radius passes both the bounds and the overlap test.
    pub fn disc_fits(&self, ix: usize, iz: usize, radius: usize) -> bool {
        self.disc_in_bounds(ix, iz, radius) && self.disc_is_free(ix, iz, radius)
    }

    /// Mark every in-grid cell of the disc as occupied.
    pub fn mark_disc(&mut self, ix: usize, iz: usize, radius: usize) {
        let cells: Vec<(usize, usize)> = self.disc_cells(ix, iz, radius).collect();
        for (x, z) in cells {
            self.cells[x * self.nz + z] = true;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// In-grid cells with squared distance ≤ radius².
    fn disc_cells(
        &self,
        ix: usize,
        iz: usize,
        radius: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        let r2 = radius * radius;
        let x_lo = ix.saturating_sub(radius);
        let x_hi = (ix + radius).min(self.nx.saturating_sub(1));
        let z_lo = iz.saturating_sub(radius);
        let z_hi = (iz + radius).min(self.nz.saturating_sub(1));
        (x_lo..=x_hi).flat_map(move |x| {
            (z_lo..=z_hi).filter_map(move |z| {
                let dx = x.abs_diff(ix);
                let dz = z.abs_diff(iz);
                (dx * dx + dz * dz <= r2).then_some((x, z))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_empty() {
        let g = OccupancyGrid::new(5, 7);
        assert_eq!(g.shape(), (5, 7));
        assert_eq!(g.occupied_count(), 0);
    }

    #[test]
    fn test_border_cells() {
        let g = OccupancyGrid::new(5, 5);
        assert!(g.is_border(0, 2));
        assert!(g.is_border(4, 2));
        assert!(g.is_border(2, 0));
        assert!(g.is_border(2, 4));
        assert!(!g.is_border(2, 2));
    }

    #[test]
    fn test_disc_bounds() {
        let g = OccupancyGrid::new(10, 10);
        assert!(g.disc_in_bounds(5, 5, 4));
        assert!(!g.disc_in_bounds(5, 5, 5), "5 + 5 = 10 is off the grid");
        assert!(!g.disc_in_bounds(1, 5, 2));
    }

    #[test]
    fn test_mark_disc_shape() {
        let mut g = OccupancyGrid::new(9, 9);
        g.mark_disc(4, 4, 2);
        // Radius-2 lattice disc: 13 cells.
        assert_eq!(g.occupied_count(), 13);
        assert!(g.is_occupied(4, 6));
        assert!(g.is_occupied(5, 5));
        assert!(!g.is_occupied(6, 6), "corner is outside the disc");
    }

    #[test]
    fn test_overlap_detection() {
        let mut g = OccupancyGrid::new(20, 20);
        g.mark_disc(5, 5, 3);
        assert!(!g.disc_is_free(9, 5, 1), "(8,5) is covered");
        assert!(g.disc_is_free(10, 5, 1));
        assert!(!g.disc_fits(5, 5, 1));
        assert!(g.disc_fits(14, 14, 4));
    }

    #[test]
    fn test_mark_disc_clips_to_grid() {
        let mut g = OccupancyGrid::new(3, 3);
        g.mark_disc(0, 0, 1);
        assert_eq!(g.occupied_count(), 3);
    }
}

//! Uniform-grid spatial index for decaying scent samples.
//!
//! The arena is cut into square cells of `cell_size`. Each cell owns a bucket
//! of the samples deposited inside it, stored in one flat vector indexed
//! `row * grid_width + col`. Radius queries first collect the cells that
//! overlap the query disc (broad phase) and then check the exact distance of
//! every candidate (narrow phase).

use ndarray::Array1;
use rayon::prelude::*;

use super::geometric_utils;
use super::params::Params;
use super::scent::ScentSample;

/// Largest number of cells a field may span.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Columns and rows needed to cover a `box_width` x `box_height` arena, or
/// `None` if the grid would exceed [`MAX_GRID_CELLS`] or the inputs are not finite.
pub(crate) fn grid_dimensions(
    box_width: f32,
    box_height: f32,
    cell_size: f32,
) -> Option<(usize, usize)> {
    let axis = |extent: f32| {
        let n = (extent / cell_size).ceil();
        (n.is_finite() && n <= MAX_GRID_CELLS as f32).then(|| (n as usize).max(1))
    };
    let (grid_width, grid_height) = (axis(box_width)?, axis(box_height)?);
    grid_width
        .checked_mul(grid_height)
        .filter(|&cells| cells <= MAX_GRID_CELLS)?;
    Some((grid_width, grid_height))
}

/// Which owners a radius query should keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Only samples deposited by the given owner.
    Own,
    /// Only samples deposited by anyone except the given owner.
    Foreign,
}

impl OwnerFilter {
    /// Returns `true` if a sample owned by `sample_owner` passes the filter for `owner_id`.
    pub fn matches(self, sample_owner: u32, owner_id: u32) -> bool {
        match self {
            OwnerFilter::Own => sample_owner == owner_id,
            OwnerFilter::Foreign => sample_owner != owner_id,
        }
    }
}

/// Decaying scent samples bucketed on a uniform grid.
#[derive(Debug, Clone)]
pub struct ScentField {
    cells: Vec<Vec<ScentSample>>,
    grid_width: usize,
    grid_height: usize,
    cell_size: f32,
    decay_rate: f32,
    dirty: bool,
}

impl ScentField {
    /// Creates an empty field covering a `box_width` x `box_height` arena.
    ///
    /// # Arguments
    ///
    /// * `box_width` - Arena width
    /// * `box_height` - Arena height
    /// * `cell_size` - Side length of a grid cell, must be > 0
    /// * `decay_rate` - Strength lost by every sample per second
    ///
    /// # Returns
    ///
    /// A field with `ceil(box_width / cell_size) x ceil(box_height / cell_size)` cells.
    ///
    /// # Panics
    ///
    /// Panics if the grid would need more than [`MAX_GRID_CELLS`] cells, which
    /// includes a zero or non-finite `cell_size`. [`Params::validate`] rejects
    /// such arenas up front.
    pub fn new(box_width: f32, box_height: f32, cell_size: f32, decay_rate: f32) -> Self {
        let Some((grid_width, grid_height)) = grid_dimensions(box_width, box_height, cell_size)
        else {
            panic!(
                "a {box_width} x {box_height} arena with cell size {cell_size} exceeds {MAX_GRID_CELLS} cells"
            );
        };

        Self {
            cells: vec![Vec::new(); grid_width * grid_height],
            grid_width,
            grid_height,
            cell_size,
            decay_rate,
            dirty: true,
        }
    }

    /// Creates an empty field sized and configured from simulation parameters.
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.box_width,
            params.box_height,
            params.cell_size,
            params.pheromone_decay_rate,
        )
    }

    /// Number of cell columns.
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Number of cell rows.
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Side length of a cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Strength lost by every sample per second.
    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Flat bucket index for a position, or `None` if it lies off the grid.
    pub fn cell_index(&self, pos: &Array1<f32>) -> Option<usize> {
        let (x, y) = (pos[0], pos[1]);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let col = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        if col >= self.grid_width || row >= self.grid_height {
            return None;
        }
        Some(row * self.grid_width + col)
    }

    /// Deposits a new sample.
    ///
    /// Positions off the grid and non-positive strengths are ignored. Samples
    /// are never merged; every deposit is kept on its own.
    ///
    /// # Returns
    ///
    /// `true` if the sample was stored.
    pub fn insert(&mut self, pos: &Array1<f32>, owner_id: u32, strength: f32) -> bool {
        if strength.is_nan() || strength <= 0.0 {
            return false;
        }
        let Some(index) = self.cell_index(pos) else {
            return false;
        };

        self.cells[index].push(ScentSample::new(pos.clone(), owner_id, strength));
        self.dirty = true;
        true
    }

    /// Ages every sample by `dt` and evicts the ones whose strength reached zero.
    ///
    /// Buckets are processed in parallel; samples never interact, so the outcome
    /// does not depend on the processing order.
    ///
    /// # Returns
    ///
    /// The number of samples evicted.
    pub fn decay(&mut self, dt: f32) -> usize {
        let rate = self.decay_rate;

        let removed: usize = self
            .cells
            .par_iter_mut()
            .map(|bucket| {
                let before = bucket.len();
                for sample in bucket.iter_mut() {
                    sample.decay(rate, dt);
                }
                bucket.retain(|sample| !sample.is_expired());
                before - bucket.len()
            })
            .sum();

        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Finds the samples within `radius` of `center` that pass the owner filter.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the query disc
    /// * `radius` - Query radius, distances equal to it are included
    /// * `owner_id` - Owner the filter is relative to
    /// * `filter` - Keep the owner's own samples or everyone else's
    ///
    /// # Returns
    ///
    /// References to the matching samples in no particular order. A query that
    /// misses the grid entirely yields an empty vector.
    pub fn query(
        &self,
        center: &Array1<f32>,
        radius: f32,
        owner_id: u32,
        filter: OwnerFilter,
    ) -> Vec<&ScentSample> {
        let mut found = Vec::new();

        let Some((min_col, max_col)) = self.cell_span(center[0], radius, self.grid_width) else {
            return found;
        };
        let Some((min_row, max_row)) = self.cell_span(center[1], radius, self.grid_height) else {
            return found;
        };

        for row in min_row..=max_row {
            let start = row * self.grid_width;
            for bucket in &self.cells[start + min_col..=start + max_col] {
                found.extend(bucket.iter().filter(|sample| {
                    filter.matches(sample.owner_id, owner_id)
                        && geometric_utils::distance(&sample.pos, center) <= radius
                }));
            }
        }

        found
    }

    /// Inclusive range of cells along one axis touched by `[c - radius, c + radius]`,
    /// clamped to the grid.
    fn cell_span(&self, c: f32, radius: f32, cells: usize) -> Option<(usize, usize)> {
        if !c.is_finite() || radius.is_nan() || radius < 0.0 {
            return None;
        }

        let lo = ((c - radius) / self.cell_size).floor();
        let hi = ((c + radius) / self.cell_size).floor();
        let last = (cells - 1) as f32;
        if hi < 0.0 || lo > last {
            return None;
        }

        Some((lo.max(0.0) as usize, hi.min(last) as usize))
    }

    /// Iterates over every live sample, bucket by bucket.
    pub fn samples(&self) -> impl Iterator<Item = &ScentSample> {
        self.cells.iter().flatten()
    }

    /// Samples stored in the cell at (`col`, `row`). Off-grid cells are empty.
    pub fn cell_samples(&self, col: usize, row: usize) -> &[ScentSample] {
        if col >= self.grid_width || row >= self.grid_height {
            return &[];
        }
        &self.cells[row * self.grid_width + col]
    }

    /// Total number of live samples.
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Returns `true` if the field holds no samples.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Removes every sample.
    pub fn clear(&mut self) {
        for bucket in &mut self.cells {
            bucket.clear();
        }
        self.dirty = true;
    }

    /// Returns `true` if samples changed since the last [`mark_clean`](Self::mark_clean).
    ///
    /// Hosts that cache a rendered scent layer use this to skip redraws.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledges the current contents as rendered.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

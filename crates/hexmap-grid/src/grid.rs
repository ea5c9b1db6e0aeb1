//! Grid assembly, neighbor wiring, chunk membership and lookups.

use std::sync::Arc;

use glam::Vec3;
use hexmap_config::{Config, MapConfig};
use hexmap_coords::{HexCoordinates, HexDirection, INNER_RADIUS, OUTER_RADIUS};
use hexmap_metrics::{EdgeType, HexMetrics};

use crate::cell::HexCell;
use crate::chunk::GridChunk;

/// All cells of a map, partitioned into chunks.
#[derive(Clone, Debug)]
pub struct HexGrid {
    metrics: Arc<HexMetrics>,
    cell_count_x: usize,
    cell_count_z: usize,
    chunk_count_x: usize,
    chunk_count_z: usize,
    chunk_size_x: usize,
    chunk_size_z: usize,
    pub(crate) cells: Vec<HexCell>,
    chunks: Vec<GridChunk>,
    dirty_queue: Vec<usize>,
}

impl HexGrid {
    /// Build a flat, dry grid. Every chunk starts dirty.
    pub fn new(map: &MapConfig, metrics: Arc<HexMetrics>) -> Self {
        let chunk_count_x = map.chunk_count_x as usize;
        let chunk_count_z = map.chunk_count_z as usize;
        let chunk_size_x = map.chunk_size_x as usize;
        let chunk_size_z = map.chunk_size_z as usize;
        let cell_count_x = chunk_count_x * chunk_size_x;
        let cell_count_z = chunk_count_z * chunk_size_z;

        let chunk_count = chunk_count_x * chunk_count_z;
        let mut grid = Self {
            metrics,
            cell_count_x,
            cell_count_z,
            chunk_count_x,
            chunk_count_z,
            chunk_size_x,
            chunk_size_z,
            cells: Vec::with_capacity(cell_count_x * cell_count_z),
            chunks: (0..chunk_count)
                .map(|_| GridChunk::new(chunk_size_x * chunk_size_z))
                .collect(),
            dirty_queue: (0..chunk_count).collect(),
        };

        for z in 0..cell_count_z {
            for x in 0..cell_count_x {
                grid.create_cell(x, z);
            }
        }

        tracing::debug!(
            cells = grid.cells.len(),
            chunks = grid.chunks.len(),
            "hex grid assembled"
        );
        grid
    }

    /// Build metrics and grid from a full configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.map, Arc::new(HexMetrics::new(&config.terrain)))
    }

    fn create_cell(&mut self, x: usize, z: usize) {
        let i = self.cells.len();
        let position = Vec3::new(
            (x as f32 + z as f32 * 0.5 - (z / 2) as f32) * (INNER_RADIUS * 2.0),
            0.0,
            z as f32 * (OUTER_RADIUS * 1.5),
        );
        let position = Vec3::new(
            position.x,
            self.metrics.elevation_perturbation(position),
            position.z,
        );

        let chunk_x = x / self.chunk_size_x;
        let chunk_z = z / self.chunk_size_z;
        let chunk = chunk_x + chunk_z * self.chunk_count_x;
        let slot = (x % self.chunk_size_x) + (z % self.chunk_size_z) * self.chunk_size_x;

        let coordinates = HexCoordinates::from_offset(x as i32, z as i32);
        self.cells.push(HexCell::new(coordinates, position, chunk));
        self.chunks[chunk].set_cell(slot, i);

        if x > 0 {
            self.set_neighbor(i, HexDirection::W, i - 1);
        }
        if z > 0 {
            let below = i - self.cell_count_x;
            if z % 2 == 0 {
                self.set_neighbor(i, HexDirection::SE, below);
                if x > 0 {
                    self.set_neighbor(i, HexDirection::SW, below - 1);
                }
            } else {
                self.set_neighbor(i, HexDirection::SW, below);
                if x < self.cell_count_x - 1 {
                    self.set_neighbor(i, HexDirection::SE, below + 1);
                }
            }
        }
    }

    /// Link `cell` and `other` across `direction` in both directions.
    fn set_neighbor(&mut self, cell: usize, direction: HexDirection, other: usize) {
        self.cells[cell].neighbors[direction.index()] = Some(other);
        self.cells[other].neighbors[direction.opposite().index()] = Some(cell);
    }

    // --- Accessors ---

    pub fn metrics(&self) -> &Arc<HexMetrics> {
        &self.metrics
    }

    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    pub fn chunk_count_x(&self) -> usize {
        self.chunk_count_x
    }

    pub fn chunk_count_z(&self) -> usize {
        self.chunk_count_z
    }

    /// Cell at arena index `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid cell index.
    pub fn cell(&self, index: usize) -> &HexCell {
        &self.cells[index]
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn chunk(&self, index: usize) -> &GridChunk {
        &self.chunks[index]
    }

    pub fn chunks(&self) -> &[GridChunk] {
        &self.chunks
    }

    // --- Lookups ---

    /// Arena index of the cell at `coordinates`, `None` when off the grid.
    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<usize> {
        let z = coordinates.z();
        if z < 0 || z as usize >= self.cell_count_z {
            return None;
        }
        let x = coordinates.x() + z / 2;
        if x < 0 || x as usize >= self.cell_count_x {
            return None;
        }
        Some(x as usize + z as usize * self.cell_count_x)
    }

    /// Arena index of the cell containing world `position`.
    pub fn cell_at_position(&self, position: Vec3) -> Option<usize> {
        self.cell_at(HexCoordinates::from_position(position))
    }

    pub fn neighbor(&self, cell: usize, direction: HexDirection) -> Option<usize> {
        self.cells[cell].neighbor(direction)
    }

    /// Edge type between `cell` and its neighbor across `direction`.
    pub fn edge_type(&self, cell: usize, direction: HexDirection) -> Option<EdgeType> {
        self.neighbor(cell, direction)
            .map(|n| self.edge_type_between(cell, n))
    }

    /// Edge type between any two cells, by elevation alone.
    pub fn edge_type_between(&self, a: usize, b: usize) -> EdgeType {
        EdgeType::between(self.cells[a].elevation, self.cells[b].elevation)
    }

    /// Absolute elevation difference across `direction`; 0 at the border.
    pub fn elevation_difference(&self, cell: usize, direction: HexDirection) -> u32 {
        self.neighbor(cell, direction)
            .map_or(0, |n| self.cells[cell].elevation.abs_diff(self.cells[n].elevation))
    }

    // --- Dirty tracking ---

    /// Queue a chunk for retriangulation; repeated calls are no-ops.
    pub fn mark_chunk_dirty(&mut self, chunk: usize) {
        if self.chunks[chunk].mark_dirty() {
            self.dirty_queue.push(chunk);
        }
    }

    /// Mark every chunk dirty, in index order.
    pub fn mark_all_dirty(&mut self) {
        for chunk in 0..self.chunks.len() {
            self.mark_chunk_dirty(chunk);
        }
    }

    /// Number of chunks waiting for retriangulation.
    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty_queue.len()
    }

    /// Drain the dirty queue in the order chunks became dirty, clearing their flags.
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        let queue = std::mem::take(&mut self.dirty_queue);
        for &chunk in &queue {
            self.chunks[chunk].clear_dirty();
        }
        queue
    }
}

//! Cell mutators. Each one preserves the river and road invariants and
//! dirties exactly the chunks whose geometry can change.

use glam::Vec3;
use hexmap_coords::HexDirection;

use crate::grid::HexGrid;

impl HexGrid {
    // --- Refresh ---

    /// Dirty the cell's chunk and every different chunk a neighbor lives in.
    fn refresh(&mut self, cell: usize) {
        let chunk = self.cells[cell].chunk;
        self.mark_chunk_dirty(chunk);
        for d in HexDirection::ALL {
            if let Some(n) = self.cells[cell].neighbor(d) {
                let other = self.cells[n].chunk;
                if other != chunk {
                    self.mark_chunk_dirty(other);
                }
            }
        }
    }

    fn refresh_self_only(&mut self, cell: usize) {
        let chunk = self.cells[cell].chunk;
        self.mark_chunk_dirty(chunk);
    }

    /// Recompute the world height of a cell from its elevation.
    pub(crate) fn refresh_position(&mut self, cell: usize) {
        let metrics = self.metrics().clone();
        let p = self.cells[cell].position;
        let y = self.cells[cell].elevation as f32 * metrics.elevation_step
            + metrics.elevation_perturbation(p);
        self.cells[cell].position = Vec3::new(p.x, y, p.z);
    }

    // --- Elevation, water, terrain ---

    /// Change a cell's elevation, pruning rivers and roads it invalidates.
    pub fn set_elevation(&mut self, cell: usize, elevation: i32) {
        if self.cells[cell].elevation == elevation {
            return;
        }
        self.cells[cell].elevation = elevation;
        self.refresh_position(cell);

        if let Some(d) = self.cells[cell].outgoing_river
            && let Some(n) = self.cells[cell].neighbor(d)
            && elevation < self.cells[n].elevation
        {
            tracing::trace!(cell, ?d, "outgoing river now flows uphill, removing");
            self.remove_outgoing_river(cell);
        }
        if let Some(d) = self.cells[cell].incoming_river
            && let Some(n) = self.cells[cell].neighbor(d)
            && elevation > self.cells[n].elevation
        {
            tracing::trace!(cell, ?d, "incoming river now flows uphill, removing");
            self.remove_incoming_river(cell);
        }

        for d in HexDirection::ALL {
            if self.cells[cell].roads[d.index()] && self.elevation_difference(cell, d) > 1 {
                self.set_road(cell, d, false);
            }
        }

        self.refresh(cell);
    }

    pub fn set_water_level(&mut self, cell: usize, water_level: i32) {
        if self.cells[cell].water_level == water_level {
            return;
        }
        self.cells[cell].water_level = water_level;
        self.refresh(cell);
    }

    pub fn set_terrain_type(&mut self, cell: usize, terrain_type: u8) {
        if self.cells[cell].terrain_type == terrain_type {
            return;
        }
        self.cells[cell].terrain_type = terrain_type;
        self.refresh(cell);
    }

    // --- Rivers ---

    /// Start a river flowing out of `cell` across `direction`.
    ///
    /// Silently ignored when there is no neighbor or the neighbor is higher.
    /// Replaces any existing outgoing river, takes over the edge from an
    /// incoming river or road, and replaces the neighbor's incoming river.
    pub fn set_outgoing_river(&mut self, cell: usize, direction: HexDirection) {
        if self.cells[cell].outgoing_river == Some(direction) {
            return;
        }
        let Some(neighbor) = self.cells[cell].neighbor(direction) else {
            return;
        };
        if self.cells[cell].elevation < self.cells[neighbor].elevation {
            tracing::trace!(cell, ?direction, "rejected uphill river");
            return;
        }

        self.remove_outgoing_river(cell);
        if self.cells[cell].incoming_river == Some(direction) {
            self.remove_incoming_river(cell);
        }
        self.cells[cell].outgoing_river = Some(direction);

        self.remove_incoming_river(neighbor);
        self.cells[neighbor].incoming_river = Some(direction.opposite());

        self.set_road(cell, direction, false);
        self.refresh_self_only(cell);
        self.refresh_self_only(neighbor);
    }

    pub fn remove_outgoing_river(&mut self, cell: usize) {
        let Some(d) = self.cells[cell].outgoing_river.take() else {
            return;
        };
        self.refresh_self_only(cell);
        if let Some(n) = self.cells[cell].neighbor(d) {
            self.cells[n].incoming_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_incoming_river(&mut self, cell: usize) {
        let Some(d) = self.cells[cell].incoming_river.take() else {
            return;
        };
        self.refresh_self_only(cell);
        if let Some(n) = self.cells[cell].neighbor(d) {
            self.cells[n].outgoing_river = None;
            self.refresh_self_only(n);
        }
    }

    pub fn remove_river(&mut self, cell: usize) {
        self.remove_outgoing_river(cell);
        self.remove_incoming_river(cell);
    }

    // --- Roads ---

    /// Add a road across `direction` if the edge allows one.
    pub fn add_road(&mut self, cell: usize, direction: HexDirection) {
        if self.cells[cell].neighbor(direction).is_none()
            || self.cells[cell].roads[direction.index()]
            || self.cells[cell].has_river_through_edge(direction)
            || self.elevation_difference(cell, direction) > 1
        {
            return;
        }
        self.set_road(cell, direction, true);
    }

    pub fn remove_roads(&mut self, cell: usize) {
        for d in HexDirection::ALL {
            if self.cells[cell].roads[d.index()] {
                self.set_road(cell, d, false);
            }
        }
    }

    /// Write a road flag on both sides of an edge and dirty both chunks.
    fn set_road(&mut self, cell: usize, direction: HexDirection, state: bool) {
        let Some(n) = self.cells[cell].neighbor(direction) else {
            return;
        };
        if self.cells[cell].roads[direction.index()] == state {
            return;
        }
        self.cells[cell].roads[direction.index()] = state;
        self.cells[n].roads[direction.opposite().index()] = state;
        self.refresh_self_only(n);
        self.refresh_self_only(cell);
    }
}

//! Deferred rebuilds: dirty chunks are retriangulated once per tick no matter
//! how many edits touched them.

use std::time::Instant;

use hexmap_grid::HexGrid;

use crate::hex_mesh::ChunkMeshes;
use crate::triangulator::ChunkTriangulator;

/// Owns the output buffers of every chunk and rebuilds the stale ones.
#[derive(Clone, Debug, Default)]
pub struct MeshScheduler {
    meshes: Vec<ChunkMeshes>,
}

impl MeshScheduler {
    /// Creates empty buffers for every chunk of `grid`.
    ///
    /// Nothing is triangulated until the first [`tick`](Self::tick); a new
    /// grid starts with every chunk dirty.
    pub fn new(grid: &HexGrid) -> Self {
        Self {
            meshes: vec![ChunkMeshes::new(); grid.chunks().len()],
        }
    }

    /// Rebuild every dirty chunk and clear its flag.
    ///
    /// Returns the number of chunks rebuilt.
    pub fn tick(&mut self, grid: &mut HexGrid) -> usize {
        let dirty = grid.take_dirty_chunks();
        if dirty.is_empty() {
            return 0;
        }

        let start = Instant::now();
        self.meshes.resize_with(grid.chunks().len(), ChunkMeshes::new);
        let grid: &HexGrid = grid;
        let mut triangles = 0;
        for &chunk in &dirty {
            let meshes = &mut self.meshes[chunk];
            ChunkTriangulator::new(grid, meshes).triangulate_chunk(chunk);
            triangles += meshes.triangle_count();
        }

        tracing::debug!(
            chunks = dirty.len(),
            triangles,
            elapsed_us = start.elapsed().as_micros() as u64,
            "rebuilt dirty chunks"
        );
        dirty.len()
    }

    pub fn chunk_meshes(&self, chunk: usize) -> Option<&ChunkMeshes> {
        self.meshes.get(chunk)
    }

    pub fn meshes(&self) -> &[ChunkMeshes] {
        &self.meshes
    }

    /// Triangles across all chunks.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(ChunkMeshes::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hexmap_config::MapConfig;
    use hexmap_coords::{HexCoordinates, HexDirection};
    use hexmap_metrics::HexMetrics;

    use super::*;

    fn grid() -> HexGrid {
        let map = MapConfig {
            chunk_count_x: 3,
            chunk_count_z: 2,
            chunk_size_x: 3,
            chunk_size_z: 3,
        };
        HexGrid::new(&map, Arc::new(HexMetrics::default()))
    }

    #[test]
    fn test_first_tick_builds_every_chunk() {
        let mut g = grid();
        let mut scheduler = MeshScheduler::new(&g);
        assert_eq!(scheduler.tick(&mut g), 6);
        assert!(scheduler.meshes().iter().all(|m| !m.terrain.is_empty()));
        assert_eq!(g.dirty_chunk_count(), 0);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut g = grid();
        let mut scheduler = MeshScheduler::new(&g);
        scheduler.tick(&mut g);
        assert_eq!(scheduler.tick(&mut g), 0);
    }

    #[test]
    fn test_many_edits_one_rebuild() {
        let mut g = grid();
        let mut scheduler = MeshScheduler::new(&g);
        scheduler.tick(&mut g);

        // Interior cell of chunk 0: edits stay inside that chunk.
        let c = g.cell_at(HexCoordinates::from_offset(1, 1)).unwrap();
        g.set_elevation(c, 1);
        g.set_elevation(c, 2);
        g.set_terrain_type(c, 3);
        assert_eq!(scheduler.tick(&mut g), 1);
    }

    #[test]
    fn test_rebuild_after_undo_matches_original() {
        let mut g = grid();
        let mut scheduler = MeshScheduler::new(&g);
        scheduler.tick(&mut g);
        let before = scheduler.meshes().to_vec();

        let c = g.cell_at(HexCoordinates::from_offset(4, 2)).unwrap();
        g.set_elevation(c, 1);
        g.add_road(c, HexDirection::E);
        assert!(g.cell(c).has_roads());
        scheduler.tick(&mut g);
        assert_ne!(scheduler.meshes(), &before[..]);

        g.remove_roads(c);
        g.set_elevation(c, 0);
        scheduler.tick(&mut g);
        assert_eq!(scheduler.meshes(), &before[..]);
    }

    #[test]
    fn test_every_buffer_consistent_after_tick() {
        let mut g = grid();
        let mut scheduler = MeshScheduler::new(&g);
        let c = g.cell_at(HexCoordinates::from_offset(4, 2)).unwrap();
        g.set_elevation(c, 3);
        g.set_outgoing_river(c, HexDirection::SW);
        let lake = g.neighbor(c, HexDirection::SW).unwrap();
        g.set_water_level(lake, 2);
        scheduler.tick(&mut g);
        for meshes in scheduler.meshes() {
            for (name, mesh) in meshes.buffers() {
                assert!(mesh.is_consistent(), "{name} inconsistent");
            }
        }
    }
}

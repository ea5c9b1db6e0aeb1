//! An editing session: one grid, its editor and its chunk meshes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use hexmap_config::Config;
use hexmap_grid::{EditSettings, HexGrid, HexMapEditor};
use hexmap_mesh::MeshScheduler;
use serde::Serialize;

use crate::error::AppError;

/// Vertex and triangle totals of one buffer kind across all chunks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    pub name: &'static str,
    pub vertices: usize,
    pub triangles: usize,
}

/// Summary of the current map and its meshes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    pub cells: usize,
    pub chunks: usize,
    pub underwater_cells: usize,
    pub river_cells: usize,
    pub road_cells: usize,
    pub buffers: Vec<BufferStats>,
}

impl MeshStats {
    pub fn total_triangles(&self) -> usize {
        self.buffers.iter().map(|b| b.triangles).sum()
    }
}

pub struct HexMapSession {
    grid: HexGrid,
    editor: HexMapEditor,
    scheduler: MeshScheduler,
}

impl HexMapSession {
    /// Validate `config` and build a flat, dry map. Nothing is triangulated
    /// until the first [`tick`](Self::tick).
    pub fn new(config: &Config) -> Result<Self, AppError> {
        config.validate()?;
        let grid = HexGrid::from_config(config);
        let scheduler = MeshScheduler::new(&grid);
        tracing::info!(
            cells_x = grid.cell_count_x(),
            cells_z = grid.cell_count_z(),
            chunks = grid.chunks().len(),
            "session created"
        );
        Ok(Self {
            grid,
            editor: HexMapEditor::new(),
            scheduler,
        })
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Direct access for edits that bypass the brush.
    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn scheduler(&self) -> &MeshScheduler {
        &self.scheduler
    }

    /// Forward one frame of pointer input to the editor.
    pub fn edit_at(&mut self, point: Option<Vec3>, settings: &EditSettings) -> Option<usize> {
        self.editor.handle_input(&mut self.grid, point, settings)
    }

    /// End the current brush stroke.
    pub fn release(&mut self) {
        self.editor.release();
    }

    /// Rebuild dirty chunks; returns how many were rebuilt.
    pub fn tick(&mut self) -> usize {
        self.scheduler.tick(&mut self.grid)
    }

    pub fn save_map(&self, path: &Path) -> Result<(), AppError> {
        let file = File::create(path).map_err(AppError::io(path))?;
        let mut writer = BufWriter::new(file);
        self.grid.save(&mut writer).map_err(AppError::map(path))?;
        writer.flush().map_err(AppError::io(path))?;
        tracing::info!(path = %path.display(), "map saved");
        Ok(())
    }

    /// Replace the map with the contents of `path`.
    ///
    /// On any error the current map is left untouched.
    pub fn load_map(&mut self, path: &Path) -> Result<(), AppError> {
        let file = File::open(path).map_err(AppError::io(path))?;
        self.grid
            .load(&mut BufReader::new(file))
            .map_err(AppError::map(path))?;
        self.editor.release();
        tracing::info!(path = %path.display(), "map loaded");
        Ok(())
    }

    pub fn stats(&self) -> MeshStats {
        let cells = self.grid.cells();
        let mut buffers: Vec<BufferStats> = Vec::new();
        for meshes in self.scheduler.meshes() {
            for (i, (name, mesh)) in meshes.buffers().into_iter().enumerate() {
                if buffers.len() <= i {
                    buffers.push(BufferStats {
                        name,
                        vertices: 0,
                        triangles: 0,
                    });
                }
                buffers[i].vertices += mesh.vertex_count();
                buffers[i].triangles += mesh.triangle_count();
            }
        }

        MeshStats {
            cells: cells.len(),
            chunks: self.grid.chunks().len(),
            underwater_cells: cells.iter().filter(|c| c.is_underwater()).count(),
            river_cells: cells.iter().filter(|c| c.has_river()).count(),
            road_cells: cells.iter().filter(|c| c.has_roads()).count(),
            buffers,
        }
    }
}

#[cfg(test)]
mod tests {
    use hexmap_config::MapConfig;
    use hexmap_coords::{HexCoordinates, HexDirection};
    use hexmap_grid::OptionalToggle;

    use super::*;

    fn small_config() -> Config {
        Config {
            map: MapConfig {
                chunk_count_x: 2,
                chunk_count_z: 2,
                chunk_size_x: 3,
                chunk_size_z: 3,
            },
            ..Default::default()
        }
    }

    fn center(session: &HexMapSession, col: i32, row: i32) -> Option<Vec3> {
        let cell = session.grid().cell_at(HexCoordinates::from_offset(col, row))?;
        Some(session.grid().cell(cell).position())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.map.chunk_size_x = 0;
        assert!(matches!(
            HexMapSession::new(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_first_tick_builds_everything() {
        let mut session = HexMapSession::new(&small_config()).unwrap();
        assert_eq!(session.stats().total_triangles(), 0);
        assert_eq!(session.tick(), 4);
        let stats = session.stats();
        assert_eq!(stats.cells, 36);
        assert_eq!(stats.buffers.len(), 6);
        assert_eq!(stats.buffers[0].name, "terrain");
        assert!(stats.buffers[0].triangles > 0);
        assert!(stats.buffers[1..].iter().all(|b| b.triangles == 0));
    }

    #[test]
    fn test_drag_draws_river() {
        let mut session = HexMapSession::new(&small_config()).unwrap();
        let settings = EditSettings {
            river_mode: OptionalToggle::Yes,
            ..Default::default()
        };
        session.edit_at(center(&session, 1, 2), &settings);
        session.edit_at(center(&session, 2, 2), &settings);
        session.release();
        session.tick();

        let stats = session.stats();
        assert_eq!(stats.river_cells, 2);
        assert!(stats.buffers[1].triangles > 0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.map");

        let mut session = HexMapSession::new(&small_config()).unwrap();
        let c = session.grid().cell_at(HexCoordinates::from_offset(2, 2)).unwrap();
        session.grid_mut().set_elevation(c, 1);
        session.grid_mut().add_road(c, HexDirection::E);
        session.tick();
        session.save_map(&path).unwrap();
        let saved = session.stats();

        let mut other = HexMapSession::new(&small_config()).unwrap();
        other.load_map(&path).unwrap();
        other.tick();
        assert_eq!(other.stats(), saved);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = HexMapSession::new(&small_config()).unwrap();
        let err = session.load_map(&tmp.path().join("absent.map")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn test_load_truncated_file_is_map_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("short.map");
        std::fs::write(&path, [0u8, 0, 0, 0, 1, 2]).unwrap();
        let mut session = HexMapSession::new(&small_config()).unwrap();
        let err = session.load_map(&path).unwrap_err();
        assert!(matches!(err, AppError::Map { .. }));
        assert!(err.to_string().contains("short.map"));
    }

    #[test]
    fn test_stats_serialize() {
        let mut session = HexMapSession::new(&small_config()).unwrap();
        session.tick();
        let json = serde_json::to_value(session.stats()).unwrap();
        assert_eq!(json["chunks"], 4);
        assert_eq!(json["buffers"][3]["name"], "water");
    }
}

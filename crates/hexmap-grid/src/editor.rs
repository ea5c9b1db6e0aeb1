//! Brush-based cell editing driven by pointer positions.
//!
//! The host resolves a pointer ray to a world point and forwards it to
//! [`HexMapEditor::handle_input`] once per frame while the button is held,
//! and `None` once it is released or misses the terrain. Moving from one cell
//! into an adjacent one counts as a drag, which is how rivers and roads are
//! drawn.

use glam::Vec3;
use hexmap_coords::{HexCoordinates, HexDirection};

use crate::grid::HexGrid;

/// Three-state toggle for brush features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptionalToggle {
    /// Leave the feature alone.
    #[default]
    Ignore,
    /// Add the feature along drags.
    Yes,
    /// Remove the feature from every brushed cell.
    No,
}

/// What the brush applies to each cell it touches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSettings {
    pub terrain_type: Option<u8>,
    pub elevation: Option<i32>,
    pub water_level: Option<i32>,
    pub river_mode: OptionalToggle,
    pub road_mode: OptionalToggle,
    /// Brush radius in cells; 0 edits a single cell.
    pub brush_size: u32,
}

/// Tracks pointer state between frames.
#[derive(Clone, Debug, Default)]
pub struct HexMapEditor {
    previous_cell: Option<usize>,
    drag_direction: Option<HexDirection>,
}

impl HexMapEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `settings` around the cell under `point`.
    ///
    /// Returns the cell under the point, or `None` (which also ends any drag)
    /// when there is no point or it lies off the grid.
    pub fn handle_input(
        &mut self,
        grid: &mut HexGrid,
        point: Option<Vec3>,
        settings: &EditSettings,
    ) -> Option<usize> {
        let Some(current) = point.and_then(|p| grid.cell_at_position(p)) else {
            self.release();
            return None;
        };

        self.drag_direction = match self.previous_cell {
            Some(previous) if previous != current => Self::find_drag(grid, previous, current),
            _ => None,
        };

        for cell in brush_cells(grid, current, settings.brush_size) {
            self.edit_cell(grid, cell, settings);
        }
        self.previous_cell = Some(current);
        Some(current)
    }

    /// End the current stroke.
    pub fn release(&mut self) {
        self.previous_cell = None;
        self.drag_direction = None;
    }

    /// Direction of the last drag step, if the pointer moved to a neighbor.
    pub fn drag_direction(&self) -> Option<HexDirection> {
        self.drag_direction
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_direction.is_some()
    }

    fn find_drag(grid: &HexGrid, previous: usize, current: usize) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|&d| grid.neighbor(previous, d) == Some(current))
    }

    fn edit_cell(&self, grid: &mut HexGrid, cell: usize, settings: &EditSettings) {
        if let Some(terrain_type) = settings.terrain_type {
            grid.set_terrain_type(cell, terrain_type);
        }
        if let Some(elevation) = settings.elevation {
            grid.set_elevation(cell, elevation);
        }
        if let Some(water_level) = settings.water_level {
            grid.set_water_level(cell, water_level);
        }
        if settings.river_mode == OptionalToggle::No {
            grid.remove_river(cell);
        }
        if settings.road_mode == OptionalToggle::No {
            grid.remove_roads(cell);
        }

        if let Some(drag) = self.drag_direction
            && let Some(other) = grid.neighbor(cell, drag.opposite())
        {
            if settings.river_mode == OptionalToggle::Yes {
                grid.set_outgoing_river(other, drag);
            }
            if settings.road_mode == OptionalToggle::Yes {
                grid.add_road(other, drag);
            }
        }
    }
}

/// Cells within `size` steps of `center`, clipped to the grid.
///
/// Scans the bottom half (including the center row) upward, then the top
/// half downward.
pub fn brush_cells(grid: &HexGrid, center: usize, size: u32) -> Vec<usize> {
    let size = size as i32;
    let c = grid.cell(center).coordinates();
    let (center_x, center_z) = (c.x(), c.z());
    let mut cells = Vec::new();

    for (r, z) in (center_z - size..=center_z).enumerate() {
        for x in center_x - r as i32..=center_x + size {
            cells.extend(grid.cell_at(HexCoordinates::new(x, z)));
        }
    }
    for (r, z) in (center_z + 1..=center_z + size).rev().enumerate() {
        for x in center_x - size..=center_x + r as i32 {
            cells.extend(grid.cell_at(HexCoordinates::new(x, z)));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hexmap_config::MapConfig;
    use hexmap_metrics::HexMetrics;

    use super::*;

    fn grid() -> HexGrid {
        let map = MapConfig {
            chunk_count_x: 2,
            chunk_count_z: 2,
            chunk_size_x: 4,
            chunk_size_z: 4,
        };
        HexGrid::new(&map, Arc::new(HexMetrics::default()))
    }

    fn at(g: &HexGrid, col: i32, row: i32) -> usize {
        g.cell_at(HexCoordinates::from_offset(col, row)).unwrap()
    }

    /// One frame with the pointer over the center of `cell`.
    fn press(
        editor: &mut HexMapEditor,
        g: &mut HexGrid,
        cell: usize,
        settings: &EditSettings,
    ) -> Option<usize> {
        let point = g.cell(cell).position();
        editor.handle_input(g, Some(point), settings)
    }

    #[test]
    fn test_brush_zero_is_single_cell() {
        let g = grid();
        let c = at(&g, 3, 3);
        assert_eq!(brush_cells(&g, c, 0), vec![c]);
    }

    #[test]
    fn test_brush_covers_hex_radius() {
        let g = grid();
        let c = at(&g, 4, 4);
        let center = g.cell(c).coordinates();
        for size in 1..=2u32 {
            let cells = brush_cells(&g, c, size);
            // Full hexagon of radius n holds 3n(n+1)+1 cells.
            assert_eq!(cells.len() as u32, 3 * size * (size + 1) + 1);
            for &cell in &cells {
                assert!(g.cell(cell).coordinates().distance_to(center) <= size);
            }
            let mut unique = cells.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), cells.len());
        }
    }

    #[test]
    fn test_brush_clipped_at_border() {
        let g = grid();
        let cells = brush_cells(&g, 0, 1);
        assert_eq!(cells.len(), 3);
    }

    #[test]
    fn test_apply_elevation_and_terrain() {
        let mut g = grid();
        let mut editor = HexMapEditor::new();
        let c = at(&g, 3, 3);
        let settings = EditSettings {
            elevation: Some(2),
            terrain_type: Some(1),
            ..Default::default()
        };
        assert_eq!(press(&mut editor, &mut g, c, &settings), Some(c));
        assert_eq!(g.cell(c).elevation(), 2);
        assert_eq!(g.cell(c).terrain_type(), 1);
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_miss_releases_drag() {
        let mut g = grid();
        let mut editor = HexMapEditor::new();
        let settings = EditSettings::default();
        let a = at(&g, 3, 3);
        press(&mut editor, &mut g, a, &settings);
        assert_eq!(editor.handle_input(&mut g, None, &settings), None);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        press(&mut editor, &mut g, b, &settings);
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_drag_draws_river_and_road() {
        let mut g = grid();
        let mut editor = HexMapEditor::new();
        let a = at(&g, 3, 3);
        let b = g.neighbor(a, HexDirection::E).unwrap();
        let c = g.neighbor(b, HexDirection::NE).unwrap();

        let rivers = EditSettings {
            river_mode: OptionalToggle::Yes,
            ..Default::default()
        };
        press(&mut editor, &mut g, a, &rivers);
        press(&mut editor, &mut g, b, &rivers);
        assert_eq!(editor.drag_direction(), Some(HexDirection::E));
        assert_eq!(g.cell(a).outgoing_river(), Some(HexDirection::E));
        editor.release();

        let roads = EditSettings {
            road_mode: OptionalToggle::Yes,
            ..Default::default()
        };
        press(&mut editor, &mut g, b, &roads);
        press(&mut editor, &mut g, c, &roads);
        assert!(g.cell(b).has_road_through_edge(HexDirection::NE));
        assert!(g.cell(c).has_road_through_edge(HexDirection::SW));
    }

    #[test]
    fn test_jump_is_not_a_drag() {
        let mut g = grid();
        let mut editor = HexMapEditor::new();
        let settings = EditSettings {
            road_mode: OptionalToggle::Yes,
            ..Default::default()
        };
        let (a, b) = (at(&g, 1, 1), at(&g, 5, 5));
        press(&mut editor, &mut g, a, &settings);
        press(&mut editor, &mut g, b, &settings);
        assert!(!editor.is_dragging());
        assert!(g.cells().iter().all(|c| !c.has_roads()));
    }

    #[test]
    fn test_no_mode_removes_features() {
        let mut g = grid();
        let a = at(&g, 3, 3);
        g.set_outgoing_river(a, HexDirection::E);
        g.add_road(a, HexDirection::W);

        let mut editor = HexMapEditor::new();
        let settings = EditSettings {
            river_mode: OptionalToggle::No,
            road_mode: OptionalToggle::No,
            ..Default::default()
        };
        press(&mut editor, &mut g, a, &settings);
        assert!(!g.cell(a).has_river());
        assert!(!g.cell(a).has_roads());
        let e = g.neighbor(a, HexDirection::E).unwrap();
        assert!(!g.cell(e).has_river());
    }
}

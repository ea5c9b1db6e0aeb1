//! Standing water: open water, shorelines and estuaries.
//!
//! Water surfaces are flat at the cell's water height. Open water uses the
//! larger water hexagon so neighboring submerged cells close the gaps with
//! bridges; cells next to dry land switch to the solid hexagon on the land
//! side and add a shore strip with V = 1 on the land edge.

use glam::{Vec2, Vec3};
use hexmap_coords::HexDirection;
use hexmap_grid::HexCell;

use crate::edge_vertices::EdgeVertices;
use crate::triangulator::ChunkTriangulator;

impl ChunkTriangulator<'_> {
    pub(crate) fn triangulate_water(&mut self, direction: HexDirection, cell: &HexCell, center: Vec3) {
        let mut center = center;
        center.y = cell.water_surface_y(self.metrics);

        match cell.neighbor(direction).map(|n| self.cell(n)) {
            Some(neighbor) if !neighbor.is_underwater() => {
                self.triangulate_water_shore(direction, cell, neighbor, center);
            }
            neighbor => self.triangulate_open_water(direction, cell, neighbor, center),
        }
    }

    fn triangulate_open_water(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: Option<&HexCell>,
        center: Vec3,
    ) {
        let m = self.metrics;
        let c1 = center + m.first_water_corner(direction);
        let c2 = center + m.second_water_corner(direction);
        let water = &mut self.meshes.water;
        water.add_triangle(m, center, c1, c2);

        if direction <= HexDirection::SE && neighbor.is_some() {
            let bridge = m.water_bridge(direction);
            let e1 = c1 + bridge;
            let e2 = c2 + bridge;
            water.add_quad(m, c1, c2, e1, e2);

            if direction <= HexDirection::E
                && let Some(next) = cell.neighbor(direction.next()).map(|n| self.cell(n))
                && next.is_underwater()
            {
                let water = &mut self.meshes.water;
                water.add_triangle(m, c2, e2, c2 + m.water_bridge(direction.next()));
            }
        }
    }

    fn triangulate_water_shore(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        center: Vec3,
    ) {
        let m = self.metrics;
        let e1 = EdgeVertices::new(
            center + m.first_water_corner(direction),
            center + m.second_water_corner(direction),
        );
        let water = &mut self.meshes.water;
        for (a, b) in [(e1.v1, e1.v2), (e1.v2, e1.v3), (e1.v3, e1.v4), (e1.v4, e1.v5)] {
            water.add_triangle(m, center, a, b);
        }

        let mut center2 = neighbor.position();
        center2.y = center.y;
        let e2 = EdgeVertices::new(
            center2 + m.second_solid_corner(direction.opposite()),
            center2 + m.first_solid_corner(direction.opposite()),
        );

        if cell.has_river_through_edge(direction) {
            self.triangulate_estuary(&e1, &e2, cell.incoming_river() == Some(direction));
        } else {
            let shore = &mut self.meshes.water_shore;
            for (a1, b1, a2, b2) in [
                (e1.v1, e1.v2, e2.v1, e2.v2),
                (e1.v2, e1.v3, e2.v2, e2.v3),
                (e1.v3, e1.v4, e2.v3, e2.v4),
                (e1.v4, e1.v5, e2.v4, e2.v5),
            ] {
                shore.add_quad(m, a1, b1, a2, b2);
                shore.add_quad_uv_rect(0.0, 0.0, 0.0, 1.0);
            }
        }

        if let Some(next) = cell.neighbor(direction.next()).map(|n| self.cell(n)) {
            // Land corners use the solid hexagon, water corners the water one.
            let corner = if next.is_underwater() {
                m.first_water_corner(direction.previous())
            } else {
                m.first_solid_corner(direction.previous())
            };
            let mut v3 = next.position() + corner;
            v3.y = center.y;

            let shore = &mut self.meshes.water_shore;
            shore.add_triangle(m, e1.v5, e2.v5, v3);
            shore.add_triangle_uv(
                Vec2::ZERO,
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, if next.is_underwater() { 0.0 } else { 1.0 }),
            );
        }
    }

    /// River mouth where a river meets open water across a shore edge.
    ///
    /// The outer triangles stay in the shore buffer; the middle goes to
    /// `estuaries` with UV blending shore foam and UV2 carrying river flow,
    /// mirrored when the river flows into this cell.
    fn triangulate_estuary(&mut self, e1: &EdgeVertices, e2: &EdgeVertices, incoming_river: bool) {
        let m = self.metrics;
        let shore = &mut self.meshes.water_shore;
        shore.add_triangle(m, e2.v1, e1.v2, e1.v1);
        shore.add_triangle(m, e2.v5, e1.v5, e1.v4);
        for _ in 0..2 {
            shore.add_triangle_uv(Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::ZERO);
        }

        let estuaries = &mut self.meshes.estuaries;
        estuaries.add_quad(m, e2.v1, e1.v2, e2.v2, e1.v3);
        estuaries.add_triangle(m, e1.v3, e2.v2, e2.v4);
        estuaries.add_quad(m, e1.v3, e1.v4, e2.v4, e2.v5);

        estuaries.add_quad_uv(Vec2::new(0.0, 1.0), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        estuaries.add_triangle_uv(Vec2::ZERO, Vec2::ONE, Vec2::ONE);
        estuaries.add_quad_uv(Vec2::ZERO, Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.0));

        if incoming_river {
            estuaries.add_quad_uv2(
                Vec2::new(1.5, 1.0),
                Vec2::new(0.7, 1.15),
                Vec2::new(1.0, 0.8),
                Vec2::new(0.5, 1.1),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, 1.1), Vec2::new(1.0, 0.8), Vec2::new(0.0, 0.8));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, 1.1),
                Vec2::new(0.3, 1.15),
                Vec2::new(0.0, 0.8),
                Vec2::new(-0.5, 1.0),
            );
        } else {
            estuaries.add_quad_uv2(
                Vec2::new(-0.5, -0.2),
                Vec2::new(0.3, -0.35),
                Vec2::ZERO,
                Vec2::new(0.5, -0.3),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, -0.3), Vec2::ZERO, Vec2::new(1.0, 0.0));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, -0.3),
                Vec2::new(0.7, -0.35),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.5, -0.2),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hexmap_config::{MapConfig, TerrainConfig};
    use hexmap_coords::HexCoordinates;
    use hexmap_grid::HexGrid;
    use hexmap_metrics::HexMetrics;

    use super::*;
    use crate::hex_mesh::ChunkMeshes;

    fn grid() -> HexGrid {
        let map = MapConfig {
            chunk_count_x: 1,
            chunk_count_z: 1,
            chunk_size_x: 5,
            chunk_size_z: 5,
        };
        let terrain = TerrainConfig {
            cell_perturb_strength: 0.0,
            elevation_perturb_strength: 0.0,
            ..Default::default()
        };
        HexGrid::new(&map, Arc::new(HexMetrics::new(&terrain)))
    }

    fn at(g: &HexGrid, col: i32, row: i32) -> usize {
        g.cell_at(HexCoordinates::from_offset(col, row)).unwrap()
    }

    fn triangulate(g: &HexGrid, cell: usize) -> ChunkMeshes {
        let mut meshes = ChunkMeshes::new();
        ChunkTriangulator::new(g, &mut meshes).triangulate_cell(cell);
        meshes
    }

    fn flood(g: &mut HexGrid, level: i32) {
        for i in 0..g.cells().len() {
            g.set_water_level(i, level);
        }
    }

    #[test]
    fn test_dry_cell_has_no_water() {
        let g = grid();
        let meshes = triangulate(&g, at(&g, 2, 2));
        assert!(meshes.water.is_empty());
        assert!(meshes.water_shore.is_empty());
    }

    #[test]
    fn test_open_water_interior() {
        let mut g = grid();
        flood(&mut g, 1);
        let meshes = triangulate(&g, at(&g, 2, 2));
        // 6 wedge triangles, 3 bridge quads, 2 corner triangles.
        assert_eq!(meshes.water.triangle_count(), 6 + 6 + 2);
        assert!(meshes.water_shore.is_empty());

        let y = (1.0 + g.metrics().water_elevation_offset) * g.metrics().elevation_step;
        assert!(meshes.water.positions.iter().all(|p| p.y == y));
    }

    #[test]
    fn test_lake_edge_at_border_has_no_bridges() {
        let mut g = grid();
        flood(&mut g, 1);
        // Bottom-right corner cell: no E, SE or SW neighbors.
        let meshes = triangulate(&g, at(&g, 4, 0));
        assert!(meshes.water.triangle_count() < 6 + 6 + 2);
        assert!(meshes.water_shore.is_empty());
    }

    #[test]
    fn test_single_pond_cell_has_shore_all_round() {
        let mut g = grid();
        let c = at(&g, 2, 2);
        g.set_water_level(c, 1);
        let meshes = triangulate(&g, c);
        assert_eq!(meshes.water.triangle_count(), 6 * 4);
        // 6 shore strips of 4 quads and 6 corner triangles.
        assert_eq!(meshes.water_shore.triangle_count(), 6 * 8 + 6);
        assert!(meshes.water_shore.is_consistent());
        assert!(meshes.water_shore.uvs.iter().all(|uv| uv.x == 0.0));
    }

    #[test]
    fn test_estuary_where_river_leaves_lake_edge() {
        let mut g = grid();
        let c = at(&g, 2, 2);
        let w = g.neighbor(c, HexDirection::W).unwrap();
        g.set_elevation(w, 1);
        g.set_outgoing_river(w, HexDirection::E);
        g.set_water_level(c, 1);

        let meshes = triangulate(&g, c);
        // Two quads and a triangle in the mouth.
        assert_eq!(meshes.estuaries.triangle_count(), 5);
        assert_eq!(meshes.estuaries.uvs.len(), meshes.estuaries.vertex_count());
        assert_eq!(meshes.estuaries.uv2s.len(), meshes.estuaries.vertex_count());
        // Flow into the lake uses the incoming UV2 layout.
        assert_eq!(meshes.estuaries.uv2s[0], Vec2::new(1.5, 1.0));
    }
}

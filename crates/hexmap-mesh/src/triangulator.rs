//! Per-chunk triangulation: cell wedges, edge connections and terraces.
//!
//! Every cell is split into six wedges. A wedge covers the solid region from
//! the center to the solid edge; the blend region between two cells is the
//! connection, owned by the cell on the NE, E and SE sides; the triangle
//! between three cells is the corner, owned by the cell on the NE and E
//! sides. Rivers, roads and water add their own geometry on top.

use glam::{Vec3, Vec4};
use hexmap_coords::HexDirection;
use hexmap_grid::{HexCell, HexGrid};
use hexmap_metrics::{EdgeType, HexMetrics};

use crate::edge_vertices::EdgeVertices;
use crate::hex_mesh::ChunkMeshes;

/// Writes the geometry of one chunk into its buffers.
pub struct ChunkTriangulator<'a> {
    pub(crate) grid: &'a HexGrid,
    pub(crate) metrics: &'a HexMetrics,
    pub(crate) meshes: &'a mut ChunkMeshes,
}

impl<'a> ChunkTriangulator<'a> {
    pub fn new(grid: &'a HexGrid, meshes: &'a mut ChunkMeshes) -> Self {
        Self {
            grid,
            metrics: grid.metrics(),
            meshes,
        }
    }

    /// Clear the buffers and triangulate every cell of `chunk`.
    pub fn triangulate_chunk(&mut self, chunk: usize) {
        self.meshes.clear();
        for &cell in self.grid.chunk(chunk).cells() {
            self.triangulate_cell(cell);
        }
    }

    /// Append the geometry of one cell without clearing.
    pub fn triangulate_cell(&mut self, cell: usize) {
        for direction in HexDirection::ALL {
            self.triangulate_wedge(direction, cell);
        }
    }

    pub(crate) fn cell(&self, index: usize) -> &'a HexCell {
        self.grid.cell(index)
    }

    pub(crate) fn color(&self, cell: &HexCell) -> Vec4 {
        cell.color(self.metrics)
    }

    fn triangulate_wedge(&mut self, direction: HexDirection, index: usize) {
        let cell = self.cell(index);
        let center = cell.position();
        let mut e = EdgeVertices::new(
            center + self.metrics.first_solid_corner(direction),
            center + self.metrics.second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y(self.metrics);
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(cell, center, &e);
                } else {
                    self.triangulate_with_river(direction, cell, center, &e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, &e);
            }
        } else {
            self.triangulate_without_river(direction, cell, center, &e);
        }

        if direction <= HexDirection::SE {
            self.triangulate_connection(direction, cell, &e);
        }

        if cell.is_underwater() {
            self.triangulate_water(direction, cell, center);
        }
    }

    fn triangulate_without_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let color = self.color(cell);
        self.triangulate_edge_fan(center, e, color);

        if cell.has_roads() {
            let (left, right) = road_interpolators(direction, cell);
            self.triangulate_road(
                center,
                center.lerp(e.v1, left),
                center.lerp(e.v5, right),
                e,
                cell.has_road_through_edge(direction),
            );
        }
    }

    // --- Connections ---

    fn triangulate_connection(&mut self, direction: HexDirection, cell: &HexCell, e1: &EdgeVertices) {
        let Some(neighbor) = cell.neighbor(direction).map(|n| self.cell(n)) else {
            return;
        };
        let m = self.metrics;

        let mut bridge = m.bridge(direction);
        bridge.y = neighbor.position().y - cell.position().y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        if cell.has_river_through_edge(direction) {
            e2.v3.y = neighbor.stream_bed_y(m);
            self.triangulate_river_connection(direction, cell, neighbor, e1, &e2);
        }

        let has_road = cell.has_road_through_edge(direction);
        if m.edge_type(cell.elevation(), neighbor.elevation()) == EdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, &e2, neighbor, has_road);
        } else {
            let (c1, c2) = (self.color(cell), self.color(neighbor));
            self.triangulate_edge_strip(e1, c1, &e2, c2, has_road);
        }

        if direction <= HexDirection::E
            && let Some(next) = cell.neighbor(direction.next()).map(|n| self.cell(n))
        {
            let mut v5 = e1.v5 + m.bridge(direction.next());
            v5.y = next.position().y;

            // Rotate the trio so the lowest cell comes first.
            if cell.elevation() <= neighbor.elevation() {
                if cell.elevation() <= next.elevation() {
                    self.triangulate_corner(e1.v5, cell, e2.v5, neighbor, v5, next);
                } else {
                    self.triangulate_corner(v5, next, e1.v5, cell, e2.v5, neighbor);
                }
            } else if neighbor.elevation() <= next.elevation() {
                self.triangulate_corner(e2.v5, neighbor, v5, next, e1.v5, cell);
            } else {
                self.triangulate_corner(v5, next, e1.v5, cell, e2.v5, neighbor);
            }
        }
    }

    // --- Shared primitives ---

    /// Four triangles from `center` to the edge.
    pub(crate) fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, color: Vec4) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        for (a, b) in [
            (edge.v1, edge.v2),
            (edge.v2, edge.v3),
            (edge.v3, edge.v4),
            (edge.v4, edge.v5),
        ] {
            terrain.add_triangle(m, center, a, b);
            terrain.add_triangle_color(color);
        }
    }

    /// Four quads between two parallel edges, optionally carrying a road.
    pub(crate) fn triangulate_edge_strip(
        &mut self,
        e1: &EdgeVertices,
        c1: Vec4,
        e2: &EdgeVertices,
        c2: Vec4,
        has_road: bool,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        for (a1, b1, a2, b2) in [
            (e1.v1, e1.v2, e2.v1, e2.v2),
            (e1.v2, e1.v3, e2.v2, e2.v3),
            (e1.v3, e1.v4, e2.v3, e2.v4),
            (e1.v4, e1.v5, e2.v4, e2.v5),
        ] {
            terrain.add_quad(m, a1, b1, a2, b2);
            terrain.add_quad_colors(c1, c2);
        }

        if has_road {
            self.triangulate_road_segment(e1.v2, e1.v3, e1.v4, e2.v2, e2.v3, e2.v4);
        }
    }

    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: &HexCell,
        end: &EdgeVertices,
        end_cell: &HexCell,
        has_road: bool,
    ) {
        let m = self.metrics;
        let begin_color = self.color(begin_cell);
        let end_color = self.color(end_cell);

        let mut e2 = EdgeVertices::terrace_lerp(m, begin, end, 1);
        let mut c2 = m.terrace_lerp_color(begin_color, end_color, 1);
        self.triangulate_edge_strip(begin, begin_color, &e2, c2, has_road);

        for step in 2..m.terrace_steps {
            let e1 = e2;
            let c1 = c2;
            e2 = EdgeVertices::terrace_lerp(m, begin, end, step);
            c2 = m.terrace_lerp_color(begin_color, end_color, step);
            self.triangulate_edge_strip(&e1, c1, &e2, c2, has_road);
        }

        self.triangulate_edge_strip(&e2, c2, end, end_color, has_road);
    }
}

/// How far along the center-to-corner lines a road's side edges reach.
///
/// Full width toward edges that carry a road, a narrower stub otherwise.
pub(crate) fn road_interpolators(direction: HexDirection, cell: &HexCell) -> (f32, f32) {
    if cell.has_road_through_edge(direction) {
        (0.5, 0.5)
    } else {
        let side = |d| if cell.has_road_through_edge(d) { 0.5 } else { 0.25 };
        (side(direction.previous()), side(direction.next()))
    }
}

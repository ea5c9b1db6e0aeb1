//! The triangle where three cells meet.
//!
//! Callers order the trio so `bottom` is the lowest cell; `left` and `right`
//! follow clockwise. The two edges touching the bottom cell decide the shape.

use glam::{Vec3, Vec4};
use hexmap_grid::HexCell;
use hexmap_metrics::EdgeType;

use crate::triangulator::ChunkTriangulator;

impl ChunkTriangulator<'_> {
    pub(crate) fn triangulate_corner(
        &mut self,
        bottom: Vec3,
        bottom_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let left_edge = m.edge_type(bottom_cell.elevation(), left_cell.elevation());
        let right_edge = m.edge_type(bottom_cell.elevation(), right_cell.elevation());
        let top_edge = m.edge_type(left_cell.elevation(), right_cell.elevation());

        match (left_edge, right_edge) {
            (EdgeType::Slope, EdgeType::Slope) => {
                self.triangulate_corner_terraces(bottom, bottom_cell, left, left_cell, right, right_cell);
            }
            (EdgeType::Slope, EdgeType::Flat) => {
                self.triangulate_corner_terraces(left, left_cell, right, right_cell, bottom, bottom_cell);
            }
            (EdgeType::Slope, EdgeType::Cliff) => {
                self.triangulate_corner_terraces_cliff(
                    bottom, bottom_cell, left, left_cell, right, right_cell,
                );
            }
            (EdgeType::Flat, EdgeType::Slope) => {
                self.triangulate_corner_terraces(right, right_cell, bottom, bottom_cell, left, left_cell);
            }
            (EdgeType::Cliff, EdgeType::Slope) => {
                self.triangulate_corner_cliff_terraces(
                    bottom, bottom_cell, left, left_cell, right, right_cell,
                );
            }
            // Both sides are cliffs or flat; terraces can only run along the top.
            _ if top_edge == EdgeType::Slope => {
                if left_cell.elevation() < right_cell.elevation() {
                    self.triangulate_corner_cliff_terraces(
                        right, right_cell, bottom, bottom_cell, left, left_cell,
                    );
                } else {
                    self.triangulate_corner_terraces_cliff(
                        left, left_cell, right, right_cell, bottom, bottom_cell,
                    );
                }
            }
            _ => {
                let colors = (self.color(bottom_cell), self.color(left_cell), self.color(right_cell));
                let terrain = &mut self.meshes.terrain;
                terrain.add_triangle(m, bottom, left, right);
                terrain.add_triangle_colors(colors.0, colors.1, colors.2);
            }
        }
    }

    /// Terraces fanning out from `begin` toward both `left` and `right`.
    fn triangulate_corner_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let begin_color = self.color(begin_cell);
        let left_color = self.color(left_cell);
        let right_color = self.color(right_cell);
        let terrain = &mut self.meshes.terrain;

        let mut v3 = m.terrace_lerp(begin, left, 1);
        let mut v4 = m.terrace_lerp(begin, right, 1);
        let mut c3 = m.terrace_lerp_color(begin_color, left_color, 1);
        let mut c4 = m.terrace_lerp_color(begin_color, right_color, 1);

        terrain.add_triangle(m, begin, v3, v4);
        terrain.add_triangle_colors(begin_color, c3, c4);

        for step in 2..m.terrace_steps {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = m.terrace_lerp(begin, left, step);
            v4 = m.terrace_lerp(begin, right, step);
            c3 = m.terrace_lerp_color(begin_color, left_color, step);
            c4 = m.terrace_lerp_color(begin_color, right_color, step);
            terrain.add_quad(m, v1, v2, v3, v4);
            terrain.add_quad_colors4(c1, c2, c3, c4);
        }

        terrain.add_quad(m, v3, v4, left, right);
        terrain.add_quad_colors4(c3, c4, left_color, right_color);
    }

    /// Terraces on the left collapsing into a boundary point on the right cliff.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        // The boundary sits one elevation level above `begin`.
        let b = (1.0 / (right_cell.elevation() - begin_cell.elevation()) as f32).abs();
        let boundary = m.perturb(begin).lerp(m.perturb(right), b);
        let boundary_color = self.color(begin_cell).lerp(self.color(right_cell), b);

        self.triangulate_boundary_triangle(begin, begin_cell, left, left_cell, boundary, boundary_color);
        self.close_corner_top(left, left_cell, right, right_cell, boundary, boundary_color);
    }

    /// Mirror of [`Self::triangulate_corner_terraces_cliff`]: cliff on the left.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let b = (1.0 / (left_cell.elevation() - begin_cell.elevation()) as f32).abs();
        let boundary = m.perturb(begin).lerp(m.perturb(left), b);
        let boundary_color = self.color(begin_cell).lerp(self.color(left_cell), b);

        self.triangulate_boundary_triangle(right, right_cell, begin, begin_cell, boundary, boundary_color);
        self.close_corner_top(left, left_cell, right, right_cell, boundary, boundary_color);
    }

    /// Upper part of a terrace/cliff corner: more terraces if the top edge
    /// slopes, otherwise a single triangle.
    fn close_corner_top(
        &mut self,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
        boundary: Vec3,
        boundary_color: Vec4,
    ) {
        let m = self.metrics;
        if m.edge_type(left_cell.elevation(), right_cell.elevation()) == EdgeType::Slope {
            self.triangulate_boundary_triangle(left, left_cell, right, right_cell, boundary, boundary_color);
        } else {
            let (lc, rc) = (self.color(left_cell), self.color(right_cell));
            let terrain = &mut self.meshes.terrain;
            terrain.add_triangle_unperturbed(m.perturb(left), m.perturb(right), boundary);
            terrain.add_triangle_colors(lc, rc, boundary_color);
        }
    }

    /// Terrace steps from `begin` to `left`, each fanned to the boundary point.
    ///
    /// The boundary is already perturbed and must not move again, or cracks
    /// open along the cliff.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        boundary: Vec3,
        boundary_color: Vec4,
    ) {
        let m = self.metrics;
        let begin_color = self.color(begin_cell);
        let left_color = self.color(left_cell);
        let terrain = &mut self.meshes.terrain;

        let mut v2 = m.perturb(m.terrace_lerp(begin, left, 1));
        let mut c2 = m.terrace_lerp_color(begin_color, left_color, 1);

        terrain.add_triangle_unperturbed(m.perturb(begin), v2, boundary);
        terrain.add_triangle_colors(begin_color, c2, boundary_color);

        for step in 2..m.terrace_steps {
            let (v1, c1) = (v2, c2);
            v2 = m.perturb(m.terrace_lerp(begin, left, step));
            c2 = m.terrace_lerp_color(begin_color, left_color, step);
            terrain.add_triangle_unperturbed(v1, v2, boundary);
            terrain.add_triangle_colors(c1, c2, boundary_color);
        }

        terrain.add_triangle_unperturbed(v2, m.perturb(left), boundary);
        terrain.add_triangle_colors(c2, left_color, boundary_color);
    }
}

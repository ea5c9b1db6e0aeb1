//! River channels, river surfaces and waterfalls.
//!
//! The terrain around a river is carved by lowering the middle edge vertex to
//! the stream bed; the surface quads go into the `rivers` buffer with V
//! running downstream in steps of 0.2 per segment.

use glam::{Vec2, Vec3};
use hexmap_coords::HexDirection;
use hexmap_grid::HexCell;
use hexmap_metrics::HexMetrics;

use crate::edge_vertices::EdgeVertices;
use crate::hex_mesh::HexMesh;
use crate::triangulator::ChunkTriangulator;

impl ChunkTriangulator<'_> {
    /// Wedge of a cell where a river starts or ends.
    pub(crate) fn triangulate_with_river_begin_or_end(
        &mut self,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let mut mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        mid.v3.y = e.v3.y;

        let color = self.color(cell);
        self.triangulate_edge_strip(&mid, color, e, color, false);
        self.triangulate_edge_fan(center, &mid, color);

        if cell.is_underwater() {
            return;
        }

        let reversed = cell.has_incoming_river();
        let y = cell.river_surface_y(m);
        add_river_quad(&mut self.meshes.rivers, m, mid.v2, mid.v4, e.v2, e.v4, y, y, 0.6, reversed);

        let (mut c, mut v2, mut v4) = (center, mid.v2, mid.v4);
        c.y = y;
        v2.y = y;
        v4.y = y;
        let rivers = &mut self.meshes.rivers;
        rivers.add_triangle(m, c, v2, v4);
        if reversed {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2));
        } else {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6));
        }
    }

    /// Wedge whose edge the river flows through, for a cell the river passes.
    pub(crate) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;

        // Stretch the center into a line across the cell, shaped by where the
        // other river edge lies.
        let (center_l, center_r) = if cell.has_river_through_edge(direction.opposite()) {
            (
                center + m.first_solid_corner(direction.previous()) * 0.25,
                center + m.second_solid_corner(direction.next()) * 0.25,
            )
        } else if cell.has_river_through_edge(direction.next()) {
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if cell.has_river_through_edge(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if cell.has_river_through_edge(direction.next2()) {
            (
                center,
                center + m.solid_edge_middle(direction.next()) * (0.5 * m.inner_to_outer()),
            )
        } else {
            (
                center + m.solid_edge_middle(direction.previous()) * (0.5 * m.inner_to_outer()),
                center,
            )
        };
        let mut center = center_l.lerp(center_r, 0.5);

        let mut mid = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        mid.v3.y = e.v3.y;
        center.y = e.v3.y;

        let color = self.color(cell);
        self.triangulate_edge_strip(&mid, color, e, color, false);

        let terrain = &mut self.meshes.terrain;
        terrain.add_triangle(m, center_l, mid.v1, mid.v2);
        terrain.add_triangle_color(color);
        terrain.add_quad(m, center_l, center, mid.v2, mid.v3);
        terrain.add_quad_color(color);
        terrain.add_quad(m, center, center_r, mid.v3, mid.v4);
        terrain.add_quad_color(color);
        terrain.add_triangle(m, center_r, mid.v4, mid.v5);
        terrain.add_triangle_color(color);

        if !cell.is_underwater() {
            let reversed = cell.incoming_river() == Some(direction);
            let y = cell.river_surface_y(m);
            let rivers = &mut self.meshes.rivers;
            add_river_quad(rivers, m, center_l, center_r, mid.v2, mid.v4, y, y, 0.4, reversed);
            add_river_quad(rivers, m, mid.v2, mid.v4, e.v2, e.v4, y, y, 0.6, reversed);
        }
    }

    /// Wedge of a river cell whose edge has no river.
    pub(crate) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        if cell.has_roads() {
            self.triangulate_road_adjacent_to_river(direction, cell, center, e);
        }

        let m = self.metrics;
        let mut center = center;
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                // Inside of a sharp bend.
                center += m.solid_edge_middle(direction) * (m.inner_to_outer() * 0.5);
            } else if cell.has_river_through_edge(direction.previous2()) {
                // Beside a straight river.
                center += m.first_solid_corner(direction) * 0.25;
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            center += m.second_solid_corner(direction) * 0.25;
        }

        let mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        let color = self.color(cell);
        self.triangulate_edge_strip(&mid, color, e, color, false);
        self.triangulate_edge_fan(center, &mid, color);
    }

    /// River surface across the connection to `neighbor`, or a waterfall
    /// where it drops into standing water.
    pub(crate) fn triangulate_river_connection(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        e1: &EdgeVertices,
        e2: &EdgeVertices,
    ) {
        let m = self.metrics;
        let rivers = &mut self.meshes.rivers;
        let (cell_y, neighbor_y) = (cell.river_surface_y(m), neighbor.river_surface_y(m));

        if !cell.is_underwater() {
            if !neighbor.is_underwater() {
                let reversed = cell.incoming_river() == Some(direction);
                add_river_quad(rivers, m, e1.v2, e1.v4, e2.v2, e2.v4, cell_y, neighbor_y, 0.8, reversed);
            } else if cell.elevation() > neighbor.water_level() {
                add_waterfall(
                    rivers,
                    m,
                    [e1.v2, e1.v4, e2.v2, e2.v4],
                    cell_y,
                    neighbor_y,
                    neighbor.water_surface_y(m),
                );
            }
        } else if !neighbor.is_underwater() && neighbor.elevation() > cell.water_level() {
            add_waterfall(
                rivers,
                m,
                [e2.v4, e2.v2, e1.v4, e1.v2],
                neighbor_y,
                cell_y,
                cell.water_surface_y(m),
            );
        }
    }
}

/// River surface quad with the near edge at `y1` and the far edge at `y2`.
///
/// `v` is the V coordinate at the near edge; reversed quads run
/// V backwards and mirror U so the flow still heads downstream.
#[allow(clippy::too_many_arguments)]
fn add_river_quad(
    mesh: &mut HexMesh,
    metrics: &HexMetrics,
    mut v1: Vec3,
    mut v2: Vec3,
    mut v3: Vec3,
    mut v4: Vec3,
    y1: f32,
    y2: f32,
    v: f32,
    reversed: bool,
) {
    v1.y = y1;
    v2.y = y1;
    v3.y = y2;
    v4.y = y2;
    mesh.add_quad(metrics, v1, v2, v3, v4);
    if reversed {
        mesh.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
    } else {
        mesh.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
    }
}

/// River quad from `y1` down to `y2`, clipped where it meets `water_y`.
///
/// The far corners are moved after perturbation so the bottom edge lands on
/// the water surface exactly.
fn add_waterfall(
    mesh: &mut HexMesh,
    metrics: &HexMetrics,
    [v1, v2, v3, v4]: [Vec3; 4],
    y1: f32,
    y2: f32,
    water_y: f32,
) {
    let at = |v: Vec3, y: f32| metrics.perturb(Vec3::new(v.x, y, v.z));
    let (v1, v2) = (at(v1, y1), at(v2, y1));
    let (mut v3, mut v4) = (at(v3, y2), at(v4, y2));

    let t = (water_y - y2) / (y1 - y2);
    v3 = v3.lerp(v1, t);
    v4 = v4.lerp(v2, t);

    mesh.add_quad_unperturbed(v1, v2, v3, v4);
    mesh.add_quad_uv_rect(0.0, 1.0, 0.8, 1.0);
}

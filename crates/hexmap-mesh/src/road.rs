//! Road strips laid on top of the terrain.
//!
//! Roads use U as a blend factor: 1 on the center line, 0 at the road's
//! outer edge. V is unused and left at 0.

use glam::{Vec2, Vec3};
use hexmap_coords::HexDirection;
use hexmap_grid::HexCell;

use crate::edge_vertices::EdgeVertices;
use crate::triangulator::{ChunkTriangulator, road_interpolators};

impl ChunkTriangulator<'_> {
    /// Road geometry inside one wedge.
    ///
    /// `mid_l` and `mid_r` are the road's side points halfway to the edge.
    pub(crate) fn triangulate_road(
        &mut self,
        center: Vec3,
        mid_l: Vec3,
        mid_r: Vec3,
        e: &EdgeVertices,
        has_road_through_edge: bool,
    ) {
        if !has_road_through_edge {
            self.triangulate_road_edge(center, mid_l, mid_r);
            return;
        }

        let m = self.metrics;
        let mid_c = mid_l.lerp(mid_r, 0.5);
        self.triangulate_road_segment(mid_l, mid_c, mid_r, e.v2, e.v3, e.v4);

        let roads = &mut self.meshes.roads;
        roads.add_triangle(m, center, mid_l, mid_c);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::ZERO, Vec2::new(1.0, 0.0));
        roads.add_triangle(m, center, mid_c, mid_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::ZERO);
    }

    /// Rounded-off road end in a wedge the road does not leave through.
    pub(crate) fn triangulate_road_edge(&mut self, center: Vec3, mid_l: Vec3, mid_r: Vec3) {
        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_triangle(m, center, mid_l, mid_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::ZERO, Vec2::ZERO);
    }

    /// Two quads between three near points and three far points, the middle
    /// pair on the center line.
    pub(crate) fn triangulate_road_segment(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        v5: Vec3,
        v6: Vec3,
    ) {
        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_quad(m, v1, v2, v4, v5);
        roads.add_quad(m, v2, v3, v5, v6);
        roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
        roads.add_quad_uv_rect(1.0, 0.0, 0.0, 0.0);
    }

    /// Road geometry in a wedge of a river cell, routed around the channel.
    ///
    /// Wedges that cannot reach a road edge without crossing water are
    /// skipped entirely.
    pub(crate) fn triangulate_road_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
    ) {
        let m = self.metrics;
        let has_road = cell.has_road_through_edge(direction);
        let previous_has_river = cell.has_river_through_edge(direction.previous());
        let next_has_river = cell.has_river_through_edge(direction.next());
        let (left, right) = road_interpolators(direction, cell);

        let mut road_center = center;
        let mut center = center;

        if cell.has_river_begin_or_end()
            && let Some(river) = cell.river_begin_or_end_direction()
        {
            road_center += m.solid_edge_middle(river.opposite()) * (1.0 / 3.0);
        } else if let (Some(incoming), Some(outgoing)) =
            (cell.incoming_river(), cell.outgoing_river())
        {
            if incoming == outgoing.opposite() {
                // Straight river: shift the road to the side this wedge is on.
                let corner = if previous_has_river {
                    if !has_road && !cell.has_road_through_edge(direction.next()) {
                        return;
                    }
                    m.second_solid_corner(direction)
                } else {
                    if !has_road && !cell.has_road_through_edge(direction.previous()) {
                        return;
                    }
                    m.first_solid_corner(direction)
                };
                road_center += corner * 0.5;
                center += corner * 0.25;
            } else if incoming == outgoing.previous() {
                road_center -= m.second_corner(incoming) * 0.2;
            } else if incoming == outgoing.next() {
                road_center -= m.first_corner(incoming) * 0.2;
            } else if previous_has_river && next_has_river {
                // Inside of a wide bend.
                if !has_road {
                    return;
                }
                let offset = m.solid_edge_middle(direction) * m.inner_to_outer();
                road_center += offset * 0.7;
                center += offset * 0.5;
            } else {
                // Outside of a wide bend.
                let middle = if previous_has_river {
                    direction.next()
                } else if next_has_river {
                    direction.previous()
                } else {
                    direction
                };
                if !cell.has_road_through_edge(middle)
                    && !cell.has_road_through_edge(middle.previous())
                    && !cell.has_road_through_edge(middle.next())
                {
                    return;
                }
                road_center += m.solid_edge_middle(middle) * 0.25;
            }
        }

        let mid_l = road_center.lerp(e.v1, left);
        let mid_r = road_center.lerp(e.v5, right);
        self.triangulate_road(road_center, mid_l, mid_r, e, has_road);

        if previous_has_river {
            self.triangulate_road_edge(road_center, center, mid_l);
        }
        if next_has_river {
            self.triangulate_road_edge(road_center, mid_r, center);
        }
    }
}

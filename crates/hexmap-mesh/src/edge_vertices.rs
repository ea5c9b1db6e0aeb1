//! Five evenly spaced points along one hexagon edge.

use glam::Vec3;
use hexmap_metrics::HexMetrics;

/// Subdivided edge, `v1` at the first corner and `v5` at the second.
///
/// The extra points let rivers cut a channel through the middle (`v3`)
/// and roads run along `v2..v4`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Split `corner1..corner2` into quarters.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// Split with `v2` and `v4` at `outer_step` from either end.
    ///
    /// River channels use a step of 1/6 so the channel walls line up with
    /// the straight section of the river.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace interpolation of every point, see [`HexMetrics::terrace_lerp`].
    pub fn terrace_lerp(metrics: &HexMetrics, a: &Self, b: &Self, step: u32) -> Self {
        Self {
            v1: metrics.terrace_lerp(a.v1, b.v1, step),
            v2: metrics.terrace_lerp(a.v2, b.v2, step),
            v3: metrics.terrace_lerp(a.v3, b.v3, step),
            v4: metrics.terrace_lerp(a.v4, b.v4, step),
            v5: metrics.terrace_lerp(a.v5, b.v5, step),
        }
    }

    /// Every point offset by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            v1: self.v1 + offset,
            v2: self.v2 + offset,
            v3: self.v3 + offset,
            v4: self.v4 + offset,
            v5: self.v5 + offset,
        }
    }
}

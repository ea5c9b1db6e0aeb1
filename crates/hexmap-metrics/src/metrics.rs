//! Immutable hexagon geometry: corners, blend regions, terraces and perturbation.

use glam::{Vec3, Vec4};
use hexmap_config::TerrainConfig;
use hexmap_coords::{HexDirection, INNER_RADIUS, INNER_TO_OUTER, OUTER_RADIUS};

use crate::edge_type::EdgeType;
use crate::noise_sampler::{NoiseParams, NoiseSampler};

/// Corner offsets of a pointy-topped hexagon, clockwise from north.
///
/// Corner `d` is the first corner of direction `d`; the second is `d + 1`.
const CORNERS: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
];

/// Geometry settings read once at grid construction.
///
/// Every method is a pure function of its arguments and the stored settings.
#[derive(Clone, Debug)]
pub struct HexMetrics {
    /// Fraction of the radius drawn with the cell's own color.
    pub solid_factor: f32,
    /// `1 - solid_factor`; the blend region between neighbors.
    pub blend_factor: f32,
    /// Fraction of the radius covered by open water.
    pub water_factor: f32,
    /// `1 - water_factor`.
    pub water_blend_factor: f32,
    /// World height of one elevation level.
    pub elevation_step: f32,
    /// Flat treads per slope.
    pub terraces_per_slope: u32,
    /// Interpolation steps across a slope, `2 * terraces_per_slope + 1`.
    pub terrace_steps: u32,
    /// Horizontal perturbation amplitude.
    pub cell_perturb_strength: f32,
    /// Vertical perturbation amplitude of cell centers.
    pub elevation_perturb_strength: f32,
    /// River bed offset in elevation levels.
    pub stream_bed_elevation_offset: f32,
    /// Water surface offset in elevation levels.
    pub water_elevation_offset: f32,
    colors: Vec<Vec4>,
    noise: NoiseSampler,
}

impl HexMetrics {
    /// Build metrics from terrain settings.
    pub fn new(config: &TerrainConfig) -> Self {
        let terraces_per_slope = config.terraces_per_slope.max(1);
        let colors: Vec<Vec4> = config.colors.iter().map(|c| Vec4::from_array(*c)).collect();

        tracing::debug!(
            terraces_per_slope,
            solid_factor = config.solid_factor,
            seed = config.noise_seed,
            palette = colors.len(),
            "hex metrics built"
        );

        Self {
            solid_factor: config.solid_factor,
            blend_factor: 1.0 - config.solid_factor,
            water_factor: config.water_factor,
            water_blend_factor: 1.0 - config.water_factor,
            elevation_step: config.elevation_step,
            terraces_per_slope,
            terrace_steps: terraces_per_slope * 2 + 1,
            cell_perturb_strength: config.cell_perturb_strength,
            elevation_perturb_strength: config.elevation_perturb_strength,
            stream_bed_elevation_offset: config.stream_bed_elevation_offset,
            water_elevation_offset: config.water_elevation_offset,
            colors,
            noise: NoiseSampler::new(NoiseParams {
                seed: config.noise_seed,
                scale: config.noise_scale,
                ..Default::default()
            }),
        }
    }

    // --- Corners ---

    /// Outer corner at the counter-clockwise end of edge `direction`.
    pub fn first_corner(&self, direction: HexDirection) -> Vec3 {
        CORNERS[direction.index()]
    }

    /// Outer corner at the clockwise end of edge `direction`.
    pub fn second_corner(&self, direction: HexDirection) -> Vec3 {
        CORNERS[direction.next().index()]
    }

    pub fn first_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.solid_factor
    }

    pub fn second_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.solid_factor
    }

    /// Middle of the solid edge in `direction`, relative to the center.
    pub fn solid_edge_middle(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * (0.5 * self.solid_factor)
    }

    /// Offset from a solid edge to the matching solid edge of the neighbor.
    pub fn bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.blend_factor
    }

    pub fn first_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.water_factor
    }

    pub fn second_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.water_factor
    }

    /// Offset from a water edge to the neighbor's water edge.
    pub fn water_bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.water_blend_factor
    }

    /// Ratio of outer to inner radius. Scaling an edge middle by it reaches the
    /// corner circle.
    pub fn inner_to_outer(&self) -> f32 {
        INNER_TO_OUTER
    }

    // --- Terraces ---

    /// Point `step` of `terrace_steps` along a terraced slope from `a` to `b`.
    ///
    /// Horizontal position moves every step; height only moves on odd steps,
    /// producing flat treads between risers.
    pub fn terrace_lerp(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        let h = step as f32 / self.terrace_steps as f32;
        let v = ((step + 1) / 2) as f32 / (self.terraces_per_slope + 1) as f32;
        Vec3::new(
            a.x + (b.x - a.x) * h,
            a.y + (b.y - a.y) * v,
            a.z + (b.z - a.z) * h,
        )
    }

    /// Color at terrace `step`; blends linearly without treads.
    pub fn terrace_lerp_color(&self, a: Vec4, b: Vec4, step: u32) -> Vec4 {
        let h = step as f32 / self.terrace_steps as f32;
        a.lerp(b, h)
    }

    pub fn edge_type(&self, elevation1: i32, elevation2: i32) -> EdgeType {
        EdgeType::between(elevation1, elevation2)
    }

    // --- Noise ---

    /// Four noise channels in `[0, 1]` at the XZ projection of `position`.
    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        self.noise.sample(position)
    }

    /// Displace `position` horizontally by the perturbation field.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample_noise(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * self.cell_perturb_strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * self.cell_perturb_strength,
        )
    }

    /// Vertical jitter of a cell center at `position`.
    pub fn elevation_perturbation(&self, position: Vec3) -> f32 {
        (self.sample_noise(position).y * 2.0 - 1.0) * self.elevation_perturb_strength
    }

    // --- Palette ---

    /// Color of terrain type `terrain_type`, clamped to the last palette entry.
    pub fn terrain_color(&self, terrain_type: u8) -> Vec4 {
        self.colors
            .get(terrain_type as usize)
            .or(self.colors.last())
            .copied()
            .unwrap_or(Vec4::ONE)
    }

    /// Number of configured terrain colors.
    pub fn terrain_type_count(&self) -> usize {
        self.colors.len()
    }
}

impl Default for HexMetrics {
    fn default() -> Self {
        Self::new(&TerrainConfig::default())
    }
}

//! Append-only triangle buffers produced by the triangulator.
//!
//! Vertices are never shared between primitives: a triangle appends three
//! vertices and a quad appends four. Attribute channels (colors, UVs) are
//! appended separately after each primitive and stay empty when a buffer does
//! not use them.

use glam::{Vec2, Vec3, Vec4};
use hexmap_metrics::HexMetrics;

// Byte views below rely on glam's vector types being tightly packed.
static_assertions::assert_eq_size!(Vec2, [f32; 2]);
static_assertions::assert_eq_size!(Vec3, [f32; 3]);
static_assertions::assert_eq_size!(Vec4, [f32; 4]);

/// One mesh buffer: positions, optional per-vertex attributes and indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HexMesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub uvs: Vec<Vec2>,
    pub uv2s: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl HexMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all geometry while keeping allocations for the next rebuild.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.uvs.clear();
        self.uv2s.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Every non-empty attribute channel has one entry per vertex.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        let channel_ok = |len: usize| len == 0 || len == n;
        channel_ok(self.colors.len())
            && channel_ok(self.uvs.len())
            && channel_ok(self.uv2s.len())
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }

    // --- Triangles ---

    /// Append a triangle, perturbing every corner.
    pub fn add_triangle(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.add_triangle_unperturbed(metrics.perturb(v1), metrics.perturb(v2), metrics.perturb(v3));
    }

    /// Append a triangle with positions used as given.
    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[v1, v2, v3]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn add_triangle_color(&mut self, color: Vec4) {
        self.colors.extend_from_slice(&[color; 3]);
    }

    pub fn add_triangle_colors(&mut self, c1: Vec4, c2: Vec4, c3: Vec4) {
        self.colors.extend_from_slice(&[c1, c2, c3]);
    }

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend_from_slice(&[uv1, uv2, uv3]);
    }

    pub fn add_triangle_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3]);
    }

    // --- Quads ---

    /// Append a quad, perturbing every corner.
    ///
    /// `v1, v2` form the near edge and `v3, v4` the far edge; the quad is
    /// split into `(v1, v3, v2)` and `(v2, v3, v4)`.
    pub fn add_quad(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.add_quad_unperturbed(
            metrics.perturb(v1),
            metrics.perturb(v2),
            metrics.perturb(v3),
            metrics.perturb(v4),
        );
    }

    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[v1, v2, v3, v4]);
        self.indices
            .extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    pub fn add_quad_color(&mut self, color: Vec4) {
        self.colors.extend_from_slice(&[color; 4]);
    }

    /// Near edge in `c1`, far edge in `c2`.
    pub fn add_quad_colors(&mut self, c1: Vec4, c2: Vec4) {
        self.colors.extend_from_slice(&[c1, c1, c2, c2]);
    }

    pub fn add_quad_colors4(&mut self, c1: Vec4, c2: Vec4, c3: Vec4, c4: Vec4) {
        self.colors.extend_from_slice(&[c1, c2, c3, c4]);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uvs.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    /// UVs spanning a rectangle: `u` across the edge, `v` from near to far.
    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.add_quad_uv(
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        );
    }

    pub fn add_quad_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    // --- Upload views ---

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn uv2_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uv2s)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// The six output buffers of one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMeshes {
    /// Land surface with per-vertex colors.
    pub terrain: HexMesh,
    /// River surfaces with flow UVs.
    pub rivers: HexMesh,
    /// Road strips with UVs (U is 1 on the center line).
    pub roads: HexMesh,
    /// Open water surfaces, positions only.
    pub water: HexMesh,
    /// Shore foam strips with UVs (V is 1 on land).
    pub water_shore: HexMesh,
    /// River mouths with UV blend and UV2 flow.
    pub estuaries: HexMesh,
}

impl ChunkMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.terrain.clear();
        self.rivers.clear();
        self.roads.clear();
        self.water.clear();
        self.water_shore.clear();
        self.estuaries.clear();
    }

    /// Buffers paired with stable names, in a fixed order.
    pub fn buffers(&self) -> [(&'static str, &HexMesh); 6] {
        [
            ("terrain", &self.terrain),
            ("rivers", &self.rivers),
            ("roads", &self.roads),
            ("water", &self.water),
            ("water_shore", &self.water_shore),
            ("estuaries", &self.estuaries),
        ]
    }

    pub fn triangle_count(&self) -> usize {
        self.buffers().iter().map(|(_, m)| m.triangle_count()).sum()
    }
}

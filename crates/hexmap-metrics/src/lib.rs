//! Geometry constants and the perturbation sampler shared by grid assembly and meshing.
//!
//! [`HexMetrics`] is built once from [`hexmap_config::TerrainConfig`] and never
//! changes afterwards; the grid and the mesh scheduler share it through an `Arc`.

pub mod edge_type;
pub mod metrics;
pub mod noise_sampler;

pub use edge_type::EdgeType;
pub use metrics::HexMetrics;
pub use noise_sampler::{NoiseParams, NoiseSampler};

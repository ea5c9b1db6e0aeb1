//! Triangulation of hex map chunks into renderable buffers.
//!
//! Each chunk owns six [`HexMesh`] buffers (see [`ChunkMeshes`]): terrain,
//! rivers, roads, open water, water shore and estuaries. The
//! [`MeshScheduler`] rebuilds the buffers of every dirty chunk once per tick.

mod corner;
pub mod edge_vertices;
pub mod hex_mesh;
mod river;
mod road;
pub mod scheduler;
pub mod triangulator;
mod water;

pub use edge_vertices::EdgeVertices;
pub use hex_mesh::{ChunkMeshes, HexMesh};
pub use scheduler::MeshScheduler;
pub use triangulator::ChunkTriangulator;

//! The cell arena, chunk partitioning and every edit that can be made to a map.
//!
//! [`HexGrid`] owns all [`HexCell`]s in row-major order and groups them into
//! [`GridChunk`]s. Mutators live on the grid and take a cell index, so neighbor
//! updates never need shared mutable references. Every mutator keeps the
//! cross-cell invariants intact:
//!
//! - rivers only flow to a neighbor at the same or lower elevation,
//! - a road and a river never share an edge,
//! - roads only cross edges with an elevation difference of at most one,
//! - river and road flags are mirrored on both cells of an edge.
//!
//! Edits mark the affected chunks dirty; a mesh scheduler drains the queue
//! with [`HexGrid::take_dirty_chunks`].

pub mod cell;
pub mod chunk;
pub mod editor;
pub mod grid;
pub mod map_serial;
mod mutation;

pub use cell::HexCell;
pub use chunk::GridChunk;
pub use editor::{EditSettings, HexMapEditor, OptionalToggle};
pub use grid::HexGrid;
pub use map_serial::{MAP_FORMAT_VERSION, MapSerError};

//! Cube coordinates, edge directions, and the fixed hexagon dimensions they rely on.
//!
//! Cells are pointy-topped hexagons laid out in rows along the world X axis, with
//! rows stacked along Z. Three addressing schemes coexist:
//!
//! 1. **Offset**: `(column, row)` indices into the rectangular storage array.
//! 2. **Cube**: `(x, y, z)` with `x + y + z == 0`; only `x` and `z` are stored.
//! 3. **World**: continuous `Vec3` positions; `y` is height and is ignored here.
//!
//! ```rust
//! use hexmap_coords::{HexCoordinates, HexDirection};
//!
//! let c = HexCoordinates::from_offset(3, 2);
//! assert_eq!((c.x(), c.y(), c.z()), (2, -4, 2));
//! assert_eq!(c.to_offset(), (3, 2));
//! assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
//! ```

mod coordinates;
mod direction;

pub use coordinates::HexCoordinates;
pub use direction::HexDirection;

/// Ratio between the inner (edge) radius and the outer (corner) radius: `sqrt(3) / 2`.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;

/// Inverse of [`OUTER_TO_INNER`].
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// Distance from a cell center to any of its six corners.
pub const OUTER_RADIUS: f32 = 10.0;

/// Distance from a cell center to the middle of any of its six edges.
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

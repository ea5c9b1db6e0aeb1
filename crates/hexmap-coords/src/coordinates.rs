//! Cube coordinates and their conversions to offset indices and world positions.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{HexDirection, INNER_RADIUS, OUTER_RADIUS};

/// Cube coordinate of a hexagonal cell.
///
/// Only `x` and `z` are stored; `y` is always `-x - z`, so the invariant
/// `x + y + z == 0` holds by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    /// Creates a coordinate from its two stored axes.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The X axis (grows toward east).
    pub const fn x(self) -> i32 {
        self.x
    }

    /// The derived Y axis, `-x - z`.
    pub const fn y(self) -> i32 {
        -self.x - self.z
    }

    /// The Z axis (the row).
    pub const fn z(self) -> i32 {
        self.z
    }

    /// Converts offset storage indices into cube coordinates.
    ///
    /// Every other row is shifted half a cell, so `x` loses `row / 2`.
    pub const fn from_offset(column: i32, row: i32) -> Self {
        Self::new(column - row / 2, row)
    }

    /// Converts back to offset `(column, row)` indices.
    pub const fn to_offset(self) -> (i32, i32) {
        (self.x + self.z / 2, self.z)
    }

    /// Flat row-major index for a grid with `columns` cells per row.
    ///
    /// The caller is responsible for range-checking; see [`Self::to_offset`].
    pub const fn to_array_index(self, columns: i32) -> i32 {
        self.x + self.z * columns + self.z / 2
    }

    /// Finds the cell containing a world position (height is ignored).
    ///
    /// Projects onto fractional cube axes and rounds each one. When the rounded
    /// values do not sum to zero, the stored axis with the largest rounding
    /// error is rebuilt from the other two; `y` is never stored, so when it has
    /// the largest error it is implicitly rebuilt.
    pub fn from_position(position: Vec3) -> Self {
        let mut x = position.x / (INNER_RADIUS * 2.0);
        let mut y = -x;
        // Every two rows shift one whole cell to the left.
        let offset = position.z / (OUTER_RADIUS * 3.0);
        x -= offset;
        y -= offset;

        let mut ix = x.round_ties_even() as i32;
        let iy = y.round_ties_even() as i32;
        let mut iz = (-x - y).round_ties_even() as i32;

        if ix + iy + iz != 0 {
            let dx = (x - ix as f32).abs();
            let dy = (y - iy as f32).abs();
            let dz = (-x - y - iz as f32).abs();

            if dx > dy && dx > dz {
                ix = -iy - iz;
            } else if dz > dy {
                iz = -ix - iy;
            }
            tracing::trace!(
                x = position.x,
                z = position.z,
                ix,
                iz,
                "corrected cube rounding near a cell boundary"
            );
        }

        Self::new(ix, iz)
    }

    /// The adjacent coordinate across edge `direction`.
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        let (dx, dz) = match direction {
            HexDirection::NE => (0, 1),
            HexDirection::E => (1, 0),
            HexDirection::SE => (1, -1),
            HexDirection::SW => (0, -1),
            HexDirection::W => (-1, 0),
            HexDirection::NW => (-1, 1),
        };
        Self::new(self.x + dx, self.z + dz)
    }

    /// Number of cell steps between two coordinates.
    pub const fn distance_to(self, other: Self) -> u32 {
        (self.x.abs_diff(other.x) + self.y().abs_diff(other.y()) + self.z.abs_diff(other.z)) / 2
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}

//! The six edge directions of a pointy-topped hexagon.

use serde::{Deserialize, Serialize};

/// One of the six edges of a hexagonal cell, clockwise from north-east.
///
/// The `repr(u8)` discriminant is the direction index used for neighbor and
/// road arrays, and the value persisted in map files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HexDirection {
    /// North-east.
    NE = 0,
    /// East.
    E = 1,
    /// South-east.
    SE = 2,
    /// South-west.
    SW = 3,
    /// West.
    W = 4,
    /// North-west.
    NW = 5,
}

impl HexDirection {
    /// All six directions in clockwise order starting at [`HexDirection::NE`].
    pub const ALL: [HexDirection; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decodes a direction index, returning `None` for values above 5.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Returns the direction rotated clockwise by `steps` (may be negative).
    pub fn rotate(self, steps: i32) -> Self {
        Self::ALL[(self as i32 + steps).rem_euclid(6) as usize]
    }

    /// The direction pointing the other way across the cell.
    pub fn opposite(self) -> Self {
        self.rotate(3)
    }

    /// One step clockwise.
    pub fn next(self) -> Self {
        self.rotate(1)
    }

    /// One step counter-clockwise.
    pub fn previous(self) -> Self {
        self.rotate(-1)
    }

    /// Two steps clockwise.
    pub fn next2(self) -> Self {
        self.rotate(2)
    }

    /// Two steps counter-clockwise.
    pub fn previous2(self) -> Self {
        self.rotate(-2)
    }
}

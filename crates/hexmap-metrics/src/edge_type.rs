//! Classification of the elevation change across a shared cell edge.

/// How two adjacent cells meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Same elevation.
    Flat,
    /// One level apart; bridged with terraces.
    Slope,
    /// Two or more levels apart; a straight wall.
    Cliff,
}

impl EdgeType {
    /// Classifies the edge between two elevations. Symmetric in its arguments.
    pub fn between(elevation1: i32, elevation2: i32) -> Self {
        match elevation1.abs_diff(elevation2) {
            0 => Self::Flat,
            1 => Self::Slope,
            _ => Self::Cliff,
        }
    }
}
